//! Minimal column-store used as the opaque table type in integration tests.

#![allow(dead_code)]

use serde_json::Value;
use std::collections::HashMap;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<(String, Vec<Value>)>,
}

impl Table {
    pub fn new(columns: Vec<(&str, Vec<Value>)>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, values)| (name.to_string(), values))
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(|(_, v)| v.len()).unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn rename(mut self, f: impl Fn(&str) -> String) -> Self {
        for (name, _) in self.columns.iter_mut() {
            *name = f(name);
        }
        self
    }

    /// Replace a column of the same name, or append a new one
    pub fn with_column(mut self, name: &str, values: Vec<Value>) -> Self {
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name.to_string(), values)),
        }
        self
    }

    pub fn map_column(self, name: &str, f: impl Fn(&Value) -> Value) -> Self {
        let values = match self.column(name) {
            Some(values) => values.iter().map(f).collect(),
            None => return self,
        };
        self.with_column(name, values)
    }

    pub fn slice(&self, rows: Range<usize>) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values[rows.clone()].to_vec()))
                .collect(),
        }
    }

    /// Per-row aggregate of `value_col` over the rows sharing `key_col`
    pub fn group_broadcast(
        &self,
        key_col: &str,
        value_col: Option<&str>,
        agg: impl Fn(&[f64]) -> f64,
    ) -> Vec<Value> {
        let keys = self.column(key_col).unwrap_or(&[]);
        let values: Vec<f64> = match value_col.and_then(|c| self.column(c)) {
            Some(values) => values.iter().map(as_f64).collect(),
            None => vec![1.0; keys.len()],
        };

        let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
        for (key, value) in keys.iter().zip(&values) {
            groups.entry(key.to_string()).or_default().push(*value);
        }

        keys.iter()
            .map(|key| Value::from(agg(&groups[&key.to_string()])))
            .collect()
    }
}

pub fn as_f64(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

pub fn sample() -> Table {
    Table::new(vec![
        (
            "Invoice",
            vec![
                Value::from("489434"),
                Value::from("489434"),
                Value::from("489435"),
                Value::from("489436"),
                Value::from("489436"),
                Value::from("489436"),
            ],
        ),
        (
            "StockCode",
            vec![
                Value::from("85048"),
                Value::from("79323P"),
                Value::from("22350"),
                Value::from("48173C"),
                Value::from("21755"),
                Value::from("21754"),
            ],
        ),
        (
            "Quantity",
            vec![
                Value::from(12),
                Value::from(12),
                Value::from(24),
                Value::from(10),
                Value::from(18),
                Value::from(3),
            ],
        ),
        (
            "Price",
            vec![
                Value::from(6.95),
                Value::from(6.75),
                Value::from(2.1),
                Value::from(5.95),
                Value::from(5.45),
                Value::from(5.45),
            ],
        ),
        (
            "Customer ID",
            vec![
                Value::from(13085.0),
                Value::from(13085.0),
                Value::Null,
                Value::from(13078.0),
                Value::from(13078.0),
                Value::from(13078.0),
            ],
        ),
    ])
}
