use crate::error::{BoxError, ConfigResult};
use crate::kwargs::{Kwargs, KwargsSpec};
use crate::pipeline::{BoxedStage, Pipeline, RunReport, Stage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One column name or an ordered list of them
///
/// Deserializes from either a JSON string or an array of strings, so stage
/// functions can also read a selector out of their kwargs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Columns {
    Single(String),
    Many(Vec<String>),
}

impl Columns {
    /// Column names in order
    pub fn names(&self) -> Vec<&str> {
        match self {
            Columns::Single(name) => vec![name.as_str()],
            Columns::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Columns::Single(_) => 1,
            Columns::Many(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, column: &str) -> bool {
        match self {
            Columns::Single(name) => name == column,
            Columns::Many(names) => names.iter().any(|name| name == column),
        }
    }
}

impl From<&str> for Columns {
    fn from(name: &str) -> Self {
        Columns::Single(name.to_string())
    }
}

impl From<String> for Columns {
    fn from(name: String) -> Self {
        Columns::Single(name)
    }
}

impl From<Vec<String>> for Columns {
    fn from(names: Vec<String>) -> Self {
        Columns::Many(names)
    }
}

impl From<Vec<&str>> for Columns {
    fn from(names: Vec<&str>) -> Self {
        Columns::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(names: [&str; N]) -> Self {
        Columns::Many(names.iter().map(|name| name.to_string()).collect())
    }
}

/// A stage that operates on selected columns of a table
///
/// Like [`Stage`], with the processor's column selector passed alongside the
/// table on every call.
pub trait ColumnStage<T, E = BoxError>: Send + Sync {
    fn call(&self, table: T, cols: &Columns, kwargs: &Kwargs) -> Result<T, E>;

    fn name(&self) -> &str;

    /// Names of the keyword arguments this stage accepts (`None` = any)
    fn params(&self) -> Option<&[String]> {
        None
    }

    fn boxed(self) -> BoxedColumnStage<T, E>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

pub type BoxedColumnStage<T, E = BoxError> = Box<dyn ColumnStage<T, E>>;

/// Column stage backed by a function of `(table, &Columns, &Kwargs)`
pub struct ColumnFnStage<F> {
    name: String,
    params: Option<Vec<String>>,
    func: F,
}

impl<F> ColumnFnStage<F> {
    pub fn new<T, E>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(T, &Columns, &Kwargs) -> Result<T, E> + Send + Sync,
    {
        Self {
            name: name.into(),
            params: None,
            func,
        }
    }

    /// Declare the keyword arguments this stage accepts
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = Some(params.into_iter().map(Into::into).collect());
        self
    }
}

impl<T, E, F> ColumnStage<T, E> for ColumnFnStage<F>
where
    F: Fn(T, &Columns, &Kwargs) -> Result<T, E> + Send + Sync,
{
    fn call(&self, table: T, cols: &Columns, kwargs: &Kwargs) -> Result<T, E> {
        (self.func)(table, cols, kwargs)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> Option<&[String]> {
        self.params.as_deref()
    }
}

// Column stage with the processor's selector fixed in
struct ScopedStage<T, E> {
    inner: BoxedColumnStage<T, E>,
    cols: Arc<Columns>,
}

impl<T, E> Stage<T, E> for ScopedStage<T, E> {
    fn call(&self, table: T, kwargs: &Kwargs) -> Result<T, E> {
        self.inner.call(table, &self.cols, kwargs)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn params(&self) -> Option<&[String]> {
        self.inner.params()
    }
}

/// Processor that applies column-scoped stages to a fixed set of columns
///
/// Every stage is called as `func(table, cols, kwargs)` with the same `cols`.
/// Typically nested as one stage of a larger [`PipeProcessor`](super::PipeProcessor).
///
/// # Example
/// ```
/// use stagepipe::{BoxError, ColumnFnStage, ColumnPipeProcessor, ColumnStage, Columns, Kwargs};
/// use std::collections::BTreeMap;
///
/// type Table = BTreeMap<String, Vec<i64>>;
///
/// fn negate(mut t: Table, cols: &Columns, _: &Kwargs) -> Result<Table, BoxError> {
///     for name in cols.names() {
///         if let Some(values) = t.get_mut(name) {
///             values.iter_mut().for_each(|v| *v = -*v);
///         }
///     }
///     Ok(t)
/// }
///
/// let processor = ColumnPipeProcessor::new(
///     vec![ColumnFnStage::new("negate", negate).boxed()],
///     "a",
/// );
///
/// let table = Table::from([("a".to_string(), vec![1]), ("b".to_string(), vec![2])]);
/// let result = processor.execute(table).unwrap();
/// assert_eq!(result["a"], vec![-1]);
/// assert_eq!(result["b"], vec![2]);
/// ```
pub struct ColumnPipeProcessor<T, E = BoxError> {
    cols: Arc<Columns>,
    pipeline: Pipeline<T, E>,
}

impl<T: 'static, E: 'static> ColumnPipeProcessor<T, E> {
    /// Create a processor whose stages take no extra arguments
    pub fn new(funcs: Vec<BoxedColumnStage<T, E>>, cols: impl Into<Columns>) -> Self {
        let cols = Arc::new(cols.into());
        Self {
            pipeline: Pipeline::new(scope(funcs, &cols)).named("column_pipe_processor"),
            cols,
        }
    }

    /// Create a processor with per-stage or shared keyword arguments
    pub fn with_kwargs(
        funcs: Vec<BoxedColumnStage<T, E>>,
        cols: impl Into<Columns>,
        kwargs: impl Into<KwargsSpec>,
    ) -> ConfigResult<Self> {
        let cols = Arc::new(cols.into());
        Ok(Self {
            pipeline: Pipeline::with_kwargs(scope(funcs, &cols), kwargs)?
                .named("column_pipe_processor"),
            cols,
        })
    }
}

impl<T, E> ColumnPipeProcessor<T, E> {
    /// Rename the processor
    pub fn named(self, name: impl Into<String>) -> Self {
        Self {
            cols: self.cols,
            pipeline: self.pipeline.named(name),
        }
    }

    pub fn name(&self) -> &str {
        self.pipeline.name()
    }

    /// The column selector passed to every stage
    pub fn cols(&self) -> &Columns {
        &self.cols
    }

    pub fn len(&self) -> usize {
        self.pipeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipeline.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.pipeline.stage_names()
    }

    /// Apply every column stage to `table` in order
    pub fn execute(&self, table: T) -> Result<T, E> {
        self.pipeline.execute(table)
    }

    /// Same as `execute()` but also returns per-stage timings
    pub fn execute_with_report(&self, table: T) -> Result<(T, RunReport), E> {
        self.pipeline.execute_with_report(table)
    }
}

impl<T, E> Stage<T, E> for ColumnPipeProcessor<T, E> {
    fn call(&self, table: T, _kwargs: &Kwargs) -> Result<T, E> {
        self.execute(table)
    }

    fn name(&self) -> &str {
        self.pipeline.name()
    }

    fn params(&self) -> Option<&[String]> {
        Some(&[])
    }
}

fn scope<T: 'static, E: 'static>(
    funcs: Vec<BoxedColumnStage<T, E>>,
    cols: &Arc<Columns>,
) -> Vec<BoxedStage<T, E>> {
    funcs
        .into_iter()
        .map(|inner| {
            Box::new(ScopedStage {
                inner,
                cols: Arc::clone(cols),
            }) as BoxedStage<T, E>
        })
        .collect()
}
