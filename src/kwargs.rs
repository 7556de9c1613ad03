use crate::error::{ConfigResult, ConfigurationError, KwargError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Named arguments bound to a stage
///
/// Every invocation of a stage receives the same `Kwargs`. Values are stored as
/// JSON so they can come from code or from a configuration file; stage functions
/// pull them out with the typed getters.
///
/// # Example
/// ```
/// use stagepipe::Kwargs;
///
/// let kwargs = Kwargs::new().with("x", 2).with("label", "total");
///
/// let x: i64 = kwargs.get("x").unwrap();
/// let fill: i64 = kwargs.get_or("fillna", -99999).unwrap();
/// assert_eq!(x + fill, -99997);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kwargs {
    values: Map<String, Value>,
}

impl Kwargs {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an argument
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get the raw JSON value of an argument
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get a required argument
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, KwargError> {
        self.get_opt(name)?.ok_or_else(|| KwargError::Missing {
            name: name.to_string(),
        })
    }

    /// Get an argument if present
    pub fn get_opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, KwargError> {
        match self.values.get(name) {
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|source| KwargError::InvalidType {
                    name: name.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Get an argument, falling back to `default` when absent
    pub fn get_or<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T, KwargError> {
        Ok(self.get_opt(name)?.unwrap_or(default))
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of this set restricted to the given parameter names
    pub fn select(&self, names: &[String]) -> Kwargs {
        self.values
            .iter()
            .filter(|(key, _)| names.iter().any(|name| name == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Insert every argument of `other`, replacing existing values
    pub fn merge(&mut self, other: Kwargs) {
        self.values.extend(other.values);
    }

    /// Parse a JSON object into an argument set
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K, V> FromIterator<(K, V)> for Kwargs
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl From<Map<String, Value>> for Kwargs {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl TryFrom<Value> for Kwargs {
    type Error = ConfigurationError;

    fn try_from(value: Value) -> ConfigResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Stage name and accepted parameter names, as seen by [`KwargsSpec::resolve`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct Signature<'a> {
    pub name: &'a str,
    pub params: Option<&'a [String]>,
}

/// How keyword arguments are laid out across the stages of a pipeline
///
/// In JSON, `null` means no arguments, an array is one entry per stage (entries
/// may be `null`) and an object is a single mapping shared by every stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KwargsSpec {
    /// No stage gets extra arguments
    #[default]
    None,

    /// Entry `i` belongs to stage `i`
    PerStage(Vec<Option<Kwargs>>),

    /// One mapping offered to every stage; each stage receives the names it declares
    Shared(Kwargs),
}

impl KwargsSpec {
    /// Parse a kwargs layout from a JSON string
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a kwargs layout from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Resolve the arguments each stage will be called with
    ///
    /// Per-stage lists must match the stage count, and may only name parameters
    /// a stage declares (stages without a declared signature accept anything).
    /// Shared mappings are filtered down to each stage's declared parameters.
    pub(crate) fn resolve(self, signatures: &[Signature<'_>]) -> ConfigResult<Vec<Kwargs>> {
        match self {
            KwargsSpec::None => Ok(vec![Kwargs::default(); signatures.len()]),
            KwargsSpec::PerStage(list) => {
                if list.len() != signatures.len() {
                    return Err(ConfigurationError::LengthMismatch {
                        funcs: signatures.len(),
                        kwargs: list.len(),
                    });
                }

                signatures
                    .iter()
                    .zip(list)
                    .map(|(signature, kwargs)| {
                        let kwargs = kwargs.unwrap_or_default();
                        if let Some(params) = signature.params {
                            if let Some(argument) =
                                kwargs.keys().find(|key| !params.iter().any(|p| p == key))
                            {
                                return Err(ConfigurationError::UnexpectedArgument {
                                    stage: signature.name.to_string(),
                                    argument: argument.to_string(),
                                });
                            }
                        }
                        Ok(kwargs)
                    })
                    .collect()
            }
            KwargsSpec::Shared(shared) => Ok(signatures
                .iter()
                .map(|signature| match signature.params {
                    Some(params) => shared.select(params),
                    None => Kwargs::default(),
                })
                .collect()),
        }
    }
}

impl From<Kwargs> for KwargsSpec {
    fn from(kwargs: Kwargs) -> Self {
        KwargsSpec::Shared(kwargs)
    }
}

impl From<Vec<Option<Kwargs>>> for KwargsSpec {
    fn from(list: Vec<Option<Kwargs>>) -> Self {
        KwargsSpec::PerStage(list)
    }
}

impl From<Vec<Kwargs>> for KwargsSpec {
    fn from(list: Vec<Kwargs>) -> Self {
        KwargsSpec::PerStage(list.into_iter().map(Some).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_typed_getters() {
        let kwargs = Kwargs::new().with("x", 2).with("punctuation", ".,!");

        assert_eq!(kwargs.get::<i64>("x").unwrap(), 2);
        assert_eq!(kwargs.get::<String>("punctuation").unwrap(), ".,!");
        assert_eq!(kwargs.get_or("fillna", -99999_i64).unwrap(), -99999);
        assert_eq!(kwargs.get_opt::<i64>("missing").unwrap(), None);
    }

    #[test]
    fn test_missing_key() {
        let kwargs = Kwargs::new();
        let result = kwargs.get::<i64>("x");

        assert!(matches!(result, Err(KwargError::Missing { .. })));
    }

    #[test]
    fn test_wrong_type() {
        let kwargs = Kwargs::new().with("x", "two");
        let result = kwargs.get::<i64>("x");

        assert!(matches!(result, Err(KwargError::InvalidType { .. })));
    }

    #[test]
    fn test_select() {
        let kwargs = Kwargs::new().with("cols", "customer_id").with("fillna", 0);
        let selected = kwargs.select(&params(&["cols"]));

        assert!(selected.has("cols"));
        assert!(!selected.has("fillna"));
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_merge_replaces_existing() {
        let mut kwargs = Kwargs::new().with("x", 1).with("cols", "a");
        kwargs.merge(Kwargs::new().with("x", 2));

        assert_eq!(kwargs.get::<i64>("x").unwrap(), 2);
        assert_eq!(kwargs.get::<String>("cols").unwrap(), "a");
    }

    #[test]
    fn test_try_from_non_object() {
        assert!(Kwargs::try_from(json!([1, 2])).is_err());
        assert_eq!(Kwargs::try_from(json!({"x": 1})).unwrap().len(), 1);
    }

    #[test]
    fn test_spec_from_json() {
        assert_eq!(KwargsSpec::from_json_str("null").unwrap(), KwargsSpec::None);

        let per_stage = KwargsSpec::from_json_str(r#"[{"x": 2}, null]"#).unwrap();
        assert_eq!(
            per_stage,
            KwargsSpec::PerStage(vec![Some(Kwargs::new().with("x", 2)), None])
        );

        let shared = KwargsSpec::from_json_str(r#"{"cols": "a"}"#).unwrap();
        assert_eq!(shared, KwargsSpec::Shared(Kwargs::new().with("cols", "a")));

        assert!(KwargsSpec::from_json_str("42").is_err());
    }

    #[test]
    fn test_resolve_none() {
        let signatures = [
            Signature { name: "a", params: None },
            Signature { name: "b", params: None },
        ];
        let resolved = KwargsSpec::None.resolve(&signatures).unwrap();

        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(Kwargs::is_empty));
    }

    #[test]
    fn test_resolve_length_mismatch() {
        let signatures = [
            Signature { name: "a", params: None },
            Signature { name: "b", params: None },
        ];
        let result = KwargsSpec::from(vec![Kwargs::new()]).resolve(&signatures);

        assert!(matches!(
            result,
            Err(ConfigurationError::LengthMismatch {
                funcs: 2,
                kwargs: 1
            })
        ));
    }

    #[test]
    fn test_resolve_unexpected_argument() {
        let declared = params(&["x"]);
        let signatures = [Signature {
            name: "add",
            params: Some(&declared),
        }];
        let result = KwargsSpec::from(vec![Kwargs::new().with("y", 1)]).resolve(&signatures);

        match result {
            Err(ConfigurationError::UnexpectedArgument { stage, argument }) => {
                assert_eq!(stage, "add");
                assert_eq!(argument, "y");
            }
            other => panic!("expected UnexpectedArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_shared_filters_by_declared_params() {
        let both = params(&["cols", "fillna"]);
        let cols_only = params(&["cols"]);
        let signatures = [
            Signature {
                name: "float_to_int",
                params: Some(&both),
            },
            Signature {
                name: "int_to_string",
                params: Some(&cols_only),
            },
            Signature {
                name: "clean_colnames",
                params: None,
            },
        ];
        let shared = Kwargs::new().with("cols", "customer_id").with("fillna", 0);
        let resolved = KwargsSpec::from(shared).resolve(&signatures).unwrap();

        assert_eq!(resolved[0].len(), 2);
        assert_eq!(resolved[1].keys().collect::<Vec<_>>(), vec!["cols"]);
        assert!(resolved[2].is_empty());
    }
}
