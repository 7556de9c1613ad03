//! Pipeline pattern implementation for sequential value transformations
//!
//! A pipeline holds an ordered list of stages, each bound to the keyword
//! arguments it is always called with. Running the pipeline threads a value
//! through every stage in order. Pipelines are stages themselves, so they nest.
//!
//! # Example
//! ```
//! use stagepipe::{BoxError, FnStage, Kwargs, Pipeline, Stage};
//!
//! fn remove_punctuation(tokens: Vec<String>, kwargs: &Kwargs) -> Result<Vec<String>, BoxError> {
//!     let punctuation: String = kwargs.get("punctuation")?;
//!     Ok(tokens.into_iter().filter(|t| !punctuation.contains(t.as_str())).collect())
//! }
//!
//! fn to_lower(tokens: Vec<String>, _: &Kwargs) -> Result<Vec<String>, BoxError> {
//!     Ok(tokens.into_iter().map(|t| t.to_lowercase()).collect())
//! }
//!
//! let pipeline = Pipeline::with_kwargs(
//!     vec![
//!         FnStage::new("to_lower", to_lower).boxed(),
//!         FnStage::new("remove_punctuation", remove_punctuation)
//!             .with_params(["punctuation"])
//!             .boxed(),
//!     ],
//!     vec![None, Some(Kwargs::new().with("punctuation", "!?.,"))],
//! )?;
//!
//! let tokens = vec!["Hello".to_string(), "!".to_string(), "World".to_string()];
//! assert_eq!(pipeline.execute(tokens)?, vec!["hello", "world"]);
//! # Ok::<(), BoxError>(())
//! ```

pub mod core;
pub mod executor;
pub mod stages;

// Re-export main types
pub use self::core::{BoundStage, BoxedStage, RunReport, Stage, StageReport};
pub use executor::{Pipeline, PipelineBuilder};
pub use stages::{map, try_map, FnStage, MapStage, TryMapStage};
