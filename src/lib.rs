//! # stagepipe
//!
//! Sequential function pipelines. A pipeline is an ordered list of stages, each
//! a function of `(value, &Kwargs)` bound to the keyword arguments it is always
//! called with. Executing the pipeline threads one value through every stage,
//! left to right, and stops at the first error.
//!
//! - [`Pipeline`]: generic composer over any value type
//! - [`PipeProcessor`]: the same for tables, with kwargs shareable across stages
//! - [`ColumnPipeProcessor`]: column-scoped table stages with a fixed [`Columns`] selector
//!
//! All three are [`Stage`]s, so they nest inside each other.
//!
//! ```
//! use stagepipe::{map, Pipeline, Stage};
//!
//! let inner: Pipeline<i64> = Pipeline::new(vec![map("add_two", |x: i64| x + 2).boxed()]);
//! let outer: Pipeline<i64> = Pipeline::new(vec![
//!     inner.boxed(),
//!     map("mult_two", |x: i64| x * 2).boxed(),
//! ]);
//!
//! assert_eq!(outer.execute(2).unwrap(), 8);
//! ```

pub mod error;
pub mod kwargs;
pub mod logging;
pub mod pipeline;
pub mod processor;

pub use error::{BoxError, ConfigResult, ConfigurationError, KwargError};
pub use kwargs::{Kwargs, KwargsSpec};
pub use pipeline::{
    map, try_map, BoundStage, BoxedStage, FnStage, MapStage, Pipeline, PipelineBuilder,
    RunReport, Stage, StageReport, TryMapStage,
};
pub use processor::{
    BoxedColumnStage, ColumnFnStage, ColumnPipeProcessor, ColumnStage, Columns, PipeProcessor,
};
