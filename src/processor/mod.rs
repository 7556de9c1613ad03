//! Pipelines specialised for tabular values
//!
//! - [`PipeProcessor`] replays a chain of whole-table stages and accepts kwargs
//!   per stage or as one shared mapping.
//! - [`ColumnPipeProcessor`] runs column-scoped stages, handing the same
//!   [`Columns`] selector to each of them.
//!
//! Both are stages themselves; a top-level `PipeProcessor` usually nests a
//! `ColumnPipeProcessor` as one of its stages.

pub mod column;
pub mod pipe;

pub use column::{BoxedColumnStage, ColumnFnStage, ColumnPipeProcessor, ColumnStage, Columns};
pub use pipe::PipeProcessor;
