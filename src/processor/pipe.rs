use crate::error::{BoxError, ConfigResult};
use crate::kwargs::{Kwargs, KwargsSpec};
use crate::pipeline::{BoxedStage, Pipeline, RunReport, Stage};

/// Pipeline over table values
///
/// Replays the same chain of table transformations (rename, derive, join) on
/// any number of tables, the way method chaining would on a single one. Takes
/// kwargs per stage or as one shared mapping; with a shared mapping every stage
/// receives just the names it declares.
///
/// # Example
/// ```
/// use stagepipe::{map, PipeProcessor, Stage};
/// use std::collections::BTreeMap;
///
/// type Table = BTreeMap<String, Vec<i64>>;
///
/// let processor: PipeProcessor<Table> = PipeProcessor::new(vec![
///     map("add_total", |mut t: Table| {
///         let total = t.values().map(|c| c.iter().sum::<i64>()).sum();
///         t.insert("total".to_string(), vec![total]);
///         t
///     })
///     .boxed(),
/// ]);
///
/// let table = Table::from([("a".to_string(), vec![1, 2]), ("b".to_string(), vec![3])]);
/// assert_eq!(processor.execute(table).unwrap()["total"], vec![6]);
/// ```
pub struct PipeProcessor<T, E = BoxError> {
    pipeline: Pipeline<T, E>,
}

impl<T, E> PipeProcessor<T, E> {
    /// Create a processor whose stages take no extra arguments
    pub fn new(funcs: Vec<BoxedStage<T, E>>) -> Self {
        Self {
            pipeline: Pipeline::new(funcs).named("pipe_processor"),
        }
    }

    /// Create a processor with per-stage or shared keyword arguments
    pub fn with_kwargs(
        funcs: Vec<BoxedStage<T, E>>,
        kwargs: impl Into<KwargsSpec>,
    ) -> ConfigResult<Self> {
        Ok(Self {
            pipeline: Pipeline::with_kwargs(funcs, kwargs)?.named("pipe_processor"),
        })
    }

    /// Rename the processor
    pub fn named(self, name: impl Into<String>) -> Self {
        Self {
            pipeline: self.pipeline.named(name),
        }
    }

    pub fn name(&self) -> &str {
        self.pipeline.name()
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

    /// Apply every stage to `table` in order
    pub fn execute(&self, table: T) -> Result<T, E> {
        self.pipeline.execute(table)
    }

    /// Same as `execute()` but also returns per-stage timings
    pub fn execute_with_report(&self, table: T) -> Result<(T, RunReport), E> {
        self.pipeline.execute_with_report(table)
    }
}

impl<T, E> Stage<T, E> for PipeProcessor<T, E> {
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
