use super::core::{bind_stages, BoundStage, BoxedStage, RunReport, Stage, StageReport};
use crate::error::{BoxError, ConfigResult};
use crate::kwargs::{Kwargs, KwargsSpec};
use std::time::Instant;
use tracing::{debug, trace};

/// Pipeline executor that runs stages sequentially
///
/// Each stage receives the previous stage's output. The first error stops the
/// run and is returned unchanged; later stages never execute.
///
/// # Example
/// ```
/// use stagepipe::{map, Pipeline, Stage};
///
/// let pipeline: Pipeline<i64> = Pipeline::new(vec![
///     map("add_two", |x: i64| x + 2).boxed(),
///     map("mult_two", |x: i64| x * 2).boxed(),
/// ]);
///
/// assert_eq!(pipeline.execute(2).unwrap(), 8);
/// ```
pub struct Pipeline<V, E = BoxError> {
    name: String,
    stages: Vec<BoundStage<V, E>>,
}

impl<V, E> Pipeline<V, E> {
    /// Create a pipeline whose stages take no extra arguments
    pub fn new(funcs: Vec<BoxedStage<V, E>>) -> Self {
        Self {
            name: "pipeline".to_string(),
            stages: funcs
                .into_iter()
                .map(|stage| BoundStage::new(stage, Kwargs::default()))
                .collect(),
        }
    }

    /// Create a pipeline with keyword arguments for its stages
    ///
    /// `kwargs` is either one entry per stage or a single mapping shared by every
    /// stage that declares the matching parameter names.
    pub fn with_kwargs(
        funcs: Vec<BoxedStage<V, E>>,
        kwargs: impl Into<KwargsSpec>,
    ) -> ConfigResult<Self> {
        Ok(Self {
            name: "pipeline".to_string(),
            stages: bind_stages(funcs, kwargs.into())?,
        })
    }

    /// Create a new pipeline builder
    pub fn builder(name: impl Into<String>) -> PipelineBuilder<V, E> {
        PipelineBuilder::new(name)
    }

    /// Rename the pipeline
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Get the stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(BoundStage::name).collect()
    }

    /// Get the bound stages in execution order
    pub fn stages(&self) -> &[BoundStage<V, E>] {
        &self.stages
    }

    /// Run every stage over `input` and return the final value
    ///
    /// An empty pipeline returns its input unchanged.
    pub fn execute(&self, input: V) -> Result<V, E> {
        self.execute_internal(input, None)
    }

    /// Same as `execute()` but also returns per-stage timings
    pub fn execute_with_report(&self, input: V) -> Result<(V, RunReport), E> {
        let pipeline_start = Instant::now();
        let mut stage_reports = Vec::with_capacity(self.stages.len());
        let output = self.execute_internal(input, Some(&mut stage_reports))?;

        Ok((
            output,
            RunReport::new(&self.name, stage_reports, pipeline_start.elapsed()),
        ))
    }

    fn execute_internal(
        &self,
        input: V,
        mut stage_reports: Option<&mut Vec<StageReport>>,
    ) -> Result<V, E> {
        let pipeline = self.name.as_str();
        let total = self.stages.len();
        debug!(pipeline, stages = total, "starting pipeline");

        let pipeline_start = Instant::now();
        let mut value = input;

        for (index, stage) in self.stages.iter().enumerate() {
            trace!(
                pipeline,
                stage = stage.name(),
                index = index + 1,
                total,
                "executing stage"
            );

            let stage_start = Instant::now();
            value = stage.apply(value)?;

            if let Some(reports) = stage_reports.as_deref_mut() {
                reports.push(StageReport::new(stage.name(), stage_start.elapsed()));
            }
        }

        debug!(
            pipeline,
            elapsed = ?pipeline_start.elapsed(),
            "pipeline completed"
        );
        Ok(value)
    }
}

/// A pipeline is itself a stage, so pipelines nest
///
/// The nested pipeline declares no keyword arguments of its own; its stages
/// already carry theirs.
impl<V, E> Stage<V, E> for Pipeline<V, E> {
    fn call(&self, value: V, _kwargs: &Kwargs) -> Result<V, E> {
        self.execute(value)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> Option<&[String]> {
        Some(&[])
    }
}

/// Builder for constructing pipelines
pub struct PipelineBuilder<V, E = BoxError> {
    name: String,
    stages: Vec<BoxedStage<V, E>>,
    kwargs: Vec<Option<Kwargs>>,
    shared: Option<Kwargs>,
}

impl<V, E> PipelineBuilder<V, E> {
    /// Create a new pipeline builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            kwargs: Vec::new(),
            shared: None,
        }
    }

    /// Add a stage called without extra arguments
    pub fn stage<S: Stage<V, E> + 'static>(self, stage: S) -> Self {
        self.boxed_stage(Box::new(stage))
    }

    /// Add a stage with its keyword arguments
    pub fn stage_with<S: Stage<V, E> + 'static>(mut self, stage: S, kwargs: Kwargs) -> Self {
        self.stages.push(Box::new(stage));
        self.kwargs.push(Some(kwargs));
        self
    }

    /// Add a boxed stage to the pipeline
    pub fn boxed_stage(mut self, stage: BoxedStage<V, E>) -> Self {
        self.stages.push(stage);
        self.kwargs.push(None);
        self
    }

    /// Offer one mapping to every stage that declares the matching names
    ///
    /// Arguments given through `stage_with` are layered on top and win on
    /// conflicting names. Stages without a declared signature get nothing from
    /// the shared mapping.
    pub fn shared_kwargs(mut self, kwargs: Kwargs) -> Self {
        self.shared = Some(kwargs);
        self
    }

    /// Build the pipeline, checking every stage accepts its arguments
    pub fn build(self) -> ConfigResult<Pipeline<V, E>> {
        let kwargs = match self.shared {
            None => self.kwargs,
            Some(shared) => self
                .stages
                .iter()
                .zip(self.kwargs)
                .map(|(stage, own)| {
                    let mut merged = match stage.params() {
                        Some(params) => shared.select(params),
                        None => Kwargs::default(),
                    };
                    if let Some(own) = own {
                        merged.merge(own);
                    }
                    Some(merged)
                })
                .collect(),
        };

        Ok(Pipeline {
            name: self.name,
            stages: bind_stages(self.stages, KwargsSpec::PerStage(kwargs))?,
        })
    }
}
