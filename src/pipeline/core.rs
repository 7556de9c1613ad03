use crate::error::{BoxError, ConfigResult};
use crate::kwargs::{Kwargs, KwargsSpec, Signature};
use std::sync::Arc;
use std::time::Duration;

/// A single stage in a pipeline
///
/// A stage takes the value flowing through the pipeline plus its bound keyword
/// arguments and returns the next value. Errors are returned as-is to whoever
/// invoked the pipeline.
///
/// # Example
/// ```
/// use stagepipe::{BoxError, Kwargs, Stage};
///
/// struct AddStage;
///
/// impl Stage<i64> for AddStage {
///     fn call(&self, value: i64, kwargs: &Kwargs) -> Result<i64, BoxError> {
///         Ok(value + kwargs.get::<i64>("x")?)
///     }
///
///     fn name(&self) -> &str {
///         "add"
///     }
///
///     fn params(&self) -> Option<&[String]> {
///         None
///     }
/// }
/// ```
pub trait Stage<V, E = BoxError>: Send + Sync {
    /// Transform `value` using the stage's bound arguments
    fn call(&self, value: V, kwargs: &Kwargs) -> Result<V, E>;

    /// Stage name used in logs, reports and configuration errors
    fn name(&self) -> &str;

    /// Names of the keyword arguments this stage accepts
    ///
    /// `None` means the stage takes whatever it is given. Shared kwargs are only
    /// handed to stages that declare the matching names.
    fn params(&self) -> Option<&[String]> {
        None
    }

    /// Box the stage for use in a function list
    ///
    /// Calling this on a value that is already a [`BoxedStage`] wraps it in a
    /// second box; push such values into the list directly.
    fn boxed(self) -> BoxedStage<V, E>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<V, E, S> Stage<V, E> for Box<S>
where
    S: Stage<V, E> + ?Sized,
{
    fn call(&self, value: V, kwargs: &Kwargs) -> Result<V, E> {
        (**self).call(value, kwargs)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn params(&self) -> Option<&[String]> {
        (**self).params()
    }
}

impl<V, E, S> Stage<V, E> for Arc<S>
where
    S: Stage<V, E> + ?Sized,
{
    fn call(&self, value: V, kwargs: &Kwargs) -> Result<V, E> {
        (**self).call(value, kwargs)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn params(&self) -> Option<&[String]> {
        (**self).params()
    }
}

/// Boxed stage trait object, the element type of a pipeline's function list
pub type BoxedStage<V, E = BoxError> = Box<dyn Stage<V, E>>;

/// A stage together with the keyword arguments it is always called with
pub struct BoundStage<V, E = BoxError> {
    stage: BoxedStage<V, E>,
    kwargs: Kwargs,
}

impl<V, E> BoundStage<V, E> {
    pub(crate) fn new(stage: BoxedStage<V, E>, kwargs: Kwargs) -> Self {
        Self { stage, kwargs }
    }

    /// Apply the stage to `value` with its bound arguments
    pub fn apply(&self, value: V) -> Result<V, E> {
        self.stage.call(value, &self.kwargs)
    }

    pub fn name(&self) -> &str {
        self.stage.name()
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }
}

/// Pair every stage with its resolved keyword arguments
pub(crate) fn bind_stages<V, E>(
    stages: Vec<BoxedStage<V, E>>,
    kwargs: KwargsSpec,
) -> ConfigResult<Vec<BoundStage<V, E>>> {
    let resolved = {
        let signatures: Vec<Signature<'_>> = stages
            .iter()
            .map(|stage| Signature {
                name: stage.name(),
                params: stage.params(),
            })
            .collect();
        kwargs.resolve(&signatures)?
    };

    Ok(stages
        .into_iter()
        .zip(resolved)
        .map(|(stage, kwargs)| BoundStage { stage, kwargs })
        .collect())
}

/// Timing of a single stage in a successful run
#[derive(Debug, Clone)]
pub struct StageReport {
    /// Stage name
    pub stage_name: String,

    /// Duration of execution
    pub duration: Duration,
}

impl StageReport {
    pub fn new(stage_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            stage_name: stage_name.into(),
            duration,
        }
    }
}

/// Result of a complete, successful pipeline run
///
/// Failed runs produce no report: the stage error is returned instead.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Pipeline name
    pub pipeline_name: String,

    /// One entry per top-level stage, in execution order
    pub stage_reports: Vec<StageReport>,

    /// Total duration
    pub total_duration: Duration,
}

impl RunReport {
    pub fn new(
        pipeline_name: impl Into<String>,
        stage_reports: Vec<StageReport>,
        total_duration: Duration,
    ) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            stage_reports,
            total_duration,
        }
    }

    /// Get the number of stages that were executed
    pub fn executed_stages(&self) -> usize {
        self.stage_reports.len()
    }

    /// Get the stage that took the longest (if any ran)
    pub fn slowest_stage(&self) -> Option<&StageReport> {
        self.stage_reports.iter().max_by_key(|r| r.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;

    struct AddStage {
        params: Vec<String>,
    }

    impl AddStage {
        fn new() -> Self {
            Self {
                params: vec!["x".to_string()],
            }
        }
    }

    impl Stage<i64> for AddStage {
        fn call(&self, value: i64, kwargs: &Kwargs) -> Result<i64, BoxError> {
            Ok(value + kwargs.get_or("x", 0_i64)?)
        }

        fn name(&self) -> &str {
            "add"
        }

        fn params(&self) -> Option<&[String]> {
            Some(&self.params)
        }
    }

    #[test]
    fn test_bound_stage_applies_its_kwargs() {
        let stages: Vec<BoxedStage<i64>> = vec![Box::new(AddStage::new())];
        let bound = bind_stages(stages, vec![Kwargs::new().with("x", 5)].into()).unwrap();

        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].name(), "add");
        assert_eq!(bound[0].apply(1).unwrap(), 6);
    }

    #[test]
    fn test_bind_rejects_undeclared_argument() {
        let stages: Vec<BoxedStage<i64>> = vec![Box::new(AddStage::new())];
        let result = bind_stages(stages, vec![Kwargs::new().with("y", 5)].into());

        assert!(matches!(
            result,
            Err(ConfigurationError::UnexpectedArgument { .. })
        ));
    }

    #[test]
    fn test_arc_stage_delegates() {
        let shared = Arc::new(AddStage::new());
        assert_eq!(Stage::<i64>::name(&shared), "add");
        assert_eq!(
            shared.call(1, &Kwargs::new().with("x", 1)).unwrap(),
            2
        );
    }

    #[test]
    fn test_reboxed_stage_delegates() {
        let boxed: BoxedStage<i64> = AddStage::new().boxed();
        let reboxed: BoxedStage<i64> = boxed.boxed();

        assert_eq!(reboxed.name(), "add");
        assert_eq!(reboxed.params(), Some(&["x".to_string()][..]));
        assert_eq!(reboxed.call(1, &Kwargs::new().with("x", 2)).unwrap(), 3);
    }

    #[test]
    fn test_run_report() {
        let report = RunReport::new(
            "test-pipeline",
            vec![
                StageReport::new("Stage 1", Duration::from_millis(5)),
                StageReport::new("Stage 2", Duration::from_millis(20)),
            ],
            Duration::from_millis(25),
        );

        assert_eq!(report.executed_stages(), 2);
        assert_eq!(report.slowest_stage().unwrap().stage_name, "Stage 2");
    }

    #[test]
    fn test_empty_run_report() {
        let report = RunReport::new("empty", Vec::new(), Duration::from_secs(0));
        assert_eq!(report.executed_stages(), 0);
        assert!(report.slowest_stage().is_none());
    }
}
