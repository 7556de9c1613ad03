//! Stages built from plain functions and closures
//!
//! Most pipelines are assembled from ordinary functions rather than hand-written
//! [`Stage`] impls. [`FnStage`] wraps a function of `(value, &Kwargs)`; [`map`]
//! and [`try_map`] cover the common case of a stage that takes no arguments.

use super::core::Stage;
use crate::kwargs::Kwargs;

/// Stage backed by a function of `(value, &Kwargs) -> Result<value, E>`
///
/// # Example
/// ```
/// use stagepipe::{BoxError, FnStage, Kwargs, Pipeline, Stage};
///
/// fn add(value: i64, kwargs: &Kwargs) -> Result<i64, BoxError> {
///     Ok(value + kwargs.get::<i64>("x")?)
/// }
///
/// let pipeline = Pipeline::with_kwargs(
///     vec![FnStage::new("add", add).with_params(["x"]).boxed()],
///     vec![Kwargs::new().with("x", 2)],
/// )
/// .unwrap();
///
/// assert_eq!(pipeline.execute(1).unwrap(), 3);
/// ```
pub struct FnStage<F> {
    name: String,
    params: Option<Vec<String>>,
    func: F,
}

impl<F> FnStage<F> {
    /// Create a stage with an undeclared signature
    pub fn new<V, E>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(V, &Kwargs) -> Result<V, E> + Send + Sync,
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

impl<V, E, F> Stage<V, E> for FnStage<F>
where
    F: Fn(V, &Kwargs) -> Result<V, E> + Send + Sync,
{
    fn call(&self, value: V, kwargs: &Kwargs) -> Result<V, E> {
        (self.func)(value, kwargs)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> Option<&[String]> {
        self.params.as_deref()
    }
}

/// Stage from an infallible function that takes no keyword arguments
pub struct MapStage<F> {
    name: String,
    func: F,
}

/// Wrap an infallible `value -> value` function as a stage
pub fn map<F>(name: impl Into<String>, func: F) -> MapStage<F> {
    MapStage {
        name: name.into(),
        func,
    }
}

impl<V, E, F> Stage<V, E> for MapStage<F>
where
    F: Fn(V) -> V + Send + Sync,
{
    fn call(&self, value: V, _kwargs: &Kwargs) -> Result<V, E> {
        Ok((self.func)(value))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> Option<&[String]> {
        Some(&[])
    }
}

/// Stage from a fallible function that takes no keyword arguments
pub struct TryMapStage<F> {
    name: String,
    func: F,
}

/// Wrap a fallible `value -> Result<value, E>` function as a stage
pub fn try_map<F>(name: impl Into<String>, func: F) -> TryMapStage<F> {
    TryMapStage {
        name: name.into(),
        func,
    }
}

impl<V, E, F> Stage<V, E> for TryMapStage<F>
where
    F: Fn(V) -> Result<V, E> + Send + Sync,
{
    fn call(&self, value: V, _kwargs: &Kwargs) -> Result<V, E> {
        (self.func)(value)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> Option<&[String]> {
        Some(&[])
    }
}
