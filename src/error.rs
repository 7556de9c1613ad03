use thiserror::Error;

/// Default error type for stage functions.
///
/// Any error a stage returns travels back to the caller untouched, so the
/// concrete type is up to the user. This alias is what you get when you
/// don't pick one.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while constructing a pipeline or processor
#[derive(Error, Debug)]
pub enum ConfigurationError {
    // ============================================================================
    // Stage/argument layout errors
    // ============================================================================
    #[error("kwargs length ({kwargs}) does not match funcs length ({funcs})")]
    LengthMismatch { funcs: usize, kwargs: usize },

    #[error("stage '{stage}' got an unexpected keyword argument '{argument}'")]
    UnexpectedArgument { stage: String, argument: String },

    // ============================================================================
    // Kwargs file errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid kwargs definition: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by stage functions while reading their keyword arguments
#[derive(Error, Debug)]
pub enum KwargError {
    #[error("missing required keyword argument '{name}'")]
    Missing { name: String },

    #[error("keyword argument '{name}' has the wrong type: {source}")]
    InvalidType {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

// Helper type alias for construction results
pub type ConfigResult<T> = Result<T, ConfigurationError>;
