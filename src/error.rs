//! Error types for the evolutionary engine.

use thiserror::Error;

/// Boxed error produced by an external fitness function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or running the engine.
#[derive(Debug, Error)]
pub enum EvolveError {
    /// A configuration value, evolve option, or operator table is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The external fitness function failed.
    ///
    /// The engine does not retry; population state is left as it was
    /// before the failing call.
    #[error("fitness function failed: {0}")]
    Fitness(#[source] BoxError),
}

impl EvolveError {
    /// Shorthand for [`EvolveError::InvalidConfiguration`].
    pub fn config(msg: impl Into<String>) -> Self {
        EvolveError::InvalidConfiguration(msg.into())
    }

    /// Wraps an arbitrary error raised inside a fitness function.
    pub fn fitness<E: Into<BoxError>>(err: E) -> Self {
        EvolveError::Fitness(err.into())
    }
}

/// Result type for engine operations.
pub type EvolveResult<T> = Result<T, EvolveError>;
