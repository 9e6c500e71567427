//! Configuration composition error types.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while preparing configuration inputs.
///
/// Assembly, merging, and validation themselves never raise for expected
/// domain conditions; these variants cover lookup failures before the
/// pipeline starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompositionError {
    /// The named built-in template does not exist.
    #[error("Built-in template not found: {name}")]
    TemplateNotFound { name: String },
}

/// Result type alias for composition operations.
pub type CompositionResult<T> = Result<T, CompositionError>;
