//! Feature catalog error types.
//!
//! Domain conditions - missing features, conflicts - are reported through
//! [`crate::ResolutionResult`] and never as errors. The variants here cover
//! infrastructure faults only.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Infrastructure errors raised by catalog loading and refresh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// The backing catalog source could not be reached or produced
    /// unusable data.
    #[error("Feature catalog source unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// The catalog source returned a payload that could not be decoded.
    #[error("Failed to parse feature catalog payload: {reason}")]
    CatalogParseFailed { reason: String },
}

/// Result type alias for catalog operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
