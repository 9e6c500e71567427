//! Template provisioning error types.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised by discovery, extraction, and source validation.
///
/// Per-source discovery failures are logged and skipped by the aggregation
/// layer; the variants here surface when an operation as a whole cannot
/// proceed.
#[derive(Error, Debug)]
pub enum ProvisioningError {
    /// The source string is neither an http(s) feed root nor a usable
    /// directory path.
    #[error("Invalid template source: {value}")]
    InvalidSource { value: String },

    /// A feed or network operation failed.
    #[error("Template source unreachable: {source_name} - {reason}")]
    SourceUnreachable { source_name: String, reason: String },

    /// The requested package/version was not found in any configured
    /// source.
    #[error("Template package '{package_id}' version '{version}' was not found in any configured source")]
    PackageNotFound { package_id: String, version: String },

    /// Archive or filesystem handling failed during extraction.
    #[error("Template extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    /// The operation was canceled by the caller. Distinct from failure.
    #[error("Operation canceled")]
    Canceled,
}

/// Result type alias for provisioning operations.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
