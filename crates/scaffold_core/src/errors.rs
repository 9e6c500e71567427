//! The aggregated error taxonomy for scaffold orchestration.
//!
//! Expected domain conditions (missing features, conflicts, validation
//! findings) travel inside [`crate::ScaffoldResult`]; these variants cover
//! the infrastructure faults the lower crates can surface.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Faults that abort a scaffold run before it can produce a graded result.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// A named template or package does not exist.
    #[error("'{name}' was not found")]
    NotFound { name: String },

    /// A configured source could not be reached.
    #[error("source '{source_name}' is unreachable: {reason}")]
    SourceUnreachable { source_name: String, reason: String },

    /// Unpacking a template package failed partway.
    #[error("extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    /// The caller canceled the operation.
    #[error("the operation was canceled")]
    Canceled,
}

impl From<template_provisioning::ProvisioningError> for ScaffoldError {
    fn from(e: template_provisioning::ProvisioningError) -> Self {
        use template_provisioning::ProvisioningError;
        match e {
            ProvisioningError::Canceled => ScaffoldError::Canceled,
            ProvisioningError::PackageNotFound {
                package_id,
                version,
            } => ScaffoldError::NotFound {
                name: format!("{}@{}", package_id, version),
            },
            ProvisioningError::SourceUnreachable {
                source_name,
                reason,
            } => ScaffoldError::SourceUnreachable {
                source_name,
                reason,
            },
            ProvisioningError::InvalidSource { value } => ScaffoldError::SourceUnreachable {
                source_name: value,
                reason: "not a feed URL or directory".to_string(),
            },
            ProvisioningError::ExtractionFailed { reason } => {
                ScaffoldError::ExtractionFailed { reason }
            }
        }
    }
}

/// Result type for orchestration internals.
pub type ScaffoldCoreResult<T> = Result<T, ScaffoldError>;
