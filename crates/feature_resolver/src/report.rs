//! Validation reporting types shared across resolution and configuration
//! validation.
//!
//! A [`ValidationReport`] accumulates errors and warnings and carries a
//! graded [`Severity`]. Components report expected domain failures through
//! these types instead of raising; callers treat a severity of
//! [`Severity::Error`] or above as blocking.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// Graded outcome severity, ordered from benign to fatal.
///
/// - `None` - the check passed cleanly
/// - `Warning` - advisory findings only, non-blocking
/// - `Error` - structural violations; callers must not proceed
/// - `Critical` - the checking machinery itself faulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    None,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Whether a result at this severity blocks further processing.
    pub fn is_blocking(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::None => "none",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        write!(f, "{}", label)
    }
}

/// A single validation finding tied to the field that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Path of the offending field, e.g. `"image"` or
    /// `"features.ghcr.io/devcontainers/features/rust:1.version"`.
    pub field: String,
    /// Human-readable description of the finding.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accumulated validation outcome.
///
/// Severity resolves from the accumulated findings: `Error` when any error
/// is present, else `Warning` when only warnings exist, else `None`. A
/// `Critical` severity is set explicitly by callers that caught an internal
/// fault in the validation machinery itself.
///
/// # Examples
///
/// ```rust
/// use feature_resolver::{Severity, ValidationReport};
///
/// let mut report = ValidationReport::new();
/// assert!(report.is_valid());
/// assert_eq!(report.severity(), Severity::None);
///
/// report.add_warning("features", "no features declared");
/// assert!(report.is_valid());
/// assert_eq!(report.severity(), Severity::Warning);
///
/// report.add_error("name", "name must not be empty");
/// assert!(!report.is_valid());
/// assert_eq!(report.severity(), Severity::Error);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Blocking findings.
    pub errors: Vec<ValidationIssue>,
    /// Advisory findings.
    pub warnings: Vec<ValidationIssue>,
    /// Set when the validator itself faulted; overrides the derived grade.
    critical: bool,
}

impl ValidationReport {
    /// Create an empty report (severity `None`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a report representing an internal validator fault, preserving
    /// the underlying message for diagnostics.
    pub fn critical(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![ValidationIssue::new(field, message)],
            warnings: Vec::new(),
            critical: true,
        }
    }

    /// Whether validation passed (no errors, no internal fault).
    pub fn is_valid(&self) -> bool {
        !self.critical && self.errors.is_empty()
    }

    /// Resolve the graded severity from the accumulated findings.
    pub fn severity(&self) -> Severity {
        if self.critical {
            Severity::Critical
        } else if !self.errors.is_empty() {
            Severity::Error
        } else if !self.warnings.is_empty() {
            Severity::Warning
        } else {
            Severity::None
        }
    }

    /// Add a blocking finding.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(field, message));
    }

    /// Add an advisory finding.
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(field, message));
    }

    /// Fold another report into this one, prefixing each imported finding's
    /// field path. Used to scope per-feature option validation under the
    /// owning feature key.
    pub fn absorb_prefixed(&mut self, prefix: &str, other: ValidationReport) {
        self.critical |= other.critical;
        for issue in other.errors {
            self.errors.push(ValidationIssue::new(
                format!("{}.{}", prefix, issue.field),
                issue.message,
            ));
        }
        for issue in other.warnings {
            self.warnings.push(ValidationIssue::new(
                format!("{}.{}", prefix, issue.field),
                issue.message,
            ));
        }
    }
}
