//! The file generation seam.
//!
//! Orchestration hands the validated configuration to an implementation of
//! [`FileGenerator`] and reports per-file outcomes; it never writes files
//! itself. No production implementation ships in this crate.

use async_trait::async_trait;
use config_composer::Configuration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;

/// Knobs for a generation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Replace files that already exist at the destination.
    pub overwrite: bool,
}

/// Outcome for one file a generator attempted to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path of the file, relative to the output directory.
    pub path: PathBuf,
    /// Whether the file was written.
    pub success: bool,
    /// Failure description when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl GeneratedFile {
    pub fn written(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Capability that materializes a configuration as files on disk.
#[async_trait]
pub trait FileGenerator: Send + Sync {
    /// Produce every output file for `configuration` under `output_path`,
    /// reporting one entry per attempted file.
    async fn generate_all(
        &self,
        configuration: &Configuration,
        output_path: &Path,
        options: &GenerationOptions,
    ) -> Vec<GeneratedFile>;
}
