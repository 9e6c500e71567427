//! Request and result types for environment scaffolding.

use config_composer::Configuration;
use feature_resolver::{OptionValue, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::generator::GeneratedFile;

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// What the environment is scaffolded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSelection {
    /// One of the built-in language templates, by name.
    BuiltIn { name: String },
    /// An externally distributed template package.
    Package { package_id: String, version: String },
}

/// A request to scaffold one development environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldRequest {
    /// Name of the environment being created.
    pub name: String,
    /// Template or package to scaffold from.
    pub template: TemplateSelection,
    /// Feature ids the user asked for.
    pub features: Vec<String>,
    /// Editor extension ids the user asked for.
    pub extensions: Vec<String>,
    /// Free-form overrides applied last during assembly.
    pub custom_settings: BTreeMap<String, OptionValue>,
    /// Directory the scaffolded files land in.
    pub output_path: PathBuf,
}

impl ScaffoldRequest {
    /// Create a minimal request with no features, extensions, or overrides.
    pub fn new(
        name: impl Into<String>,
        template: TemplateSelection,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            template,
            features: Vec::new(),
            extensions: Vec::new(),
            custom_settings: BTreeMap::new(),
            output_path: output_path.into(),
        }
    }

    pub fn with_feature(mut self, id: impl Into<String>) -> Self {
        self.features.push(id.into());
        self
    }

    pub fn with_extension(mut self, id: impl Into<String>) -> Self {
        self.extensions.push(id.into());
        self
    }

    pub fn with_custom_setting(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.custom_settings.insert(key.into(), value);
        self
    }
}

/// Aggregated outcome of one scaffold run.
///
/// Every path through orchestration produces exactly one of these; the
/// severity grades how the run ended and `errors`/`warnings` carry the
/// individual findings in the order they were detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldResult {
    pub success: bool,
    pub message: String,
    pub severity: Severity,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// The assembled configuration, when assembly ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
    /// Files produced by the generator, when generation ran.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub generated_files: Vec<GeneratedFile>,
}

impl ScaffoldResult {
    /// A successful run, with any advisory warnings carried along.
    pub fn success(message: impl Into<String>, warnings: Vec<String>) -> Self {
        let severity = if warnings.is_empty() {
            Severity::None
        } else {
            Severity::Warning
        };
        Self {
            success: true,
            message: message.into(),
            severity,
            errors: Vec::new(),
            warnings,
            configuration: None,
            generated_files: Vec::new(),
        }
    }

    /// A failed run with error-grade findings.
    pub fn failure(message: impl Into<String>, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            severity: Severity::Error,
            errors,
            warnings,
            configuration: None,
            generated_files: Vec::new(),
        }
    }

    /// A run aborted by an internal fault, preserving the underlying
    /// message.
    pub fn critical(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            message: message.clone(),
            severity: Severity::Critical,
            errors: vec![message],
            warnings: Vec::new(),
            configuration: None,
            generated_files: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_generated_files(mut self, files: Vec<GeneratedFile>) -> Self {
        self.generated_files = files;
        self
    }
}
