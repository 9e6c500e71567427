//! Built-in template registry.
//!
//! A built-in template is a named bundle of defaults a configuration is
//! seeded from: image, default forwarded ports, default container
//! environment, default post-create command, and default customizations.
//! Externally distributed template packages supply the same field set
//! through [`TemplateDefaults`] after their metadata is parsed.

use crate::errors::{CompositionError, CompositionResult};
use feature_resolver::OptionValue;
use std::collections::BTreeMap;

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;

/// The seed fields a template contributes to a new configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateDefaults {
    /// Template name, used for lookup and diagnostics.
    pub name: String,
    /// Base container image.
    pub image: String,
    /// Ports forwarded by default.
    pub forward_ports: Vec<i64>,
    /// Container environment applied by default.
    pub container_env: BTreeMap<String, String>,
    /// Post-create command run once after the container is built.
    pub post_create_command: Option<String>,
    /// Default customization entries, e.g. seed editor extensions.
    pub customizations: BTreeMap<String, OptionValue>,
}

impl TemplateDefaults {
    fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            ..Self::default()
        }
    }

    fn with_port(mut self, port: i64) -> Self {
        self.forward_ports.push(port);
        self
    }

    fn with_env(mut self, key: &str, value: &str) -> Self {
        self.container_env.insert(key.to_string(), value.to_string());
        self
    }

    fn with_post_create(mut self, command: &str) -> Self {
        self.post_create_command = Some(command.to_string());
        self
    }

    fn with_seed_extensions(mut self, extensions: &[&str]) -> Self {
        let mut editor = BTreeMap::new();
        editor.insert(
            crate::configuration::EXTENSIONS_KEY.to_string(),
            OptionValue::StringList(extensions.iter().map(|e| e.to_string()).collect()),
        );
        self.customizations.insert(
            crate::configuration::EDITOR_CUSTOMIZATION_KEY.to_string(),
            OptionValue::Map(editor),
        );
        self
    }
}

/// All built-in templates, in stable order.
pub fn built_in_templates() -> Vec<TemplateDefaults> {
    vec![
        TemplateDefaults::new("rust", "mcr.microsoft.com/devcontainers/rust:1")
            .with_env("CARGO_TERM_COLOR", "always")
            .with_post_create("cargo fetch")
            .with_seed_extensions(&["rust-lang.rust-analyzer"]),
        TemplateDefaults::new("node", "mcr.microsoft.com/devcontainers/javascript-node:22")
            .with_port(3000)
            .with_post_create("npm install")
            .with_seed_extensions(&["dbaeumer.vscode-eslint"]),
        TemplateDefaults::new("python", "mcr.microsoft.com/devcontainers/python:3.12")
            .with_env("PYTHONUNBUFFERED", "1")
            .with_post_create("pip install -r requirements.txt")
            .with_seed_extensions(&["ms-python.python"]),
        TemplateDefaults::new("go", "mcr.microsoft.com/devcontainers/go:1.23")
            .with_env("CGO_ENABLED", "0")
            .with_post_create("go mod download")
            .with_seed_extensions(&["golang.go"]),
    ]
}

/// Look up a built-in template by name.
pub fn find_built_in(name: &str) -> Option<TemplateDefaults> {
    built_in_templates().into_iter().find(|t| t.name == name)
}

/// Look up a built-in template, failing with a named error when absent.
pub fn require_built_in(name: &str) -> CompositionResult<TemplateDefaults> {
    find_built_in(name).ok_or_else(|| CompositionError::TemplateNotFound {
        name: name.to_string(),
    })
}
