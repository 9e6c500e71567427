//! Configuration assembly pipeline.
//!
//! Builds a [`Configuration`] through a fixed sequence of layers:
//!
//! 1. Seed from a template's defaults (built-in or externally supplied) or
//!    from a bare base image.
//! 2. Add one feature entry per resolved feature, keyed
//!    `repository:version`, carrying that feature's default options.
//! 3. Compute recommended editor extensions from the resolved feature ids,
//!    union them with user-specified extension ids, and write the combined
//!    deduplicated list.
//! 4. Route user custom settings: two reserved keys land on dedicated
//!    configuration fields, everything else is written into the
//!    customizations map verbatim. Empty values are skipped.

use crate::configuration::Configuration;
use crate::templates::TemplateDefaults;
use feature_resolver::{OptionValue, ResolutionResult};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod tests;

/// Reserved custom-setting key routed to the workspace-folder field.
pub const WORKSPACE_FOLDER_KEY: &str = "workspaceFolder";
/// Reserved custom-setting key routed to the post-create-command field.
pub const POST_CREATE_COMMAND_KEY: &str = "postCreateCommand";

/// What a new configuration is seeded from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationSeed {
    /// A template's default field set - built-in, or the equivalent fields
    /// of an externally distributed template.
    Template(TemplateDefaults),
    /// A bare base image when no template is selected.
    BaseImage(String),
}

/// Capability that derives recommended editor extensions from resolved
/// feature ids. The real recommendation logic lives outside this crate;
/// [`StaticExtensionRecommender`] covers the built-in feature set.
pub trait ExtensionRecommender: Send + Sync {
    fn recommend(&self, feature_ids: &[String]) -> Vec<String>;
}

/// Recommender backed by a fixed feature-id-to-extension mapping.
#[derive(Debug, Clone, Default)]
pub struct StaticExtensionRecommender;

impl ExtensionRecommender for StaticExtensionRecommender {
    fn recommend(&self, feature_ids: &[String]) -> Vec<String> {
        let mut extensions = Vec::new();
        for id in feature_ids {
            let base = id.split_once(':').map(|(base, _)| base).unwrap_or(id);
            let recommended: &[&str] = match base {
                "rust" => &["rust-lang.rust-analyzer"],
                "node" => &["dbaeumer.vscode-eslint"],
                "python" => &["ms-python.python"],
                "go" => &["golang.go"],
                "docker" | "docker-in-docker" => &["ms-azuretools.vscode-docker"],
                _ => &[],
            };
            for extension in recommended {
                extensions.push(extension.to_string());
            }
        }
        extensions
    }
}

/// Stateless configuration assembler.
///
/// # Examples
///
/// ```rust
/// use config_composer::{ConfigurationAssembler, ConfigurationSeed};
/// use feature_resolver::{resolve_features, InMemoryFeatureCatalog};
/// use std::collections::BTreeMap;
///
/// let assembler = ConfigurationAssembler::default();
/// let resolution = resolve_features(&[], &InMemoryFeatureCatalog::default());
///
/// let config = assembler.assemble(
///     "my-project",
///     ConfigurationSeed::BaseImage("ubuntu:24.04".to_string()),
///     &resolution,
///     &[],
///     &BTreeMap::new(),
/// );
/// assert_eq!(config.image.as_deref(), Some("ubuntu:24.04"));
/// ```
pub struct ConfigurationAssembler {
    recommender: Box<dyn ExtensionRecommender>,
}

impl Default for ConfigurationAssembler {
    fn default() -> Self {
        Self::new(Box::new(StaticExtensionRecommender))
    }
}

impl ConfigurationAssembler {
    /// Create an assembler with a caller-supplied recommender.
    pub fn new(recommender: Box<dyn ExtensionRecommender>) -> Self {
        Self { recommender }
    }

    /// Run the full assembly pipeline.
    pub fn assemble(
        &self,
        name: &str,
        seed: ConfigurationSeed,
        resolution: &ResolutionResult,
        user_extensions: &[String],
        custom_settings: &BTreeMap<String, OptionValue>,
    ) -> Configuration {
        let mut config = self.seed_configuration(name, seed);
        self.apply_features(&mut config, resolution);
        self.apply_extensions(&mut config, resolution, user_extensions);
        self.apply_custom_settings(&mut config, custom_settings);
        config
    }

    fn seed_configuration(&self, name: &str, seed: ConfigurationSeed) -> Configuration {
        let mut config = Configuration::new(name);
        match seed {
            ConfigurationSeed::BaseImage(image) => {
                config.image = Some(image);
            }
            ConfigurationSeed::Template(template) => {
                debug!(template = %template.name, "Seeding configuration from template defaults");
                config.image = Some(template.image);
                for port in template.forward_ports {
                    config.add_forward_port(port);
                }
                config.container_env = template.container_env;
                config.post_create_command = template.post_create_command;
                config.customizations = template.customizations;
            }
        }
        config
    }

    fn apply_features(&self, config: &mut Configuration, resolution: &ResolutionResult) {
        for feature in &resolution.resolved {
            config
                .features
                .insert(feature.feature_key(), feature.default_options.clone());
        }
    }

    fn apply_extensions(
        &self,
        config: &mut Configuration,
        resolution: &ResolutionResult,
        user_extensions: &[String],
    ) {
        let recommended = self.recommender.recommend(&resolution.resolved_ids());

        let mut combined: Vec<String> = Vec::new();
        let seeded = config
            .editor_extensions()
            .map(|e| e.to_vec())
            .unwrap_or_default();
        for extension in seeded
            .into_iter()
            .chain(recommended)
            .chain(user_extensions.iter().cloned())
        {
            if !combined.contains(&extension) {
                combined.push(extension);
            }
        }

        if !combined.is_empty() {
            config.set_editor_extensions(combined);
        }
    }

    fn apply_custom_settings(
        &self,
        config: &mut Configuration,
        custom_settings: &BTreeMap<String, OptionValue>,
    ) {
        for (key, value) in custom_settings {
            if value.is_empty() {
                debug!(key = %key, "Skipping empty custom setting");
                continue;
            }
            match key.as_str() {
                WORKSPACE_FOLDER_KEY => match value {
                    OptionValue::String(folder) => config.workspace_folder = Some(folder.clone()),
                    other => {
                        warn!(key = %key, "Reserved key expects a string, got a {}", other.type_name());
                    }
                },
                POST_CREATE_COMMAND_KEY => match value {
                    OptionValue::String(command) => {
                        config.post_create_command = Some(command.clone())
                    }
                    other => {
                        warn!(key = %key, "Reserved key expects a string, got a {}", other.type_name());
                    }
                },
                _ => {
                    config.customizations.insert(key.clone(), value.clone());
                }
            }
        }
    }
}
