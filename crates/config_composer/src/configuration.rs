//! The configuration aggregate.
//!
//! Serializes with camelCase keys mirroring the devcontainer configuration
//! shape: `name`, `image`, `build{dockerfile,context}`, `features`,
//! `customizations`, `forwardPorts`, `remoteEnv`, `containerEnv`, `mounts`,
//! `runArgs`, `runServices`, `workspaceFolder`, `postCreateCommand`,
//! `dockerComposeFile`, `service`. Empty collections and absent scalars are
//! skipped so the emitted JSON stays minimal.

use feature_resolver::OptionValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;

/// Customizations key the editor block lives under.
pub const EDITOR_CUSTOMIZATION_KEY: &str = "vscode";
/// Key of the extension list inside the editor block.
pub const EXTENSIONS_KEY: &str = "extensions";

/// Build specification used instead of a prebuilt image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    /// Dockerfile path relative to the configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    /// Build context directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl BuildSpec {
    /// Whether the spec carries neither a dockerfile nor a context.
    pub fn is_empty(&self) -> bool {
        self.dockerfile.as_deref().unwrap_or("").is_empty()
            && self.context.as_deref().unwrap_or("").is_empty()
    }
}

/// The aggregate, serializable description of a development-container
/// environment.
///
/// Owned by the caller for the duration of one creation or update
/// operation; none of the operations in this crate retain it.
///
/// # Examples
///
/// ```rust
/// use config_composer::Configuration;
///
/// let mut config = Configuration::new("my-project");
/// config.image = Some("mcr.microsoft.com/devcontainers/base:ubuntu".to_string());
/// config.add_forward_port(8080);
///
/// let json = serde_json::to_value(&config).unwrap();
/// assert_eq!(json["forwardPorts"][0], 8080);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Display name; validated against `^[A-Za-z0-9_-]+$`.
    pub name: String,

    /// Prebuilt container image. Mutually exclusive with `build`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Build specification. Mutually exclusive with `image`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSpec>,

    /// Declared features keyed by `repository:version`, each carrying its
    /// option map.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, BTreeMap<String, OptionValue>>,

    /// Open customization map; the editor extension list lives at
    /// `customizations.vscode.extensions`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub customizations: BTreeMap<String, OptionValue>,

    /// Ports forwarded from the container. Unique, insertion ordered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forward_ports: Vec<i64>,

    /// Environment applied to the remote user session.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remote_env: BTreeMap<String, String>,

    /// Environment applied to the container itself.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub container_env: BTreeMap<String, String>,

    /// Mount declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<String>,

    /// Extra container runtime arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_args: Vec<String>,

    /// Compose services started alongside the primary container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_services: Vec<String>,

    /// Workspace folder inside the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folder: Option<String>,

    /// Command executed once after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_create_command: Option<String>,

    /// Compose file, when the environment is compose-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_compose_file: Option<String>,

    /// Primary compose service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl Configuration {
    /// Create an empty configuration with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a forwarded port, keeping the list unique and insertion ordered.
    pub fn add_forward_port(&mut self, port: i64) {
        if !self.forward_ports.contains(&port) {
            self.forward_ports.push(port);
        }
    }

    /// The editor extension list, when one has been written.
    pub fn editor_extensions(&self) -> Option<&[String]> {
        let OptionValue::Map(editor) = self.customizations.get(EDITOR_CUSTOMIZATION_KEY)? else {
            return None;
        };
        editor.get(EXTENSIONS_KEY)?.as_string_list()
    }

    /// Write the editor extension list, creating the editor block when
    /// absent and preserving its other entries when present.
    pub fn set_editor_extensions(&mut self, extensions: Vec<String>) {
        let editor = self
            .customizations
            .entry(EDITOR_CUSTOMIZATION_KEY.to_string())
            .or_insert_with(|| OptionValue::Map(BTreeMap::new()));
        if let OptionValue::Map(entries) = editor {
            entries.insert(
                EXTENSIONS_KEY.to_string(),
                OptionValue::StringList(extensions),
            );
        } else {
            // A scalar under the editor key is replaced outright.
            let mut entries = BTreeMap::new();
            entries.insert(
                EXTENSIONS_KEY.to_string(),
                OptionValue::StringList(extensions),
            );
            *editor = OptionValue::Map(entries);
        }
    }
}
