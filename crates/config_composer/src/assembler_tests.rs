//! Tests for the configuration assembly pipeline.

use super::*;
use crate::templates::find_built_in;
use feature_resolver::{resolve_features, FeatureDescriptor, InMemoryFeatureCatalog};

fn resolution_for(requested: &[&str], features: Vec<FeatureDescriptor>) -> ResolutionResult {
    let catalog = InMemoryFeatureCatalog::new(features);
    let ids: Vec<String> = requested.iter().map(|r| r.to_string()).collect();
    resolve_features(&ids, &catalog)
}

fn empty_resolution() -> ResolutionResult {
    resolution_for(&[], vec![])
}

#[test]
fn seeds_from_a_bare_base_image() {
    let assembler = ConfigurationAssembler::default();
    let config = assembler.assemble(
        "bare",
        ConfigurationSeed::BaseImage("ubuntu:24.04".to_string()),
        &empty_resolution(),
        &[],
        &BTreeMap::new(),
    );

    assert_eq!(config.image.as_deref(), Some("ubuntu:24.04"));
    assert!(config.features.is_empty());
    assert!(config.forward_ports.is_empty());
}

#[test]
fn seeds_from_built_in_template_defaults() {
    let assembler = ConfigurationAssembler::default();
    let template = find_built_in("node").unwrap();
    let config = assembler.assemble(
        "web",
        ConfigurationSeed::Template(template),
        &empty_resolution(),
        &[],
        &BTreeMap::new(),
    );

    assert!(config.image.as_ref().unwrap().contains("javascript-node"));
    assert_eq!(config.forward_ports, vec![3000]);
    assert_eq!(config.post_create_command.as_deref(), Some("npm install"));
    assert_eq!(
        config.editor_extensions().unwrap(),
        &["dbaeumer.vscode-eslint".to_string()]
    );
}

#[test]
fn adds_feature_entries_keyed_by_repository_and_version() {
    let assembler = ConfigurationAssembler::default();
    let resolution = resolution_for(
        &["rust"],
        vec![
            FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "1")
                .with_default_option("version", "latest"),
        ],
    );

    let config = assembler.assemble(
        "rusty",
        ConfigurationSeed::BaseImage("ubuntu:24.04".to_string()),
        &resolution,
        &[],
        &BTreeMap::new(),
    );

    let options = &config.features["ghcr.io/devcontainers/features/rust:1"];
    assert_eq!(
        options.get("version"),
        Some(&OptionValue::String("latest".to_string()))
    );
}

#[test]
fn unions_recommended_seeded_and_user_extensions_without_duplicates() {
    let assembler = ConfigurationAssembler::default();
    let template = find_built_in("rust").unwrap(); // seeds rust-analyzer
    let resolution = resolution_for(
        &["rust"],
        vec![FeatureDescriptor::new(
            "rust",
            "ghcr.io/devcontainers/features/rust",
            "1",
        )],
    );

    let config = assembler.assemble(
        "rusty",
        ConfigurationSeed::Template(template),
        &resolution,
        // User repeats one recommendation and adds one of their own.
        &[
            "rust-lang.rust-analyzer".to_string(),
            "vadimcn.vscode-lldb".to_string(),
        ],
        &BTreeMap::new(),
    );

    assert_eq!(
        config.editor_extensions().unwrap(),
        &[
            "rust-lang.rust-analyzer".to_string(),
            "vadimcn.vscode-lldb".to_string(),
        ]
    );
}

#[test]
fn reserved_keys_route_to_dedicated_fields() {
    let assembler = ConfigurationAssembler::default();
    let mut settings = BTreeMap::new();
    settings.insert(
        WORKSPACE_FOLDER_KEY.to_string(),
        OptionValue::String("/src".to_string()),
    );
    settings.insert(
        POST_CREATE_COMMAND_KEY.to_string(),
        OptionValue::String("make bootstrap".to_string()),
    );
    settings.insert(
        "containerUser".to_string(),
        OptionValue::String("vscode".to_string()),
    );

    let config = assembler.assemble(
        "routed",
        ConfigurationSeed::BaseImage("ubuntu:24.04".to_string()),
        &empty_resolution(),
        &[],
        &settings,
    );

    assert_eq!(config.workspace_folder.as_deref(), Some("/src"));
    assert_eq!(config.post_create_command.as_deref(), Some("make bootstrap"));
    assert_eq!(
        config.customizations.get("containerUser"),
        Some(&OptionValue::String("vscode".to_string()))
    );
    assert!(!config.customizations.contains_key(WORKSPACE_FOLDER_KEY));
}

#[test]
fn empty_custom_settings_are_skipped() {
    let assembler = ConfigurationAssembler::default();
    let mut settings = BTreeMap::new();
    settings.insert("emptyString".to_string(), OptionValue::String(String::new()));
    settings.insert("emptyList".to_string(), OptionValue::StringList(vec![]));

    let config = assembler.assemble(
        "skipped",
        ConfigurationSeed::BaseImage("ubuntu:24.04".to_string()),
        &empty_resolution(),
        &[],
        &settings,
    );

    assert!(config.customizations.is_empty());
}

#[test]
fn custom_post_create_command_overrides_template_default() {
    let assembler = ConfigurationAssembler::default();
    let template = find_built_in("node").unwrap();
    let mut settings = BTreeMap::new();
    settings.insert(
        POST_CREATE_COMMAND_KEY.to_string(),
        OptionValue::String("pnpm install".to_string()),
    );

    let config = assembler.assemble(
        "web",
        ConfigurationSeed::Template(template),
        &empty_resolution(),
        &[],
        &settings,
    );
    assert_eq!(config.post_create_command.as_deref(), Some("pnpm install"));
}

#[test]
fn static_recommender_maps_base_ids() {
    let recommender = StaticExtensionRecommender;
    let extensions = recommender.recommend(&[
        "rust".to_string(),
        "foo:2.0".to_string(),
        "docker".to_string(),
    ]);
    assert_eq!(
        extensions,
        vec![
            "rust-lang.rust-analyzer".to_string(),
            "ms-azuretools.vscode-docker".to_string(),
        ]
    );
}
