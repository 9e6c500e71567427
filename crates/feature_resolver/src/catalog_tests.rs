//! Tests for the in-memory feature catalog.

use super::*;
use crate::report::Severity;

fn rust_feature() -> FeatureDescriptor {
    FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "1")
        .with_default_option("version", "latest")
        .with_default_option("profile", "minimal")
}

#[test]
fn lists_features_in_stable_id_order() {
    let catalog = InMemoryFeatureCatalog::new(vec![
        FeatureDescriptor::new("node", "ghcr.io/devcontainers/features/node", "22"),
        rust_feature(),
        FeatureDescriptor::new("go", "ghcr.io/devcontainers/features/go", "1"),
    ]);

    let ids: Vec<_> = catalog
        .list_features()
        .into_iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(ids, vec!["go", "node", "rust"]);
}

#[test]
fn later_duplicate_ids_replace_earlier_entries() {
    let catalog = InMemoryFeatureCatalog::new(vec![
        FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "1"),
        FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "2"),
    ]);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.feature("rust").unwrap().version, "2");
}

#[test]
fn validates_known_options_against_defaults() {
    let catalog = InMemoryFeatureCatalog::new(vec![rust_feature()]);
    let mut options = BTreeMap::new();
    options.insert(
        "version".to_string(),
        OptionValue::String("1.80".to_string()),
    );

    let report =
        catalog.validate_options("ghcr.io/devcontainers/features/rust:1", &options);
    assert!(report.is_valid());
}

#[test]
fn rejects_undeclared_options() {
    let catalog = InMemoryFeatureCatalog::new(vec![rust_feature()]);
    let mut options = BTreeMap::new();
    options.insert("nightly".to_string(), OptionValue::Bool(true));

    let report =
        catalog.validate_options("ghcr.io/devcontainers/features/rust:1", &options);
    assert!(!report.is_valid());
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(report.errors[0].field, "nightly");
}

#[test]
fn rejects_type_mismatched_options() {
    let catalog = InMemoryFeatureCatalog::new(vec![rust_feature()]);
    let mut options = BTreeMap::new();
    options.insert("version".to_string(), OptionValue::Bool(true));

    let report =
        catalog.validate_options("ghcr.io/devcontainers/features/rust:1", &options);
    assert!(!report.is_valid());
    assert!(report.errors[0].message.contains("expects a string"));
}

#[test]
fn unknown_feature_key_is_an_error() {
    let catalog = InMemoryFeatureCatalog::new(vec![]);
    let report = catalog.validate_options("example.com/features/ghost:1", &BTreeMap::new());
    assert!(!report.is_valid());
    assert!(report.errors[0]
        .message
        .contains("not present in the catalog"));
}
