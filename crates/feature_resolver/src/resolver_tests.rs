//! Tests for feature dependency resolution.

use super::*;
use crate::catalog::InMemoryFeatureCatalog;

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn catalog_with(features: Vec<FeatureDescriptor>) -> InMemoryFeatureCatalog {
    InMemoryFeatureCatalog::new(features)
}

fn feature(id: &str) -> FeatureDescriptor {
    FeatureDescriptor::new(id, format!("example.com/features/{}", id), "1")
}

#[test]
fn resolves_requested_features_in_request_order() {
    let catalog = catalog_with(vec![feature("rust"), feature("node")]);
    let result = resolve_features(&ids(&["node", "rust"]), &catalog);

    assert!(result.success);
    assert_eq!(result.resolved_ids(), vec!["node", "rust"]);
    assert!(result.auto_added.is_empty());
    assert!(result.missing.is_empty());
    assert!(result.conflicts.is_empty());
}

#[test]
fn duplicate_requested_ids_are_ignored() {
    let catalog = catalog_with(vec![feature("rust")]);
    let result = resolve_features(&ids(&["rust", "rust", "rust"]), &catalog);
    assert_eq!(result.resolved.len(), 1);
}

#[test]
fn dependencies_are_pulled_in_and_reported_as_auto_added() {
    let catalog = catalog_with(vec![
        feature("docker").with_dependency("common-utils"),
        feature("common-utils"),
    ]);
    let result = resolve_features(&ids(&["docker"]), &catalog);

    assert!(result.success);
    assert_eq!(result.resolved_ids(), vec!["docker", "common-utils"]);
    assert_eq!(result.auto_added, vec!["common-utils"]);
}

#[test]
fn transitive_dependencies_resolve_breadth_first() {
    let catalog = catalog_with(vec![
        feature("a").with_dependency("b"),
        feature("b").with_dependency("c"),
        feature("c"),
    ]);
    let result = resolve_features(&ids(&["a"]), &catalog);
    assert_eq!(result.resolved_ids(), vec!["a", "b", "c"]);
    assert_eq!(result.auto_added, vec!["b", "c"]);
}

#[test]
fn dependency_cycles_terminate() {
    let catalog = catalog_with(vec![
        feature("a").with_dependency("b"),
        feature("b").with_dependency("a"),
    ]);
    let result = resolve_features(&ids(&["a"]), &catalog);
    assert!(result.success);
    assert_eq!(result.resolved_ids(), vec!["a", "b"]);
}

#[test]
fn missing_requested_feature_is_reported_never_dropped() {
    let catalog = catalog_with(vec![feature("rust")]);
    let result = resolve_features(&ids(&["rust", "ghost"]), &catalog);

    assert!(!result.success);
    assert_eq!(result.missing, vec!["ghost"]);
    assert_eq!(result.resolved_ids(), vec!["rust"]);
}

#[test]
fn missing_dependency_is_reported() {
    let catalog = catalog_with(vec![feature("docker").with_dependency("common-utils")]);
    let result = resolve_features(&ids(&["docker"]), &catalog);

    assert!(!result.success);
    assert_eq!(result.missing, vec!["common-utils"]);
    assert_eq!(result.auto_added, vec!["common-utils"]);
}

// Scenario: A depends on B; B conflicts with C; request {A, C}.
#[test]
fn declared_conflict_via_dependency_yields_exactly_one_entry() {
    let catalog = catalog_with(vec![
        feature("a").with_dependency("b"),
        feature("b").with_conflict("c"),
        feature("c"),
    ]);
    let result = resolve_features(&ids(&["a", "c"]), &catalog);

    let resolved = result.resolved_ids();
    assert!(resolved.contains(&"a".to_string()));
    assert!(resolved.contains(&"b".to_string()));
    assert!(resolved.contains(&"c".to_string()));
    assert!(!result.success);
    assert_eq!(result.conflicts.len(), 1);

    let conflict = &result.conflicts[0];
    assert_eq!(conflict.first, "b");
    assert_eq!(conflict.second, "c");
    assert_eq!(conflict.severity, Severity::Error);
}

#[test]
fn symmetric_declarations_report_each_pair_once() {
    let catalog = catalog_with(vec![
        feature("podman").with_conflict("docker"),
        feature("docker").with_conflict("podman"),
    ]);
    let result = resolve_features(&ids(&["podman", "docker"]), &catalog);
    assert_eq!(result.conflicts.len(), 1);
}

#[test]
fn declared_conflict_with_unresolved_feature_is_not_reported() {
    let catalog = catalog_with(vec![feature("docker").with_conflict("podman")]);
    let result = resolve_features(&ids(&["docker"]), &catalog);
    assert!(result.success);
    assert!(result.conflicts.is_empty());
}

// Scenario: request {"foo:1.0", "foo:2.0"}.
#[test]
fn version_conflict_yields_one_entry_with_hint_naming_both() {
    let catalog = catalog_with(vec![
        FeatureDescriptor::new("foo:1.0", "example.com/features/foo", "1.0"),
        FeatureDescriptor::new("foo:2.0", "example.com/features/foo", "2.0"),
    ]);
    let result = resolve_features(&ids(&["foo:1.0", "foo:2.0"]), &catalog);

    assert!(!result.success);
    assert_eq!(result.conflicts.len(), 1);

    let conflict = &result.conflicts[0];
    assert_eq!(conflict.severity, Severity::Error);
    let hint = conflict.resolution_hint.as_deref().unwrap();
    assert!(hint.contains("foo:1.0"));
    assert!(hint.contains("foo:2.0"));
}

#[test]
fn three_versions_yield_pairwise_conflicts_per_extra_member() {
    let catalog = catalog_with(vec![
        FeatureDescriptor::new("foo:1.0", "example.com/features/foo", "1.0"),
        FeatureDescriptor::new("foo:2.0", "example.com/features/foo", "2.0"),
        FeatureDescriptor::new("foo:3.0", "example.com/features/foo", "3.0"),
    ]);
    let result = resolve_features(&ids(&["foo:1.0", "foo:2.0", "foo:3.0"]), &catalog);
    assert_eq!(result.conflicts.len(), 2);
}

#[test]
fn resolution_is_idempotent() {
    let catalog = catalog_with(vec![
        feature("a").with_dependency("b"),
        feature("b").with_conflict("c"),
        feature("c"),
    ]);
    let first = resolve_features(&ids(&["a", "c", "ghost"]), &catalog);
    let second = resolve_features(&ids(&["a", "c", "ghost"]), &catalog);

    assert_eq!(first.resolved_ids(), second.resolved_ids());
    assert_eq!(first.missing, second.missing);
    assert_eq!(first.conflicts, second.conflicts);
    assert_eq!(first.success, second.success);
}

#[test]
fn empty_request_resolves_successfully_to_nothing() {
    let catalog = catalog_with(vec![feature("rust")]);
    let result = resolve_features(&[], &catalog);
    assert!(result.success);
    assert!(result.resolved.is_empty());
}
