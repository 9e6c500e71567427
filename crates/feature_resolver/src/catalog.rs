//! Feature catalog contract and in-memory implementation.
//!
//! The catalog supplies feature descriptors and per-feature option
//! validation. Resolution and configuration validation both consume the
//! catalog through the [`FeatureCatalog`] trait so tests and alternative
//! backends can substitute their own implementations.

use crate::descriptor::FeatureDescriptor;
use crate::options::OptionValue;
use crate::report::ValidationReport;
use std::collections::{BTreeMap, HashMap};

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;

/// Contract for feature descriptor lookup and per-feature option
/// validation.
///
/// Implementations operate on already-loaded data; fetching and refresh
/// live behind [`crate::CatalogCache`].
pub trait FeatureCatalog: Send + Sync {
    /// All descriptors currently known to the catalog.
    fn list_features(&self) -> Vec<FeatureDescriptor>;

    /// Look up one descriptor by catalog id.
    fn feature(&self, id: &str) -> Option<FeatureDescriptor>;

    /// Validate one feature's options, scoped to that feature.
    ///
    /// `feature_key` is the configuration key (`repository:version`). The
    /// returned report is unprefixed; callers scope it under the feature
    /// key when folding into a configuration-level report.
    fn validate_options(
        &self,
        feature_key: &str,
        options: &BTreeMap<String, OptionValue>,
    ) -> ValidationReport;
}

/// Catalog backed by an in-memory descriptor set.
///
/// Used for built-in descriptor sets and as the snapshot type handed out
/// by [`crate::CatalogCache`].
///
/// # Examples
///
/// ```rust
/// use feature_resolver::{FeatureCatalog, FeatureDescriptor, InMemoryFeatureCatalog};
///
/// let catalog = InMemoryFeatureCatalog::new(vec![
///     FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "1"),
/// ]);
///
/// assert!(catalog.feature("rust").is_some());
/// assert!(catalog.feature("haskell").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeatureCatalog {
    by_id: HashMap<String, FeatureDescriptor>,
    by_key: HashMap<String, FeatureDescriptor>,
}

impl InMemoryFeatureCatalog {
    /// Build a catalog from a descriptor list. Later duplicates of the same
    /// id replace earlier ones.
    pub fn new(features: Vec<FeatureDescriptor>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_key = HashMap::new();
        for descriptor in features {
            by_key.insert(descriptor.feature_key(), descriptor.clone());
            by_id.insert(descriptor.id.clone(), descriptor);
        }
        Self { by_id, by_key }
    }

    /// Number of descriptors in the catalog.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FeatureCatalog for InMemoryFeatureCatalog {
    fn list_features(&self) -> Vec<FeatureDescriptor> {
        let mut features: Vec<_> = self.by_id.values().cloned().collect();
        features.sort_by(|a, b| a.id.cmp(&b.id));
        features
    }

    fn feature(&self, id: &str) -> Option<FeatureDescriptor> {
        self.by_id.get(id).cloned()
    }

    fn validate_options(
        &self,
        feature_key: &str,
        options: &BTreeMap<String, OptionValue>,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let Some(descriptor) = self.by_key.get(feature_key) else {
            report.add_error(
                "feature",
                format!("feature '{}' is not present in the catalog", feature_key),
            );
            return report;
        };

        for (key, value) in options {
            match descriptor.default_options.get(key) {
                None => {
                    report.add_error(
                        key.clone(),
                        format!("option '{}' is not declared by this feature", key),
                    );
                }
                Some(default) if default.type_name() != value.type_name() => {
                    report.add_error(
                        key.clone(),
                        format!(
                            "option '{}' expects a {} but got a {}",
                            key,
                            default.type_name(),
                            value.type_name()
                        ),
                    );
                }
                Some(_) => {}
            }
        }
        report
    }
}
