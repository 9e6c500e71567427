//! Feature descriptor types.

use crate::options::OptionValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;

/// Immutable description of a versioned, reusable capability unit.
///
/// A descriptor is loaded from the feature catalog and never mutated
/// afterwards; its lifecycle is tied to catalog refresh. Dependency and
/// conflict sets use `BTreeSet` so iteration order - and therefore
/// resolution order - is deterministic for identical inputs.
///
/// # Examples
///
/// ```rust
/// use feature_resolver::FeatureDescriptor;
///
/// let descriptor = FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "1")
///     .with_dependency("common-utils")
///     .with_conflict("rust-nightly");
///
/// assert_eq!(descriptor.feature_key(), "ghcr.io/devcontainers/features/rust:1");
/// assert_eq!(descriptor.base_id(), "rust");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Catalog id, e.g. `"rust"` or `"foo:2.0"` for a pinned request.
    pub id: String,
    /// Source repository the feature is published from.
    pub repository: String,
    /// Published version.
    pub version: String,
    /// Ids of features this feature requires.
    #[serde(default)]
    pub depends_on: BTreeSet<String>,
    /// Ids of features this feature declares itself incompatible with.
    #[serde(default)]
    pub conflicts_with: BTreeSet<String>,
    /// Option defaults applied when the feature is added to a configuration.
    #[serde(default)]
    pub default_options: BTreeMap<String, OptionValue>,
    /// Free-form grouping label, e.g. `"languages"` or `"tools"`.
    #[serde(default)]
    pub category: String,
}

impl FeatureDescriptor {
    /// Create a descriptor with empty dependency, conflict, and option sets.
    pub fn new(
        id: impl Into<String>,
        repository: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            repository: repository.into(),
            version: version.into(),
            depends_on: BTreeSet::new(),
            conflicts_with: BTreeSet::new(),
            default_options: BTreeMap::new(),
            category: String::new(),
        }
    }

    /// Builder-style dependency registration.
    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.depends_on.insert(id.into());
        self
    }

    /// Builder-style conflict registration.
    pub fn with_conflict(mut self, id: impl Into<String>) -> Self {
        self.conflicts_with.insert(id.into());
        self
    }

    /// Builder-style default option registration.
    pub fn with_default_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Self {
        self.default_options.insert(key.into(), value.into());
        self
    }

    /// Builder-style category assignment.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// The configuration key this feature is declared under:
    /// `repository:version`.
    pub fn feature_key(&self) -> String {
        format!("{}:{}", self.repository, self.version)
    }

    /// The id portion before any version separator. Two resolved features
    /// sharing a base id but differing in full id are a version conflict.
    pub fn base_id(&self) -> &str {
        match self.id.split_once(':') {
            Some((base, _)) => base,
            None => &self.id,
        }
    }
}
