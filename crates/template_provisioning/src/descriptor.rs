//! Template package descriptors and version comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;

/// One discovered template package.
///
/// Created per discovery hit; aggregation deduplicates by `id`, keeping
/// the entry with the highest parsed version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePackageDescriptor {
    /// Package id, unique within one discovery result.
    pub id: String,
    /// Published version string.
    pub version: String,
    /// Display title; falls back to the id when the feed omits it.
    pub title: String,
    /// Package description.
    #[serde(default)]
    pub description: String,
    /// Tags the package was published with.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Where the package came from (feed root URL or directory path).
    pub source: String,
    /// Publish date, when the source reports one.
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    /// Download count, when the source reports one.
    #[serde(default)]
    pub download_count: u64,
    /// Whether the version is a prerelease.
    #[serde(default)]
    pub prerelease: bool,
}

impl TemplatePackageDescriptor {
    /// Whether the tag list contains `tag` as a case-insensitive exact
    /// token.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Compare two version strings for discovery dedup.
///
/// Both sides are parsed as semantic versions when possible. When either
/// side is not a parseable semver, the comparison falls back to plain
/// lexicographic string ordering rather than rejecting the package.
///
/// # Examples
///
/// ```rust
/// use std::cmp::Ordering;
/// use template_provisioning::compare_versions;
///
/// assert_eq!(compare_versions("1.2.0", "1.10.0"), Ordering::Less);
/// // Non-semver strings order lexicographically.
/// assert_eq!(compare_versions("2021-06", "2021-11"), Ordering::Less);
/// ```
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    match (
        semver::Version::parse(left),
        semver::Version::parse(right),
    ) {
        (Ok(left_version), Ok(right_version)) => left_version.cmp(&right_version),
        _ => left.cmp(right),
    }
}
