//! Feature dependency resolution.
//!
//! Expands a requested feature id set into a complete, conflict-checked
//! set. The worklist is an explicit FIFO queue with a seen set, so
//! identical inputs always yield the same resolved order; that order flows
//! into generated configuration output and must be reproducible.
//!
//! Resolution never raises for expected domain conditions: missing catalog
//! entries and conflicts are reported through [`ResolutionResult`] with the
//! success flag cleared.

use crate::catalog::FeatureCatalog;
use crate::descriptor::FeatureDescriptor;
use crate::report::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// A detected incompatibility between two resolved features.
///
/// Either explicit (declared in a feature's conflict set) or implicit (two
/// resolved features share a base id with differing versions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConflict {
    /// Id of the feature on the declaring (or first-resolved) side.
    pub first: String,
    /// Id of the conflicting counterpart.
    pub second: String,
    /// Why the pair is incompatible.
    pub reason: String,
    /// Graded severity; declared and version conflicts are both `Error`.
    pub severity: Severity,
    /// Suggested way out, when one can be named.
    pub resolution_hint: Option<String>,
}

/// Outcome of one resolution call.
///
/// Created per call and discarded after the assembler consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Resolved descriptors in deterministic insertion order: requested ids
    /// first (in request order), then dependencies as they were discovered.
    pub resolved: Vec<FeatureDescriptor>,
    /// Ids pulled in as dependencies rather than requested by the user.
    /// Reported separately so callers can distinguish what they asked for
    /// from what came along.
    pub auto_added: Vec<String>,
    /// Requested or depended-upon ids absent from the catalog.
    pub missing: Vec<String>,
    /// Conflicts detected between resolved features.
    pub conflicts: Vec<FeatureConflict>,
    /// True only when nothing is missing and no conflict is `Error` or
    /// worse.
    pub success: bool,
}

impl ResolutionResult {
    /// Ids of all resolved features, in resolution order.
    pub fn resolved_ids(&self) -> Vec<String> {
        self.resolved.iter().map(|f| f.id.clone()).collect()
    }
}

/// Expand a requested feature id set into a complete, conflict-checked set.
///
/// Duplicate requested ids are ignored; request order is otherwise
/// preserved. Ids absent from the catalog are recorded as missing, never
/// silently dropped.
///
/// # Examples
///
/// ```rust
/// use feature_resolver::{resolve_features, FeatureDescriptor, InMemoryFeatureCatalog};
///
/// let catalog = InMemoryFeatureCatalog::new(vec![
///     FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "1")
///         .with_dependency("common-utils"),
///     FeatureDescriptor::new("common-utils", "ghcr.io/devcontainers/features/common-utils", "2"),
/// ]);
///
/// let result = resolve_features(&["rust".to_string()], &catalog);
/// assert!(result.success);
/// assert_eq!(result.resolved_ids(), vec!["rust", "common-utils"]);
/// assert_eq!(result.auto_added, vec!["common-utils"]);
/// ```
pub fn resolve_features(requested: &[String], catalog: &dyn FeatureCatalog) -> ResolutionResult {
    let mut queue: VecDeque<String> = VecDeque::new();
    let mut seen: HashSet<String> = HashSet::new();
    for id in requested {
        if seen.insert(id.clone()) {
            queue.push_back(id.clone());
        }
    }

    let mut resolved: Vec<FeatureDescriptor> = Vec::new();
    let mut auto_added: Vec<String> = Vec::new();
    let mut missing: Vec<String> = Vec::new();

    while let Some(id) = queue.pop_front() {
        let Some(descriptor) = catalog.feature(&id) else {
            warn!(feature = %id, "Requested feature is not present in the catalog");
            missing.push(id);
            continue;
        };

        for dependency in &descriptor.depends_on {
            if seen.insert(dependency.clone()) {
                debug!(feature = %descriptor.id, dependency = %dependency, "Auto-adding dependency");
                auto_added.push(dependency.clone());
                queue.push_back(dependency.clone());
            }
        }
        resolved.push(descriptor);
    }

    let conflicts = detect_conflicts(&resolved);
    let success = missing.is_empty() && !conflicts.iter().any(|c| c.severity.is_blocking());

    ResolutionResult {
        resolved,
        auto_added,
        missing,
        conflicts,
        success,
    }
}

/// Run the conflict pass over an already-resolved feature sequence.
fn detect_conflicts(resolved: &[FeatureDescriptor]) -> Vec<FeatureConflict> {
    let resolved_ids: HashSet<&str> = resolved.iter().map(|f| f.id.as_str()).collect();
    let mut conflicts = Vec::new();
    // Symmetric declarations would otherwise report each pair twice.
    let mut reported_pairs: HashSet<(String, String)> = HashSet::new();

    for feature in resolved {
        for conflicting in &feature.conflicts_with {
            if !resolved_ids.contains(conflicting.as_str()) {
                continue;
            }
            if !reported_pairs.insert(unordered_pair(&feature.id, conflicting)) {
                continue;
            }
            conflicts.push(FeatureConflict {
                first: feature.id.clone(),
                second: conflicting.clone(),
                reason: format!(
                    "feature '{}' declares a conflict with '{}'",
                    feature.id, conflicting
                ),
                severity: Severity::Error,
                resolution_hint: None,
            });
        }
    }

    // Version conflicts: two resolved features sharing a base id.
    let mut groups: Vec<(&str, Vec<&FeatureDescriptor>)> = Vec::new();
    for feature in resolved {
        let base = feature.base_id();
        match groups.iter_mut().find(|(group_base, _)| *group_base == base) {
            Some((_, members)) => members.push(feature),
            None => groups.push((base, vec![feature])),
        }
    }
    for (base, members) in groups {
        let Some((anchor, extras)) = members.split_first() else {
            continue;
        };
        for extra in extras {
            conflicts.push(FeatureConflict {
                first: anchor.id.clone(),
                second: extra.id.clone(),
                reason: format!(
                    "multiple versions of feature '{}' were selected",
                    base
                ),
                severity: Severity::Error,
                resolution_hint: Some(format!(
                    "remove either '{}' or '{}' from the request",
                    anchor.id, extra.id
                )),
            });
        }
    }

    conflicts
}

fn unordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
