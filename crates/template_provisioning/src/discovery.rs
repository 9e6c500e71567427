//! Package discovery: scoring, local archive scanning, and dedup.
//!
//! Remote hits come back from the feed's search endpoint; local hits come
//! from a non-recursive scan of a directory of package archives. Both are
//! converted to [`TemplatePackageDescriptor`] values, aggregated across
//! sources, and deduplicated by package id keeping the highest parsed
//! version.

use crate::descriptor::{compare_versions, TemplatePackageDescriptor};
use crate::errors::{ProvisioningError, ProvisioningResult};
use crate::extraction::PACKAGE_MANIFEST_NAME;
use crate::feed::SearchHit;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;

/// Archive extensions considered during a local directory scan.
const LOCAL_PACKAGE_EXTENSIONS: &[&str] = &["nupkg", "zip"];

/// Relevance weights for free-text scoring.
const ID_MATCH_WEIGHT: u32 = 10;
const TITLE_MATCH_WEIGHT: u32 = 5;
const TAG_MATCH_WEIGHT: u32 = 3;
const DESCRIPTION_MATCH_WEIGHT: u32 = 2;
const POPULARITY_BONUS_THRESHOLD: u64 = 1000;

/// Packaging metadata carried in each archive's manifest entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageManifest {
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub urls: BTreeMap<String, String>,
}

/// Convert one remote search hit into a package descriptor.
pub fn hit_to_descriptor(hit: SearchHit, source_name: &str) -> TemplatePackageDescriptor {
    let prerelease = hit.version.contains('-');
    TemplatePackageDescriptor {
        title: hit.title.unwrap_or_else(|| hit.id.clone()),
        id: hit.id,
        version: hit.version,
        description: hit.description.unwrap_or_default(),
        tags: hit.tags,
        source: source_name.to_string(),
        published: None,
        download_count: hit.total_downloads,
        prerelease,
    }
}

/// Relevance score of one package for a free-text query.
///
/// Package-id substring matches weigh 10, title matches 5, tag matches 3,
/// description matches 2, with a flat +1 bonus for packages downloaded
/// more than 1000 times. All matching is case-insensitive.
pub fn score_package(package: &TemplatePackageDescriptor, query: &str) -> u32 {
    let needle = query.to_lowercase();
    let mut score = 0;
    if package.id.to_lowercase().contains(&needle) {
        score += ID_MATCH_WEIGHT;
    }
    if package.title.to_lowercase().contains(&needle) {
        score += TITLE_MATCH_WEIGHT;
    }
    if package
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(&needle))
    {
        score += TAG_MATCH_WEIGHT;
    }
    if package.description.to_lowercase().contains(&needle) {
        score += DESCRIPTION_MATCH_WEIGHT;
    }
    if package.download_count > POPULARITY_BONUS_THRESHOLD {
        score += 1;
    }
    score
}

/// Order packages by relevance when a free-text query is present, then cap
/// to the requested maximum.
pub fn rank_packages(
    mut packages: Vec<TemplatePackageDescriptor>,
    free_text: Option<&str>,
    max_results: usize,
) -> Vec<TemplatePackageDescriptor> {
    if let Some(query) = free_text.filter(|q| !q.is_empty()) {
        packages.sort_by(|a, b| {
            score_package(b, query)
                .cmp(&score_package(a, query))
                .then(b.download_count.cmp(&a.download_count))
        });
    }
    packages.truncate(max_results);
    packages
}

/// Deduplicate by package id, keeping the entry with the highest parsed
/// version. First-seen order of ids is preserved.
pub fn dedup_by_highest_version(
    packages: Vec<TemplatePackageDescriptor>,
) -> Vec<TemplatePackageDescriptor> {
    let mut deduped: Vec<TemplatePackageDescriptor> = Vec::new();
    for package in packages {
        match deduped.iter_mut().find(|existing| existing.id == package.id) {
            None => deduped.push(package),
            Some(existing) => {
                if compare_versions(&package.version, &existing.version) == Ordering::Greater {
                    *existing = package;
                }
            }
        }
    }
    deduped
}

/// Non-recursively scan a directory of package archives, keeping only
/// packages whose tag list contains `tag` (case-insensitive exact token).
///
/// Unreadable archives and archives without a usable manifest are logged
/// and skipped; only the directory enumeration itself can fail.
pub fn scan_local_directory(
    directory: &Path,
    tag: &str,
) -> ProvisioningResult<Vec<TemplatePackageDescriptor>> {
    let entries = std::fs::read_dir(directory).map_err(|e| ProvisioningError::SourceUnreachable {
        source_name: directory.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut packages = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        let is_package = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| LOCAL_PACKAGE_EXTENSIONS.contains(&ext));
        if !is_package {
            continue;
        }

        match read_package_manifest(&path) {
            Ok(manifest) => {
                if !manifest.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                    debug!(archive = %path.display(), "Package does not carry the target tag, skipping");
                    continue;
                }
                packages.push(manifest_to_descriptor(manifest, directory));
            }
            Err(e) => {
                warn!(archive = %path.display(), error = %e, "Skipping unreadable package archive");
            }
        }
    }
    Ok(packages)
}

/// Open an archive and parse its single metadata-manifest entry.
pub fn read_package_manifest(archive_path: &Path) -> ProvisioningResult<PackageManifest> {
    let file = File::open(archive_path).map_err(|e| ProvisioningError::ExtractionFailed {
        reason: format!("{}: {}", archive_path.display(), e),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| ProvisioningError::ExtractionFailed {
        reason: format!("{}: {}", archive_path.display(), e),
    })?;

    let manifest_indices: Vec<usize> = (0..archive.len())
        .filter(|&i| {
            archive
                .name_for_index(i)
                .is_some_and(|name| entry_file_name(name) == PACKAGE_MANIFEST_NAME)
        })
        .collect();
    let [index] = manifest_indices[..] else {
        return Err(ProvisioningError::ExtractionFailed {
            reason: format!(
                "{}: expected exactly one {} entry, found {}",
                archive_path.display(),
                PACKAGE_MANIFEST_NAME,
                manifest_indices.len()
            ),
        });
    };

    let mut contents = String::new();
    archive
        .by_index(index)
        .map_err(|e| ProvisioningError::ExtractionFailed {
            reason: e.to_string(),
        })?
        .read_to_string(&mut contents)
        .map_err(|e| ProvisioningError::ExtractionFailed {
            reason: e.to_string(),
        })?;
    serde_json::from_str(&contents).map_err(|e| ProvisioningError::ExtractionFailed {
        reason: format!("{}: {}", archive_path.display(), e),
    })
}

fn manifest_to_descriptor(
    manifest: PackageManifest,
    directory: &Path,
) -> TemplatePackageDescriptor {
    let prerelease = manifest.version.contains('-');
    TemplatePackageDescriptor {
        title: manifest.title.unwrap_or_else(|| manifest.id.clone()),
        id: manifest.id,
        version: manifest.version,
        description: manifest.description,
        tags: manifest.tags,
        source: directory.display().to_string(),
        published: None,
        download_count: 0,
        prerelease,
    }
}

/// Final path component of an archive entry name.
fn entry_file_name(entry_name: &str) -> &str {
    entry_name.rsplit(['/', '\\']).next().unwrap_or(entry_name)
}
