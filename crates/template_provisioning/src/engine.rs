//! The template provisioning engine.
//!
//! Owns the ordered source list and drives discovery, extraction, and
//! source validation across it. Sources are visited sequentially; a
//! failing source is logged and skipped during discovery, and extraction
//! falls through to the next source before the overall call is declared
//! failed. Cancellation propagates immediately.

use crate::descriptor::TemplatePackageDescriptor;
use crate::discovery::{
    dedup_by_highest_version, hit_to_descriptor, rank_packages, read_package_manifest,
    scan_local_directory,
};
use crate::errors::{ProvisioningError, ProvisioningResult};
use crate::extraction::{extract_package, ExtractionResult};
use crate::feed::TemplateFeedClient;
use crate::source::{default_sources, TemplateSource};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zip::ZipArchive;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// Outcome of validating the configured source list.
#[derive(Debug, Clone)]
pub struct SourceValidation {
    /// Sources whose validity probe succeeded.
    pub valid: Vec<TemplateSource>,
    /// Sources whose probe failed, with the reason.
    pub invalid: Vec<(TemplateSource, String)>,
}

impl SourceValidation {
    /// Overall validity: at least one valid source and no failing ones.
    pub fn is_valid(&self) -> bool {
        !self.valid.is_empty() && self.invalid.is_empty()
    }
}

/// Discovers and extracts externally distributed template packages.
pub struct TemplateProvisioner {
    sources: Vec<TemplateSource>,
}

impl TemplateProvisioner {
    /// Create an engine over an explicit source list.
    pub fn new(sources: Vec<TemplateSource>) -> Self {
        Self { sources }
    }

    /// Create an engine from configured source strings, defaulting to the
    /// well-known public feed when the list is empty.
    pub fn from_configured(configured: &[String]) -> ProvisioningResult<Self> {
        Ok(Self::new(default_sources(configured)?))
    }

    /// The ordered source list this engine visits.
    pub fn sources(&self) -> &[TemplateSource] {
        &self.sources
    }

    /// Discover template packages carrying `tag` across every source.
    ///
    /// Per-source failures are logged and skipped; the aggregate is
    /// deduplicated by package id (highest parsed version wins), ranked by
    /// relevance when free text is present, and capped to `max_results`.
    pub async fn discover(
        &self,
        tag: &str,
        free_text: Option<&str>,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<Vec<TemplatePackageDescriptor>> {
        let mut aggregated = Vec::new();
        for source in &self.sources {
            match self.discover_one(source, tag, free_text, cancel).await {
                Ok(mut packages) => {
                    debug!(source = %source, count = packages.len(), "Source reported packages");
                    aggregated.append(&mut packages);
                }
                Err(ProvisioningError::Canceled) => return Err(ProvisioningError::Canceled),
                Err(e) => {
                    warn!(source = %source, error = %e, "Skipping failing template source");
                }
            }
        }

        let deduped = dedup_by_highest_version(aggregated);
        Ok(rank_packages(deduped, free_text, max_results))
    }

    async fn discover_one(
        &self,
        source: &TemplateSource,
        tag: &str,
        free_text: Option<&str>,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<Vec<TemplatePackageDescriptor>> {
        match source {
            TemplateSource::RemoteFeed(url) => {
                let client = TemplateFeedClient::new(url.clone());
                let hits = client.search(tag, free_text, cancel).await?;
                Ok(hits
                    .into_iter()
                    .map(|hit| hit_to_descriptor(hit, &source.name()))
                    .collect())
            }
            TemplateSource::LocalDirectory(path) => {
                if cancel.is_cancelled() {
                    return Err(ProvisioningError::Canceled);
                }
                scan_local_directory(path, tag)
            }
        }
    }

    /// Extract one package's content into `destination`.
    ///
    /// Tries each source in order; a failing source falls through to the
    /// next. When no source yields the package/version the call returns a
    /// failed [`ExtractionResult`] naming both.
    pub async fn extract(
        &self,
        package_id: &str,
        version: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<ExtractionResult> {
        let started = Instant::now();

        for source in &self.sources {
            if cancel.is_cancelled() {
                return Err(ProvisioningError::Canceled);
            }
            match self
                .extract_from(source, package_id, version, destination, cancel)
                .await
            {
                Ok(Some((written_files, manifest))) => {
                    info!(
                        source = %source,
                        package = %package_id,
                        version = %version,
                        files = written_files.len(),
                        "Extracted template package"
                    );
                    return Ok(ExtractionResult {
                        success: true,
                        destination: destination.to_path_buf(),
                        written_files,
                        manifest,
                        elapsed: started.elapsed(),
                        error_message: None,
                    });
                }
                Ok(None) => {
                    debug!(source = %source, package = %package_id, "Source does not carry the package");
                }
                Err(ProvisioningError::Canceled) => return Err(ProvisioningError::Canceled),
                Err(e) => {
                    warn!(source = %source, error = %e, "Extraction from source failed, falling through");
                }
            }
        }

        let not_found = ProvisioningError::PackageNotFound {
            package_id: package_id.to_string(),
            version: version.to_string(),
        };
        Ok(ExtractionResult::failure(
            destination.to_path_buf(),
            started.elapsed(),
            not_found.to_string(),
        ))
    }

    async fn extract_from(
        &self,
        source: &TemplateSource,
        package_id: &str,
        version: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<Option<(Vec<PathBuf>, Option<serde_json::Value>)>> {
        match source {
            TemplateSource::RemoteFeed(url) => {
                let client = TemplateFeedClient::new(url.clone());
                let bytes = client.download(package_id, version, cancel).await?;
                let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
                    ProvisioningError::ExtractionFailed {
                        reason: e.to_string(),
                    }
                })?;
                extract_package(&mut archive, destination, cancel).map(Some)
            }
            TemplateSource::LocalDirectory(path) => {
                let Some(archive_path) = find_local_package(path, package_id, version)? else {
                    return Ok(None);
                };
                let file = std::fs::File::open(&archive_path).map_err(|e| {
                    ProvisioningError::ExtractionFailed {
                        reason: format!("{}: {}", archive_path.display(), e),
                    }
                })?;
                let mut archive =
                    ZipArchive::new(file).map_err(|e| ProvisioningError::ExtractionFailed {
                        reason: format!("{}: {}", archive_path.display(), e),
                    })?;
                extract_package(&mut archive, destination, cancel).map(Some)
            }
        }
    }

    /// Probe every configured source for validity.
    ///
    /// A remote feed is valid when its service index fetch succeeds; a
    /// local directory is valid when it exists.
    pub async fn validate_sources(
        &self,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<SourceValidation> {
        let mut validation = SourceValidation {
            valid: Vec::new(),
            invalid: Vec::new(),
        };

        for source in &self.sources {
            if cancel.is_cancelled() {
                return Err(ProvisioningError::Canceled);
            }
            match source {
                TemplateSource::RemoteFeed(url) => {
                    let client = TemplateFeedClient::new(url.clone());
                    match client.service_index(cancel).await {
                        Ok(_) => validation.valid.push(source.clone()),
                        Err(ProvisioningError::Canceled) => {
                            return Err(ProvisioningError::Canceled)
                        }
                        Err(e) => validation.invalid.push((source.clone(), e.to_string())),
                    }
                }
                TemplateSource::LocalDirectory(path) => {
                    if path.is_dir() {
                        validation.valid.push(source.clone());
                    } else {
                        validation
                            .invalid
                            .push((source.clone(), "directory does not exist".to_string()));
                    }
                }
            }
        }
        Ok(validation)
    }
}

/// Locate the archive in a directory whose manifest matches id and
/// version. Ids compare case-insensitively; versions compare exactly.
fn find_local_package(
    directory: &Path,
    package_id: &str,
    version: &str,
) -> ProvisioningResult<Option<PathBuf>> {
    let entries = std::fs::read_dir(directory).map_err(|e| ProvisioningError::SourceUnreachable {
        source_name: directory.display().to_string(),
        reason: e.to_string(),
    })?;

    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        let is_package = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "nupkg" || ext == "zip");
        if !is_package {
            continue;
        }
        match read_package_manifest(&path) {
            Ok(manifest) => {
                if manifest.id.eq_ignore_ascii_case(package_id) && manifest.version == version {
                    return Ok(Some(path));
                }
            }
            Err(e) => {
                warn!(archive = %path.display(), error = %e, "Skipping unreadable package archive");
            }
        }
    }
    Ok(None)
}
