//! Package content extraction.
//!
//! A template package archive carries its project files under a `content/`
//! (or `contentFiles/`) prefix next to packaging metadata. Extraction
//! copies only the content-rooted entries into the destination with the
//! prefix stripped, recreating subdirectories, and filters out:
//!
//! - anything under the template-engine metadata directory
//!   (`.template.config/`)
//! - anything literally named the template-engine manifest
//!   (`template.json`) or the packaging manifest (`templatepack.json`)
//! - icon images
//!
//! The optional top-level template-author manifest
//! (`devcontainer-template.json`) is written like any other content file
//! and additionally parsed best-effort; a parse failure is logged, not
//! fatal.

use crate::errors::{ProvisioningError, ProvisioningResult};
use serde::Serialize;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zip::ZipArchive;

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;

/// Packaging metadata entry carried by every package archive.
pub const PACKAGE_MANIFEST_NAME: &str = "templatepack.json";
/// Optional template-author manifest at the content root.
pub const TEMPLATE_MANIFEST_NAME: &str = "devcontainer-template.json";

/// Template-engine metadata directory, excluded wholesale.
const TEMPLATE_CONFIG_DIR: &str = ".template.config";
/// Template-engine manifest file, excluded wherever it appears.
const TEMPLATE_CONFIG_MANIFEST: &str = "template.json";
/// Icon images, excluded by file name.
const ICON_NAMES: &[&str] = &["icon.png", "icon.jpg", "icon.jpeg", "icon.svg"];

/// Entry prefixes whose contents are extracted (prefix stripped).
const CONTENT_PREFIXES: &[&str] = &["content/", "contentFiles/"];

/// Outcome of one extraction call.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Whether content was extracted.
    pub success: bool,
    /// Destination directory files were written under.
    pub destination: PathBuf,
    /// Every file written, in archive order.
    pub written_files: Vec<PathBuf>,
    /// Parsed template-author manifest, when present and parseable.
    pub manifest: Option<serde_json::Value>,
    /// Wall time the call took.
    pub elapsed: Duration,
    /// Failure description when `success` is false.
    pub error_message: Option<String>,
}

impl ExtractionResult {
    /// A failed extraction with nothing written.
    pub fn failure(destination: PathBuf, elapsed: Duration, message: impl Into<String>) -> Self {
        Self {
            success: false,
            destination,
            written_files: Vec::new(),
            manifest: None,
            elapsed,
            error_message: Some(message.into()),
        }
    }
}

/// Copy the content-rooted entries of an archive into `destination`.
///
/// Returns the written file paths and the parsed optional template-author
/// manifest. Checks the cancellation token between entries.
pub fn extract_package<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    destination: &Path,
    cancel: &CancellationToken,
) -> ProvisioningResult<(Vec<PathBuf>, Option<serde_json::Value>)> {
    std::fs::create_dir_all(destination).map_err(|e| ProvisioningError::ExtractionFailed {
        reason: format!("{}: {}", destination.display(), e),
    })?;

    let mut written_files = Vec::new();
    let mut manifest = None;

    for index in 0..archive.len() {
        if cancel.is_cancelled() {
            return Err(ProvisioningError::Canceled);
        }

        let mut entry =
            archive
                .by_index(index)
                .map_err(|e| ProvisioningError::ExtractionFailed {
                    reason: e.to_string(),
                })?;
        let entry_name = entry.name().replace('\\', "/");

        let Some(relative) = strip_content_prefix(&entry_name) else {
            continue;
        };
        if relative.is_empty() || is_excluded(relative) {
            debug!(entry = %entry_name, "Skipping packaging metadata entry");
            continue;
        }
        // Entries escaping the destination are never written.
        if relative.split('/').any(|segment| segment == "..") {
            warn!(entry = %entry_name, "Skipping entry with a parent-directory component");
            continue;
        }

        let target = destination.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| {
                ProvisioningError::ExtractionFailed {
                    reason: format!("{}: {}", target.display(), e),
                }
            })?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ProvisioningError::ExtractionFailed {
                reason: format!("{}: {}", parent.display(), e),
            })?;
        }

        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .map_err(|e| ProvisioningError::ExtractionFailed {
                reason: format!("{}: {}", entry_name, e),
            })?;
        std::fs::write(&target, &contents).map_err(|e| ProvisioningError::ExtractionFailed {
            reason: format!("{}: {}", target.display(), e),
        })?;

        if relative == TEMPLATE_MANIFEST_NAME {
            match serde_json::from_slice(&contents) {
                Ok(parsed) => manifest = Some(parsed),
                Err(e) => {
                    warn!(entry = %entry_name, error = %e, "Template manifest is not valid JSON, ignoring");
                }
            }
        }
        written_files.push(target);
    }

    Ok((written_files, manifest))
}

/// Strip the content prefix, or `None` when the entry is not content.
fn strip_content_prefix(entry_name: &str) -> Option<&str> {
    CONTENT_PREFIXES
        .iter()
        .find_map(|prefix| entry_name.strip_prefix(prefix))
}

/// Whether a prefix-stripped path is packaging metadata.
fn is_excluded(relative: &str) -> bool {
    let mut segments = relative.split('/');
    if segments.any(|segment| segment == TEMPLATE_CONFIG_DIR) {
        return true;
    }
    let file_name = relative.rsplit('/').next().unwrap_or(relative);
    file_name == TEMPLATE_CONFIG_MANIFEST
        || file_name == PACKAGE_MANIFEST_NAME
        || ICON_NAMES.contains(&file_name)
}
