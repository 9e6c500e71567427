//! Template source model.
//!
//! A source is either a remote package-feed root (identified by an http(s)
//! URL) or a local directory of package archives (identified by a rooted
//! path or an existing directory). Sources are configured as an ordered
//! string list; when unspecified, the single well-known public feed root is
//! used.

use crate::errors::{ProvisioningError, ProvisioningResult};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

/// The well-known public template feed root used when no sources are
/// configured.
pub const DEFAULT_FEED_ROOT: &str = "https://api.nuget.org/v3/index.json";

/// One configured template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Remote package feed, identified by its service index URL.
    RemoteFeed(Url),
    /// Local directory scanned non-recursively for package archives.
    LocalDirectory(PathBuf),
}

impl TemplateSource {
    /// Stable display name used in logs and error messages.
    pub fn name(&self) -> String {
        match self {
            TemplateSource::RemoteFeed(url) => url.to_string(),
            TemplateSource::LocalDirectory(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classify one configured source string.
///
/// http(s) URLs become remote feeds; rooted paths and existing directories
/// become local sources. Anything else is rejected.
pub fn parse_source(value: &str) -> ProvisioningResult<TemplateSource> {
    if value.starts_with("http://") || value.starts_with("https://") {
        let url = Url::parse(value).map_err(|e| ProvisioningError::InvalidSource {
            value: format!("{} ({})", value, e),
        })?;
        return Ok(TemplateSource::RemoteFeed(url));
    }

    let path = Path::new(value);
    if path.is_absolute() || path.is_dir() {
        return Ok(TemplateSource::LocalDirectory(path.to_path_buf()));
    }

    Err(ProvisioningError::InvalidSource {
        value: value.to_string(),
    })
}

/// Parse an ordered source list, falling back to the default feed root
/// when the list is empty.
pub fn default_sources(configured: &[String]) -> ProvisioningResult<Vec<TemplateSource>> {
    if configured.is_empty() {
        let url = Url::parse(DEFAULT_FEED_ROOT).map_err(|e| ProvisioningError::InvalidSource {
            value: format!("{} ({})", DEFAULT_FEED_ROOT, e),
        })?;
        return Ok(vec![TemplateSource::RemoteFeed(url)]);
    }
    configured.iter().map(|value| parse_source(value)).collect()
}
