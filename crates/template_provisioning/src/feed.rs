//! Remote package feed client.
//!
//! Talks to a V3-style package feed: the service index at the feed root
//! names the search and download endpoints, search is a tag-filtered query
//! against the search endpoint, and packages download from the flat
//! container layout `{base}/{id}/{version}/{id}.{version}.nupkg` with id
//! and version lowercased.
//!
//! Every network operation races against the caller's cancellation token
//! and surfaces [`ProvisioningError::Canceled`] when it fires.

use crate::errors::{ProvisioningError, ProvisioningResult};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;

const SEARCH_RESOURCE_TYPE: &str = "SearchQueryService";
const PACKAGE_BASE_RESOURCE_TYPE: &str = "PackageBaseAddress/3.0.0";

/// Service index document at the feed root.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceIndex {
    #[serde(default)]
    resources: Vec<ServiceResource>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceResource {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    resource_type: String,
}

impl ServiceIndex {
    /// URL of the search endpoint, when the feed advertises one.
    pub fn search_endpoint(&self) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.resource_type.starts_with(SEARCH_RESOURCE_TYPE))
            .map(|r| r.id.as_str())
    }

    /// Base URL of the flat package container, when advertised.
    pub fn package_base(&self) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.resource_type == PACKAGE_BASE_RESOURCE_TYPE)
            .map(|r| r.id.as_str())
    }
}

/// One raw search hit as the feed reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "totalDownloads", default)]
    pub total_downloads: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchHit>,
}

/// Compose the search query string: `tags:<tag>`, optionally combined
/// with free text.
pub fn search_query(tag: &str, free_text: Option<&str>) -> String {
    match free_text {
        Some(text) if !text.is_empty() => format!("tags:{} {}", tag, text),
        _ => format!("tags:{}", tag),
    }
}

/// Compose the flat-container download URL for one package version.
pub fn download_url(package_base: &str, package_id: &str, version: &str) -> ProvisioningResult<Url> {
    let id = package_id.to_lowercase();
    let version = version.to_lowercase();
    let base = package_base.trim_end_matches('/');
    let raw = format!("{}/{}/{}/{}.{}.nupkg", base, id, version, id, version);
    Url::parse(&raw).map_err(|e| ProvisioningError::InvalidSource {
        value: format!("{} ({})", raw, e),
    })
}

/// HTTP client for one remote feed root.
pub struct TemplateFeedClient {
    http: reqwest::Client,
    root: Url,
}

impl TemplateFeedClient {
    pub fn new(root: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            root,
        }
    }

    /// The feed root this client talks to.
    pub fn root(&self) -> &Url {
        &self.root
    }

    fn unreachable(&self, reason: impl std::fmt::Display) -> ProvisioningError {
        ProvisioningError::SourceUnreachable {
            source_name: self.root.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Fetch and decode the service index. Also serves as the source
    /// validity probe.
    pub async fn service_index(
        &self,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<ServiceIndex> {
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ProvisioningError::Canceled),
            result = self.http.get(self.root.clone()).send() => {
                result.map_err(|e| self.unreachable(e))?
            }
        };
        let response = response
            .error_for_status()
            .map_err(|e| self.unreachable(e))?;

        tokio::select! {
            _ = cancel.cancelled() => Err(ProvisioningError::Canceled),
            result = response.json::<ServiceIndex>() => {
                result.map_err(|e| self.unreachable(e))
            }
        }
    }

    /// Run a tag-filtered search, optionally combined with free text.
    pub async fn search(
        &self,
        tag: &str,
        free_text: Option<&str>,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<Vec<SearchHit>> {
        let index = self.service_index(cancel).await?;
        let endpoint = index
            .search_endpoint()
            .ok_or_else(|| self.unreachable("service index advertises no search endpoint"))?;

        let query = search_query(tag, free_text);
        debug!(feed = %self.root, query = %query, "Searching template feed");

        let request = self
            .http
            .get(endpoint)
            .query(&[("q", query.as_str()), ("prerelease", "true")]);
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ProvisioningError::Canceled),
            result = request.send() => result.map_err(|e| self.unreachable(e))?,
        };
        let response = response
            .error_for_status()
            .map_err(|e| self.unreachable(e))?;

        let decoded = tokio::select! {
            _ = cancel.cancelled() => return Err(ProvisioningError::Canceled),
            result = response.json::<SearchResponse>() => {
                result.map_err(|e| self.unreachable(e))?
            }
        };
        Ok(decoded.data)
    }

    /// Download one package archive into memory.
    pub async fn download(
        &self,
        package_id: &str,
        version: &str,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<Vec<u8>> {
        let index = self.service_index(cancel).await?;
        let base = index
            .package_base()
            .ok_or_else(|| self.unreachable("service index advertises no package base"))?;
        let url = download_url(base, package_id, version)?;

        debug!(feed = %self.root, package = %package_id, version = %version, "Downloading template package");
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ProvisioningError::Canceled),
            result = self.http.get(url).send() => result.map_err(|e| self.unreachable(e))?,
        };
        let response = response
            .error_for_status()
            .map_err(|e| self.unreachable(e))?;

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(ProvisioningError::Canceled),
            result = response.bytes() => result.map_err(|e| self.unreachable(e))?,
        };
        Ok(bytes.to_vec())
    }
}
