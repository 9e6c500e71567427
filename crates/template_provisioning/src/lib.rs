//! Template package provisioning for ContainerScaffold.
//!
//! Discovers externally distributed template packages and extracts their
//! content:
//!
//! - **Sources** ([`TemplateSource`]): a remote package-feed root
//!   (http(s) URL) or a local directory of package archives.
//! - **Discovery** ([`TemplateProvisioner::discover`]): tag-filtered feed
//!   search with relevance scoring, non-recursive local archive scanning,
//!   aggregation across sources, and dedup by package id keeping the
//!   highest parsed version.
//! - **Extraction** ([`TemplateProvisioner::extract`]): copies only the
//!   content-rooted entries of a package archive into the destination,
//!   filtering out packaging metadata, and parses the optional
//!   template-author manifest best-effort.
//!
//! A failing source is logged and skipped so a single bad feed cannot
//! abort the whole call. Discovery and extraction accept a
//! [`tokio_util::sync::CancellationToken`] and surface cancellation as
//! [`ProvisioningError::Canceled`], distinct from failure.

pub mod descriptor;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod extraction;
pub mod feed;
pub mod source;

pub use descriptor::{compare_versions, TemplatePackageDescriptor};
pub use discovery::{dedup_by_highest_version, score_package, PackageManifest};
pub use engine::{SourceValidation, TemplateProvisioner};
pub use errors::{ProvisioningError, ProvisioningResult};
pub use extraction::{ExtractionResult, PACKAGE_MANIFEST_NAME, TEMPLATE_MANIFEST_NAME};
pub use feed::TemplateFeedClient;
pub use source::{default_sources, parse_source, TemplateSource, DEFAULT_FEED_ROOT};
