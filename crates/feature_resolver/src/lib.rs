//! Feature catalog and dependency resolution for ContainerScaffold.
//!
//! This crate owns the feature side of configuration scaffolding:
//! - [`FeatureDescriptor`] - the immutable description of a versioned,
//!   reusable capability unit with declared dependencies and conflicts
//! - [`FeatureCatalog`] - the contract through which descriptors are listed
//!   and per-feature options are validated
//! - [`CatalogCache`] - a caller-owned cache over a catalog source with an
//!   explicit TTL and an explicit, awaitable refresh
//! - [`resolve_features`] - expansion of a requested feature id set into a
//!   complete, conflict-checked set
//!
//! ## Error Handling
//!
//! Resolution never raises for expected domain conditions. Missing catalog
//! entries and feature conflicts are reported through [`ResolutionResult`]
//! with a success flag; `Err` is reserved for infrastructure faults such as
//! an unreachable catalog source.
//!
//! ## Examples
//!
//! ```rust
//! use feature_resolver::{resolve_features, FeatureDescriptor, InMemoryFeatureCatalog};
//!
//! let catalog = InMemoryFeatureCatalog::new(vec![
//!     FeatureDescriptor::new("rust", "ghcr.io/devcontainers/features/rust", "1"),
//! ]);
//!
//! let result = resolve_features(&["rust".to_string()], &catalog);
//! assert!(result.success);
//! assert_eq!(result.resolved.len(), 1);
//! ```

pub mod cache;
pub mod catalog;
pub mod descriptor;
pub mod errors;
pub mod options;
pub mod report;
pub mod resolver;

pub use cache::{CatalogCache, CatalogSource};
pub use catalog::{FeatureCatalog, InMemoryFeatureCatalog};
pub use descriptor::FeatureDescriptor;
pub use errors::{ResolverError, ResolverResult};
pub use options::OptionValue;
pub use report::{Severity, ValidationIssue, ValidationReport};
pub use resolver::{resolve_features, FeatureConflict, ResolutionResult};
