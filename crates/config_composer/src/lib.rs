//! Configuration assembly, merging, and validation for ContainerScaffold.
//!
//! This crate owns the [`Configuration`] aggregate - the serializable
//! description of a development-container environment - and the three pure
//! computations that operate on it:
//!
//! 1. **Assembly** ([`ConfigurationAssembler`]): seed from a template (or a
//!    bare image), fold in resolved feature defaults, compute the combined
//!    editor-extension list, and route user custom settings.
//! 2. **Update-merge** ([`ConfigurationMerger`]): overlay a set of requested
//!    changes onto a persisted configuration with overlay-wins scalar and
//!    map rules and union semantics for array fields.
//! 3. **Validation** ([`ConfigurationValidator`]): structural checks graded
//!    by severity, with advisory warnings that never block.
//!
//! All three are stateless, synchronous, and never raise for expected
//! domain conditions; validation reports travel in
//! [`feature_resolver::ValidationReport`] values.

pub mod assembler;
pub mod configuration;
pub mod errors;
pub mod merge;
pub mod templates;
pub mod validator;

pub use assembler::{
    ConfigurationAssembler, ConfigurationSeed, ExtensionRecommender, StaticExtensionRecommender,
};
pub use configuration::{BuildSpec, Configuration};
pub use errors::{CompositionError, CompositionResult};
pub use merge::ConfigurationMerger;
pub use templates::{built_in_templates, find_built_in, require_built_in, TemplateDefaults};
pub use validator::ConfigurationValidator;
