//! # ContainerScaffold Core
//!
//! This crate provides the core orchestration logic for ContainerScaffold, a
//! tool that assembles development container environments from built-in
//! templates or externally distributed template packages.
//!
//! ## Overview
//!
//! Core handles the complete workflow of environment creation:
//! 1. Feature dependency resolution against the catalog
//! 2. Configuration assembly (template defaults, feature options,
//!    extensions, custom overrides)
//! 3. Graded validation of the assembled configuration
//! 4. File generation for built-in templates, or package extraction for
//!    external templates
//!
//! External packages carry their own configuration content, so steps 2 and
//! 3 apply only to built-in templates; feature resolution gates both
//! paths, and a request with missing or conflicting features fails before
//! anything touches the output directory.
//!
//! ## Main Functions
//!
//! The primary entry points are:
//! - [`scaffold_environment`] - Scaffold an environment from a request
//! - [`ScaffoldRequest`] - Request structure for environment creation
//! - [`ScaffoldResult`] - Aggregated result with graded severity
//!
//! ## Architecture
//!
//! The crate follows a dependency injection pattern for testability:
//! - [`FileGenerator`] trait for materializing configurations as files
//! - `FeatureCatalog` trait (from `feature_resolver`) for feature lookup
//! - `TemplateProvisioner` (from `template_provisioning`) for external
//!   packages
//!
//! ## Error Handling
//!
//! Expected domain conditions (unknown features, conflicts, validation
//! findings) are reported inside [`ScaffoldResult`] with `Error` severity.
//! Infrastructure faults surface as a single `Critical` result that
//! preserves the underlying message. At severity `Error` or worse no files
//! are written.

use config_composer::{
    find_built_in, ConfigurationAssembler, ConfigurationSeed, ConfigurationValidator,
};
use feature_resolver::{resolve_features, FeatureCatalog, FeatureConflict, ResolutionResult};
use feature_resolver::{Severity, ValidationIssue};
use template_provisioning::TemplateProvisioner;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

mod errors;
pub use errors::{ScaffoldCoreResult, ScaffoldError};

/// File generation contract and per-file outcomes.
pub mod generator;

/// Request and aggregated result types.
pub mod request;

pub use generator::{FileGenerator, GeneratedFile, GenerationOptions};
pub use request::{ScaffoldRequest, ScaffoldResult, TemplateSelection};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Scaffold one development environment.
///
/// Runs feature resolution, then either assembles and validates a
/// configuration and hands it to the file generator (built-in templates)
/// or extracts the named package through the provisioning engine
/// (external packages, which bypass assembly and validation). Always
/// returns exactly one aggregated result; internal faults are reported as
/// a `Critical` result rather than an `Err`.
pub async fn scaffold_environment(
    request: ScaffoldRequest,
    catalog: &dyn FeatureCatalog,
    generator: &dyn FileGenerator,
    provisioner: &TemplateProvisioner,
    cancel: &CancellationToken,
) -> ScaffoldResult {
    match run_scaffold(&request, catalog, generator, provisioner, cancel).await {
        Ok(result) => result,
        Err(ScaffoldError::Canceled) => {
            warn!(environment = %request.name, "Scaffold canceled");
            let message = ScaffoldError::Canceled.to_string();
            ScaffoldResult::failure(message.clone(), vec![message], Vec::new())
        }
        Err(e) => {
            error!(environment = %request.name, error = %e, "Scaffold aborted by internal fault");
            ScaffoldResult::critical(e.to_string())
        }
    }
}

async fn run_scaffold(
    request: &ScaffoldRequest,
    catalog: &dyn FeatureCatalog,
    generator: &dyn FileGenerator,
    provisioner: &TemplateProvisioner,
    cancel: &CancellationToken,
) -> ScaffoldCoreResult<ScaffoldResult> {
    info!(environment = %request.name, "Starting environment scaffold");

    let resolution = resolve_features(&request.features, catalog);
    let advisory = advisory_conflict_lines(&resolution);
    if !resolution.success {
        return Ok(resolution_failure(&resolution, advisory));
    }
    if !resolution.auto_added.is_empty() {
        debug!(
            auto_added = ?resolution.auto_added,
            "Dependencies pulled in beyond the requested features"
        );
    }

    match &request.template {
        TemplateSelection::BuiltIn { name } => {
            scaffold_built_in(request, name, &resolution, advisory, catalog, generator).await
        }
        TemplateSelection::Package {
            package_id,
            version,
        } => scaffold_package(request, package_id, version, advisory, provisioner, cancel).await,
    }
}

async fn scaffold_built_in(
    request: &ScaffoldRequest,
    template_name: &str,
    resolution: &ResolutionResult,
    mut warnings: Vec<String>,
    catalog: &dyn FeatureCatalog,
    generator: &dyn FileGenerator,
) -> ScaffoldCoreResult<ScaffoldResult> {
    let Some(defaults) = find_built_in(template_name) else {
        let message = ScaffoldError::NotFound {
            name: template_name.to_string(),
        }
        .to_string();
        return Ok(ScaffoldResult::failure(
            message.clone(),
            vec![message],
            warnings,
        ));
    };

    let assembler = ConfigurationAssembler::default();
    let configuration = assembler.assemble(
        &request.name,
        ConfigurationSeed::Template(defaults),
        resolution,
        &request.extensions,
        &request.custom_settings,
    );

    let report = ConfigurationValidator::new().validate(&configuration, catalog);
    warnings.extend(report.warnings.iter().map(issue_line));
    if report.severity() >= Severity::Error {
        let errors = report.errors.iter().map(issue_line).collect();
        return Ok(ScaffoldResult::failure(
            "configuration validation failed",
            errors,
            warnings,
        )
        .with_configuration(configuration));
    }

    info!(
        environment = %request.name,
        template = %template_name,
        "Configuration validated, generating files"
    );
    let generated = generator
        .generate_all(
            &configuration,
            &request.output_path,
            &GenerationOptions::default(),
        )
        .await;

    let failed: Vec<String> = generated
        .iter()
        .filter(|file| !file.success)
        .map(|file| {
            format!(
                "{}: {}",
                file.path.display(),
                file.error_message.as_deref().unwrap_or("write failed")
            )
        })
        .collect();

    if !failed.is_empty() {
        return Ok(
            ScaffoldResult::failure("file generation failed", failed, warnings)
                .with_configuration(configuration)
                .with_generated_files(generated),
        );
    }

    Ok(ScaffoldResult::success(
        format!(
            "Environment '{}' scaffolded into {}",
            request.name,
            request.output_path.display()
        ),
        warnings,
    )
    .with_configuration(configuration)
    .with_generated_files(generated))
}

async fn scaffold_package(
    request: &ScaffoldRequest,
    package_id: &str,
    version: &str,
    warnings: Vec<String>,
    provisioner: &TemplateProvisioner,
    cancel: &CancellationToken,
) -> ScaffoldCoreResult<ScaffoldResult> {
    let extraction = provisioner
        .extract(package_id, version, &request.output_path, cancel)
        .await?;

    if !extraction.success {
        let message = extraction
            .error_message
            .unwrap_or_else(|| "extraction failed".to_string());
        return Ok(ScaffoldResult::failure(
            message.clone(),
            vec![message],
            warnings,
        ));
    }

    Ok(ScaffoldResult::success(
        format!(
            "Extracted {} file(s) from package '{}' {} into {}",
            extraction.written_files.len(),
            package_id,
            version,
            request.output_path.display()
        ),
        warnings,
    ))
}

fn issue_line(issue: &ValidationIssue) -> String {
    format!("{}: {}", issue.field, issue.message)
}

fn conflict_line(conflict: &FeatureConflict) -> String {
    match &conflict.resolution_hint {
        Some(hint) => format!(
            "features '{}' and '{}' conflict: {} ({})",
            conflict.first, conflict.second, conflict.reason, hint
        ),
        None => format!(
            "features '{}' and '{}' conflict: {}",
            conflict.first, conflict.second, conflict.reason
        ),
    }
}

fn advisory_conflict_lines(resolution: &ResolutionResult) -> Vec<String> {
    resolution
        .conflicts
        .iter()
        .filter(|c| !c.severity.is_blocking())
        .map(conflict_line)
        .collect()
}

fn resolution_failure(resolution: &ResolutionResult, warnings: Vec<String>) -> ScaffoldResult {
    let mut errors = Vec::new();
    for id in &resolution.missing {
        errors.push(format!("feature '{}' was not found in the catalog", id));
    }
    for conflict in resolution
        .conflicts
        .iter()
        .filter(|c| c.severity.is_blocking())
    {
        errors.push(conflict_line(conflict));
    }
    ScaffoldResult::failure("feature resolution failed", errors, warnings)
}
