//! Structural configuration validation.
//!
//! Validation never raises for expected domain conditions: every check
//! folds its findings into a [`ValidationReport`] and the caller reads the
//! graded severity off the report. Structural violations grade `Error` and
//! block file generation; advisory findings grade `Warning` and do not.

use crate::configuration::Configuration;
use feature_resolver::{FeatureCatalog, ValidationReport};
use regex::Regex;
use tracing::debug;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

const NAME_PATTERN: &str = "^[A-Za-z0-9_-]+$";
const MAX_PORT: i64 = 65535;

/// Stateless structural validator for [`Configuration`] values.
///
/// # Examples
///
/// ```rust
/// use config_composer::{Configuration, ConfigurationValidator};
/// use feature_resolver::{InMemoryFeatureCatalog, Severity};
///
/// let catalog = InMemoryFeatureCatalog::default();
/// let validator = ConfigurationValidator::new();
///
/// let mut config = Configuration::new("my-project");
/// config.image = Some("ubuntu:24.04".to_string());
///
/// let report = validator.validate(&config, &catalog);
/// assert!(report.is_valid());
/// assert_eq!(report.severity(), Severity::Warning); // advisories only
/// ```
pub struct ConfigurationValidator {
    name_pattern: Regex,
}

impl Default for ConfigurationValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationValidator {
    pub fn new() -> Self {
        Self {
            name_pattern: Regex::new(NAME_PATTERN).expect("hard-coded pattern compiles"),
        }
    }

    /// Run every structural and advisory check, re-validating each declared
    /// feature against the catalog's per-feature option validator.
    pub fn validate(
        &self,
        configuration: &Configuration,
        catalog: &dyn FeatureCatalog,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.check_name(configuration, &mut report);
        self.check_image_and_build(configuration, &mut report);
        self.check_features(configuration, catalog, &mut report);
        self.check_ports(configuration, &mut report);
        self.check_env(configuration, &mut report);
        self.check_advisories(configuration, &mut report);

        debug!(
            name = %configuration.name,
            severity = %report.severity(),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validated configuration"
        );
        report
    }

    fn check_name(&self, configuration: &Configuration, report: &mut ValidationReport) {
        if configuration.name.is_empty() {
            report.add_error("name", "name must not be empty");
        } else if !self.name_pattern.is_match(&configuration.name) {
            report.add_error(
                "name",
                format!(
                    "name '{}' may only contain letters, digits, underscores, and hyphens",
                    configuration.name
                ),
            );
        }
    }

    fn check_image_and_build(&self, configuration: &Configuration, report: &mut ValidationReport) {
        let has_image = configuration
            .image
            .as_deref()
            .is_some_and(|image| !image.is_empty());
        let has_build = configuration.build.is_some();

        match (has_image, has_build) {
            (false, false) => {
                report.add_error("image", "exactly one of image or build must be present");
            }
            (true, true) => {
                report.add_error(
                    "image",
                    "image and build are mutually exclusive; specify exactly one",
                );
            }
            _ => {}
        }

        if let Some(image) = configuration.image.as_deref() {
            if !image.is_empty() {
                if image.chars().any(char::is_whitespace) {
                    report.add_error("image", "image must not contain whitespace");
                }
                if image.starts_with('-') || image.ends_with('-') {
                    report.add_error("image", "image must not start or end with a hyphen");
                }
            }
        }

        if let Some(build) = &configuration.build {
            if build.is_empty() {
                report.add_error("build", "build must carry a dockerfile or a context");
            }
        }
    }

    fn check_features(
        &self,
        configuration: &Configuration,
        catalog: &dyn FeatureCatalog,
        report: &mut ValidationReport,
    ) {
        for (feature_key, options) in &configuration.features {
            let feature_report = catalog.validate_options(feature_key, options);
            report.absorb_prefixed(&format!("features.{}", feature_key), feature_report);
        }
    }

    fn check_ports(&self, configuration: &Configuration, report: &mut ValidationReport) {
        for port in &configuration.forward_ports {
            if *port <= 0 || *port > MAX_PORT {
                report.add_error(
                    "forwardPorts",
                    format!("port {} is outside the valid range (0, 65535]", port),
                );
            }
        }
    }

    fn check_env(&self, configuration: &Configuration, report: &mut ValidationReport) {
        for (field, env) in [
            ("remoteEnv", &configuration.remote_env),
            ("containerEnv", &configuration.container_env),
        ] {
            if env.keys().any(|key| key.is_empty()) {
                report.add_error(field, "environment variable keys must not be empty");
            }
        }
    }

    fn check_advisories(&self, configuration: &Configuration, report: &mut ValidationReport) {
        if configuration.features.is_empty() {
            report.add_warning("features", "no features declared");
        }
        if configuration.forward_ports.is_empty() {
            report.add_warning("forwardPorts", "no ports forwarded");
        }
    }
}
