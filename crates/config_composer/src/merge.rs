//! Configuration update merging.
//!
//! Takes a persisted base configuration plus an overlay of requested
//! changes and produces a new configuration:
//!
//! - scalar fields take the overlay's value when non-empty, else the base's
//! - map fields merge key-wise with the overlay winning on collision
//! - array fields are unioned and de-duplicated, base entries first
//!
//! The merger is stateless: it takes inputs and produces merged output
//! without retaining state between calls.

use crate::configuration::{BuildSpec, Configuration};
use std::collections::BTreeMap;

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;

/// Stateless configuration merging engine.
///
/// # Examples
///
/// ```rust
/// use config_composer::{Configuration, ConfigurationMerger};
///
/// let mut base = Configuration::new("service");
/// base.image = Some("ubuntu:22.04".to_string());
/// base.add_forward_port(8080);
///
/// let mut overlay = Configuration::new("");
/// overlay.image = Some("ubuntu:24.04".to_string());
/// overlay.add_forward_port(5432);
///
/// let merged = ConfigurationMerger::new().merge(&base, &overlay);
/// assert_eq!(merged.name, "service"); // empty overlay scalar keeps the base
/// assert_eq!(merged.image.as_deref(), Some("ubuntu:24.04"));
/// assert_eq!(merged.forward_ports, vec![8080, 5432]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigurationMerger;

impl ConfigurationMerger {
    pub fn new() -> Self {
        Self
    }

    /// Merge an overlay of requested changes onto a base configuration.
    pub fn merge(&self, base: &Configuration, overlay: &Configuration) -> Configuration {
        Configuration {
            name: merge_scalar_string(&base.name, &overlay.name),
            image: merge_optional_string(&base.image, &overlay.image),
            build: merge_build(&base.build, &overlay.build),
            features: merge_map(&base.features, &overlay.features),
            customizations: merge_map(&base.customizations, &overlay.customizations),
            forward_ports: merge_union(&base.forward_ports, &overlay.forward_ports),
            remote_env: merge_map(&base.remote_env, &overlay.remote_env),
            container_env: merge_map(&base.container_env, &overlay.container_env),
            mounts: merge_union(&base.mounts, &overlay.mounts),
            run_args: merge_union(&base.run_args, &overlay.run_args),
            run_services: merge_union(&base.run_services, &overlay.run_services),
            workspace_folder: merge_optional_string(&base.workspace_folder, &overlay.workspace_folder),
            post_create_command: merge_optional_string(
                &base.post_create_command,
                &overlay.post_create_command,
            ),
            docker_compose_file: merge_optional_string(
                &base.docker_compose_file,
                &overlay.docker_compose_file,
            ),
            service: merge_optional_string(&base.service, &overlay.service),
        }
    }
}

fn merge_scalar_string(base: &str, overlay: &str) -> String {
    if overlay.is_empty() {
        base.to_string()
    } else {
        overlay.to_string()
    }
}

fn merge_optional_string(base: &Option<String>, overlay: &Option<String>) -> Option<String> {
    match overlay {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => base.clone(),
    }
}

fn merge_build(base: &Option<BuildSpec>, overlay: &Option<BuildSpec>) -> Option<BuildSpec> {
    match overlay {
        Some(spec) if !spec.is_empty() => Some(spec.clone()),
        _ => base.clone(),
    }
}

fn merge_map<V: Clone>(
    base: &BTreeMap<String, V>,
    overlay: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn merge_union<T: Clone + PartialEq>(base: &[T], overlay: &[T]) -> Vec<T> {
    let mut merged: Vec<T> = base.to_vec();
    for item in overlay {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}
