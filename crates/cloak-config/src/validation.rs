// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks what serde attributes cannot express: URL schemes, path shapes,
//! and name uniqueness across sources and CMS instances.

use std::collections::HashSet;

use cloak_core::{Environment, SourceUrl};

use crate::diagnostic::ConfigError;
use crate::model::CloakConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CloakConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let mut seen_sources = HashSet::new();
    for (i, source) in config.sources.iter().enumerate() {
        let section = format!("sources[{i}]");

        if let Some(name) = &source.name
            && name.trim().is_empty()
        {
            errors.push(invalid(format!("{section}.name must not be blank")));
        }

        let name = CloakConfig::effective_name(source);
        if !seen_sources.insert(name) {
            errors.push(invalid(format!(
                "duplicate source name `{name}` in [[sources]] array"
            )));
        }

        match &source.url {
            SourceUrl::Single(url) => check_url(&mut errors, &format!("{section}.url"), url),
            SourceUrl::PerEnvironment(urls) => {
                for environment in Environment::ALL {
                    check_url(
                        &mut errors,
                        &format!("{section}.url.{environment}"),
                        urls.get(environment),
                    );
                }
            }
        }
        check_path(&mut errors, &format!("{section}.admin_path"), &source.admin_path);
        check_path(&mut errors, &format!("{section}.assets_path"), &source.assets_path);
    }

    if let Some(default) = &config.default_source
        && !seen_sources.contains(default.as_str())
    {
        let mut available: Vec<&str> = seen_sources.iter().copied().collect();
        available.sort_unstable();
        errors.push(invalid(format!(
            "default_source `{default}` does not name a configured source (available: {})",
            available.join(", ")
        )));
    }

    let mut seen_instances = HashSet::new();
    for (i, instance) in config.cms.instances.iter().enumerate() {
        let section = format!("cms.instances[{i}]");

        if let Some(name) = &instance.name
            && !seen_instances.insert(name.as_str())
        {
            errors.push(invalid(format!(
                "duplicate CMS instance name `{name}` in [[cms.instances]] array"
            )));
        }

        check_url(&mut errors, &format!("{section}.url"), &instance.url);
        check_path(&mut errors, &format!("{section}.admin_path"), &instance.admin_path);
        check_path(&mut errors, &format!("{section}.content_path"), &instance.content_path);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, url: &str) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(invalid(format!(
            "{key} `{url}` must be an absolute http:// or https:// URL"
        )));
    }
}

fn check_path(errors: &mut Vec<ConfigError>, key: &str, path: &str) {
    if !path.starts_with('/') {
        errors.push(invalid(format!("{key} `{path}` must start with `/`")));
    }
}
