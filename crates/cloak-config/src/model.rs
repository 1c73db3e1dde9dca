// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level configuration model.
//!
//! Source and CMS sections reuse the `cloak-core` config types, so a loaded
//! file yields the same values code would build by hand (minus plugins,
//! clients and block renderers, which are attached after loading).

use cloak_core::{CmsConfig, ContentSourceConfig, Environment};
use serde::{Deserialize, Serialize};

/// Everything a `cloak.toml` can declare.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CloakConfig {
    /// Source to make the registry default. Defaults to the first declared source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_source: Option<String>,

    /// Overrides `active_environment` on every source when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_environment: Option<Environment>,

    /// Content sources, registered in declaration order.
    #[serde(default)]
    pub sources: Vec<ContentSourceConfig>,

    /// CMS instances.
    #[serde(default)]
    pub cms: CmsConfig,
}

impl CloakConfig {
    /// Push the top-level `active_environment`, if any, down to every source.
    pub fn apply_environment_override(mut self) -> Self {
        if let Some(environment) = self.active_environment {
            for source in &mut self.sources {
                source.active_environment = environment;
            }
        }
        self
    }

    /// Name a source registers under: its own name, or `"default"`.
    pub fn effective_name(source: &ContentSourceConfig) -> &str {
        match source.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => cloak_core::DEFAULT_NAME,
        }
    }
}
