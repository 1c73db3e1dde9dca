// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! Lookup order: `./cloak.toml` > `~/.config/cloak/cloak.toml` >
//! `/etc/cloak/cloak.toml`, with `CLOAK_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::debug;

use crate::model::CloakConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/cloak/cloak.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "cloak.toml";

/// Top-level keys settable from the environment. Sources and CMS instances
/// are arrays of tables and can only come from files.
const ENV_KEYS: &[&str] = &["default_source", "active_environment"];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cloak/cloak.toml`
/// 3. `~/.config/cloak/cloak.toml`
/// 4. `./cloak.toml`
/// 5. `CLOAK_DEFAULT_SOURCE` / `CLOAK_ACTIVE_ENVIRONMENT`
pub fn load_config() -> Result<CloakConfig, figment::Error> {
    extract(build_figment())
}

/// Load configuration from a TOML string only. No files, no env vars.
pub fn load_config_from_str(toml_content: &str) -> Result<CloakConfig, figment::Error> {
    extract(
        Figment::new()
            .merge(Serialized::defaults(CloakConfig::default()))
            .merge(Toml::string(toml_content)),
    )
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CloakConfig, figment::Error> {
    extract(
        Figment::new()
            .merge(Serialized::defaults(CloakConfig::default()))
            .merge(Toml::file(path))
            .merge(env_provider()),
    )
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CloakConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/cloak/cloak.toml` (or the platform equivalent).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cloak").join(LOCAL_CONFIG_FILE))
}

fn extract(figment: Figment) -> Result<CloakConfig, figment::Error> {
    let config: CloakConfig = figment.extract()?;
    debug!(
        sources = config.sources.len(),
        cms_instances = config.cms.instances.len(),
        "configuration loaded"
    );
    Ok(config.apply_environment_override())
}

/// `CLOAK_DEFAULT_SOURCE` -> `default_source`, and so on. Other `CLOAK_*`
/// variables are ignored rather than rejected as unknown keys.
fn env_provider() -> Env {
    Env::prefixed("CLOAK_").only(ENV_KEYS)
}
