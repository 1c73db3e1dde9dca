// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ready-made configs.

use cloak_core::{CmsInstance, ContentSourceConfig, Environment, EnvironmentUrls};

/// A named single-URL source with `/admin` and `/assets` paths.
pub fn single_url_config(name: &str, url: &str) -> ContentSourceConfig {
    ContentSourceConfig::new(url)
        .with_name(name)
        .with_admin_path("/admin")
        .with_assets_path("/assets")
}

/// A named source with a URL per environment:
///
/// | environment | url                           |
/// |-------------|-------------------------------|
/// | local       | `http://localhost:8080`       |
/// | staging     | `https://staging.example.com` |
/// | production  | `https://example.com`         |
pub fn multi_env_config(name: &str, active: Environment) -> ContentSourceConfig {
    ContentSourceConfig::new(EnvironmentUrls {
        local: "http://localhost:8080".to_string(),
        staging: "https://staging.example.com".to_string(),
        production: "https://example.com".to_string(),
    })
    .with_name(name)
    .with_active_environment(active)
    .with_admin_path("/admin")
    .with_assets_path("/assets")
}

/// An unnamed CMS instance with `/admin` and `/content` paths.
pub fn cms_instance(url: &str) -> CmsInstance {
    CmsInstance::new(url, "/admin", "/content")
}
