// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single content source with URL resolution helpers.
//!
//! The source normalizes its config's `url` once: the active-environment URL
//! is cached, and a per-environment map is kept only when the config supplied
//! one. Single-URL sources answer every environment with the same URL.

use std::any::Any;

use cloak_core::{
    CloakError, ContentSourceConfig, Environment, EnvironmentUrls, PluginChain, SourceUrl,
    DEFAULT_NAME,
};
use cloak_plugin::Sequential;
use serde::de::DeserializeOwned;
use tracing::debug;

/// One configured content endpoint.
///
/// Cloning copies the config, including its `meta` map; plugins, the client
/// factory and the block renderer stay shared.
#[derive(Debug, Clone)]
pub struct ContentSource {
    config: ContentSourceConfig,
    active_url: String,
    urls_by_environment: Option<EnvironmentUrls>,
}

impl ContentSource {
    /// Create a source from `config`, naming it `"default"` if it has no name.
    ///
    /// `admin_path` and `assets_path` are not checked here.
    pub fn new(mut config: ContentSourceConfig) -> Self {
        if config.name.as_deref().is_none_or(str::is_empty) {
            config.name = Some(DEFAULT_NAME.to_string());
        }

        let (active_url, urls_by_environment) = match &config.url {
            SourceUrl::Single(url) => (url.clone(), None),
            SourceUrl::PerEnvironment(urls) => (
                urls.get(config.active_environment).to_string(),
                Some(urls.clone()),
            ),
        };

        Self {
            config,
            active_url,
            urls_by_environment,
        }
    }

    /// The source's unique name.
    pub fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn config(&self) -> &ContentSourceConfig {
        &self.config
    }

    pub fn into_config(self) -> ContentSourceConfig {
        self.config
    }

    /// Run the config's plugins in order and adopt the result.
    ///
    /// Not idempotent: every call runs the current plugin list against the
    /// current config. On error the source is left unchanged.
    pub async fn apply_plugins(&mut self) -> Result<&mut Self, CloakError> {
        self.apply_plugins_with(&Sequential).await
    }

    /// Like [`apply_plugins`](Self::apply_plugins) with a caller-supplied chain.
    pub async fn apply_plugins_with(
        &mut self,
        chain: &dyn PluginChain<ContentSourceConfig>,
    ) -> Result<&mut Self, CloakError> {
        let Some(plugins) = self.config.plugins.clone() else {
            return Ok(self);
        };

        debug!(source = self.name(), count = plugins.len(), "applying source plugins");
        let resolved = chain.apply(self.config.clone(), &plugins).await?;
        // Plugins may rewrite `url` or `name`; re-derive the cached state.
        *self = ContentSource::new(resolved);
        Ok(self)
    }

    /// Invoke the client factory. Runs on every call; nothing is cached.
    pub fn client(&self) -> Option<Box<dyn Any + Send + Sync>> {
        self.config.client.as_ref().map(|factory| factory())
    }

    /// Invoke the client factory and downcast its result to `T`.
    ///
    /// Returns `None` when no factory is configured or it produced another type.
    pub fn client_as<T: Any>(&self) -> Option<T> {
        self.client()?.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// URL of the active environment.
    pub fn active_url(&self) -> &str {
        &self.active_url
    }

    /// URL for `environment`, or the active URL when `None`.
    pub fn url(&self, environment: Option<Environment>) -> &str {
        match (environment, &self.urls_by_environment) {
            (None, _) => self.active_url(),
            (Some(env), Some(urls)) => urls.get(env),
            (Some(_), None) => &self.active_url,
        }
    }

    /// Base URL followed by `admin_path`, concatenated verbatim.
    pub fn admin_url(&self, environment: Option<Environment>) -> String {
        format!("{}{}", self.url(environment), self.config.admin_path)
    }

    /// Base URL followed by `assets_path`, concatenated verbatim.
    pub fn assets_url(&self, environment: Option<Environment>) -> String {
        format!("{}{}", self.url(environment), self.config.assets_path)
    }

    /// Join `path` onto the base URL, adding a leading `/` if missing.
    ///
    /// A trailing slash on the base URL is kept, so `https://x/` joined with
    /// `/a` yields `https://x//a`.
    pub fn resolve_path(&self, path: &str, environment: Option<Environment>) -> String {
        let base = self.url(environment);
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Switch the active environment.
    ///
    /// Fails with [`CloakError::InvalidOperation`] for single-URL sources.
    pub fn set_active_environment(
        &mut self,
        environment: Environment,
    ) -> Result<&mut Self, CloakError> {
        let Some(urls) = &self.urls_by_environment else {
            return Err(CloakError::InvalidOperation(format!(
                "cannot set active environment on single-URL content source \"{}\"; \
                 supply a URL per environment in its config",
                self.name()
            )));
        };

        self.active_url = urls.get(environment).to_string();
        self.config.active_environment = environment;
        Ok(self)
    }

    pub fn active_environment(&self) -> Environment {
        self.config.active_environment
    }

    /// Raw meta value for `key`.
    pub fn get_meta(&self, key: &str) -> Option<&serde_json::Value> {
        self.config.meta.as_ref().and_then(|meta| meta.get(key))
    }

    /// Meta value for `key` read as `T`; `None` if missing or of another shape.
    pub fn get_meta_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        cloak_core::config::read_meta_as(self.config.meta.as_ref(), key)
    }

    /// Mutable access to the meta map, creating it if absent.
    pub fn meta_mut(&mut self) -> &mut cloak_core::Meta {
        self.config.meta.get_or_insert_with(cloak_core::Meta::new)
    }
}

impl From<ContentSourceConfig> for ContentSource {
    fn from(config: ContentSourceConfig) -> Self {
        ContentSource::new(config)
    }
}
