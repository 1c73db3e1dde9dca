// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative configuration objects for content sources and CMS instances.
//!
//! Fields that only exist at runtime (plugins, client factories, block
//! renderers) are skipped by serde and attached in code.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::traits::{Plugin, PluginList};
use crate::types::{BlockRenderer, ClientFactory, Environment, Meta, SourceUrl};

/// Name given to an unnamed content source, and to the first CMS instance
/// when it has none.
pub const DEFAULT_NAME: &str = "default";

/// Configuration for one content source endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentSourceConfig {
    /// Unique name differentiating this source from others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Base URL, single or per environment.
    pub url: SourceUrl,

    /// Which per-environment URL is active. Ignored for single URLs.
    #[serde(default)]
    pub active_environment: Environment,

    /// Root path of the admin UI, e.g. `/wp-admin`.
    pub admin_path: String,

    /// Root path where file assets are stored.
    pub assets_path: String,

    #[serde(skip)]
    pub client: Option<ClientFactory>,

    #[serde(skip)]
    pub block_renderer: Option<BlockRenderer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Applied in declaration order by `ContentSource::apply_plugins`.
    #[serde(skip)]
    pub plugins: Option<PluginList<ContentSourceConfig>>,
}

impl ContentSourceConfig {
    /// Create a config with `/` for both the admin and assets paths.
    pub fn new(url: impl Into<SourceUrl>) -> Self {
        Self {
            name: None,
            url: url.into(),
            active_environment: Environment::default(),
            admin_path: "/".to_string(),
            assets_path: "/".to_string(),
            client: None,
            block_renderer: None,
            meta: None,
            plugins: None,
        }
    }

    /// Register under `name` instead of `"default"`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Select which per-environment URL is active.
    pub fn with_active_environment(mut self, environment: Environment) -> Self {
        self.active_environment = environment;
        self
    }

    /// Path appended to the active URL by `admin_url`.
    pub fn with_admin_path(mut self, path: impl Into<String>) -> Self {
        self.admin_path = path.into();
        self
    }

    /// Path appended to the active URL by `assets_url`.
    pub fn with_assets_path(mut self, path: impl Into<String>) -> Self {
        self.assets_path = path.into();
        self
    }

    /// Insert a single meta entry, creating the map if needed.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.meta
            .get_or_insert_with(Meta::new)
            .insert(key.into(), value.into());
        self
    }

    /// Append a plugin to the end of the chain.
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin<ContentSourceConfig>>) -> Self {
        self.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    /// Set the factory that builds this source's client.
    pub fn with_client<F, T>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.client = Some(Arc::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>));
        self
    }

    /// Attach a block renderer.
    pub fn with_block_renderer(mut self, renderer: BlockRenderer) -> Self {
        self.block_renderer = Some(renderer);
        self
    }
}

impl fmt::Debug for ContentSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSourceConfig")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("active_environment", &self.active_environment)
            .field("admin_path", &self.admin_path)
            .field("assets_path", &self.assets_path)
            .field("client", &self.client.is_some())
            .field("block_renderer", &self.block_renderer.is_some())
            .field("meta", &self.meta)
            .field("plugins", &plugin_names(self.plugins.as_deref()))
            .finish()
    }
}

/// Configuration for one CMS instance.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CmsInstance {
    pub url: String,

    /// Root path where the CMS admin UI is accessible.
    pub admin_path: String,

    /// Root path where the CMS stores content, images and files.
    pub content_path: String,

    /// Lets callers target this instance when several are configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip)]
    pub client: Option<ClientFactory>,

    #[serde(skip)]
    pub block_renderer: Option<BlockRenderer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(skip)]
    pub plugins: Option<PluginList<CmsInstance>>,
}

impl CmsInstance {
    /// Create an unnamed instance with nothing attached.
    pub fn new(
        url: impl Into<String>,
        admin_path: impl Into<String>,
        content_path: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            admin_path: admin_path.into(),
            content_path: content_path.into(),
            name: None,
            client: None,
            block_renderer: None,
            meta: None,
            plugins: None,
        }
    }

    /// Name the instance. An unnamed first instance answers to `"default"`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Insert a single meta entry, creating the map if needed.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.meta
            .get_or_insert_with(Meta::new)
            .insert(key.into(), value.into());
        self
    }

    /// Append a plugin to the end of the chain.
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin<CmsInstance>>) -> Self {
        self.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    /// Set the factory that builds this instance's client.
    pub fn with_client<F, T>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.client = Some(Arc::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>));
        self
    }

    /// Invoke the client factory, if any.
    pub fn client(&self) -> Option<Box<dyn Any + Send + Sync>> {
        self.client.as_ref().map(|factory| factory())
    }

    /// Raw meta value for `key`.
    pub fn get_meta(&self, key: &str) -> Option<&serde_json::Value> {
        self.meta.as_ref().and_then(|meta| meta.get(key))
    }

    /// Meta value for `key` read as `T`. See [`read_meta_as`].
    pub fn get_meta_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        read_meta_as(self.meta.as_ref(), key)
    }
}

impl fmt::Debug for CmsInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsInstance")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("admin_path", &self.admin_path)
            .field("content_path", &self.content_path)
            .field("client", &self.client.is_some())
            .field("block_renderer", &self.block_renderer.is_some())
            .field("meta", &self.meta)
            .field("plugins", &plugin_names(self.plugins.as_deref()))
            .finish()
    }
}

/// Top-level CMS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CmsConfig {
    #[serde(default)]
    pub instances: Vec<CmsInstance>,
}

impl CmsConfig {
    pub fn new(instances: Vec<CmsInstance>) -> Self {
        Self { instances }
    }
}

/// Read a meta entry as `T`.
///
/// There is no schema behind meta values: a value of the wrong shape reads
/// as `None`, exactly like a missing key.
pub fn read_meta_as<T: DeserializeOwned>(meta: Option<&Meta>, key: &str) -> Option<T> {
    let value = meta?.get(key)?;
    serde_json::from_value(value.clone()).ok()
}

fn plugin_names<C: Send + 'static>(plugins: Option<&[Arc<dyn Plugin<C>>]>) -> Option<Vec<&str>> {
    plugins.map(|list| list.iter().map(|p| p.name()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_source_config_from_toml() {
        let toml_str = r#"
name = "wordpress"
url = "https://cms.example.com"
admin_path = "/wp-admin"
assets_path = "/wp-content/uploads"

[meta]
api_version = 2
"#;
        let config: ContentSourceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.name.as_deref(), Some("wordpress"));
        assert_eq!(config.active_environment, Environment::Production);
        assert_eq!(read_meta_as::<u32>(config.meta.as_ref(), "api_version"), Some(2));
        assert!(config.plugins.is_none());
    }

    #[test]
    fn content_source_config_denies_unknown_fields() {
        let toml_str = r#"
url = "https://cms.example.com"
admin_path = "/"
assets_path = "/"
admn_path = "/oops"
"#;
        assert!(toml::from_str::<ContentSourceConfig>(toml_str).is_err());
    }

    #[test]
    fn meta_type_mismatch_reads_as_none() {
        let config = ContentSourceConfig::new("https://x.example").with_meta("count", "three");
        assert_eq!(read_meta_as::<u32>(config.meta.as_ref(), "count"), None);
        assert_eq!(
            read_meta_as::<String>(config.meta.as_ref(), "count").as_deref(),
            Some("three")
        );
        assert_eq!(read_meta_as::<String>(None, "count"), None);
    }

    #[test]
    fn cms_instance_client_is_invoked_each_time() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let instance = CmsInstance::new("https://x.example", "/admin", "/content").with_client(
            move || counter.fetch_add(1, Ordering::SeqCst),
        );

        let first = instance.client().unwrap();
        let second = instance.client().unwrap();
        assert_eq!(*first.downcast::<usize>().unwrap(), 0);
        assert_eq!(*second.downcast::<usize>().unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cms_config_instances_default_to_empty() {
        let config: CmsConfig = toml::from_str("").unwrap();
        assert!(config.instances.is_empty());
    }

    #[test]
    fn debug_reports_runtime_fields_by_presence() {
        let config = ContentSourceConfig::new("https://x.example").with_client(|| 1u8);
        let debug = format!("{config:?}");
        assert!(debug.contains("client: true"));
        assert!(debug.contains("plugins: None"));
    }
}
