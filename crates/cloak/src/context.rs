// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`Cloak`] context: one source registry plus one CMS config store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use cloak_cms::CmsConfigStore;
use cloak_config::{CloakConfig, ConfigError};
use cloak_core::{
    CloakError, CmsConfig, CmsInstance, ContentSourceConfig, Plugin, PluginChain, PluginList,
    DEFAULT_NAME,
};
use cloak_source::ContentSourceRegistry;
use tracing::{info, warn};

/// Plugins to attach to configured sources and CMS instances, keyed by name.
///
/// Config files cannot carry plugins, so they are supplied here and appended
/// after any plugins already on the config. The first CMS instance answers to
/// `"default"` when it has no name of its own.
#[derive(Default, Clone)]
pub struct SourcePlugins {
    sources: HashMap<String, PluginList<ContentSourceConfig>>,
    cms_instances: HashMap<String, PluginList<CmsInstance>>,
}

impl SourcePlugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `plugin` to the chain of the source called `name`.
    pub fn source(
        mut self,
        name: impl Into<String>,
        plugin: Arc<dyn Plugin<ContentSourceConfig>>,
    ) -> Self {
        self.sources.entry(name.into()).or_default().push(plugin);
        self
    }

    /// Append `plugin` to the chain of the CMS instance called `name`.
    pub fn cms_instance(
        mut self,
        name: impl Into<String>,
        plugin: Arc<dyn Plugin<CmsInstance>>,
    ) -> Self {
        self.cms_instances
            .entry(name.into())
            .or_default()
            .push(plugin);
        self
    }

    fn attach_to_sources(&mut self, sources: &mut [ContentSourceConfig]) {
        for source in sources {
            let name = CloakConfig::effective_name(source).to_string();
            if let Some(plugins) = self.sources.remove(&name) {
                source.plugins.get_or_insert_with(Vec::new).extend(plugins);
            }
        }
        for name in self.sources.keys() {
            warn!(source = %name, "plugins given for a source that is not configured");
        }
    }

    fn attach_to_cms(&mut self, cms: &mut CmsConfig) {
        for (index, instance) in cms.instances.iter_mut().enumerate() {
            let name = match instance.name.as_deref() {
                Some(name) if !name.is_empty() => name,
                _ if index == 0 => DEFAULT_NAME,
                _ => continue,
            };
            if let Some(plugins) = self.cms_instances.remove(name) {
                instance.plugins.get_or_insert_with(Vec::new).extend(plugins);
            }
        }
        for name in self.cms_instances.keys() {
            warn!(instance = %name, "plugins given for a CMS instance that is not configured");
        }
    }
}

impl std::fmt::Debug for SourcePlugins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sources: Vec<&String> = self.sources.keys().collect();
        sources.sort();
        let mut cms_instances: Vec<&String> = self.cms_instances.keys().collect();
        cms_instances.sort();
        f.debug_struct("SourcePlugins")
            .field("sources", &sources)
            .field("cms_instances", &cms_instances)
            .finish()
    }
}

/// A content source registry and a CMS config store owned together.
///
/// Use this instead of the process-wide handles when several independent
/// setups must coexist, e.g. in tests.
#[derive(Debug, Default)]
pub struct Cloak {
    sources: ContentSourceRegistry,
    cms: CmsConfigStore,
}

impl Cloak {
    /// An empty context using sequential plugin chains.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty context using the given plugin chains.
    pub fn with_chains(
        source_chain: Arc<dyn PluginChain<ContentSourceConfig>>,
        cms_chain: Arc<dyn PluginChain<CmsInstance>>,
    ) -> Self {
        Self {
            sources: ContentSourceRegistry::with_chain(source_chain),
            cms: CmsConfigStore::with_chain(cms_chain),
        }
    }

    /// Build a context from a loaded config. See [`load`](Self::load).
    pub async fn from_config(
        config: CloakConfig,
        plugins: SourcePlugins,
    ) -> Result<Self, CloakError> {
        let cloak = Self::new();
        cloak.load(config, plugins).await?;
        Ok(cloak)
    }

    /// Load and validate `path`, then build a context from it.
    pub async fn from_file(path: &Path, plugins: SourcePlugins) -> Result<Self, CloakError> {
        let config = cloak_config::load_and_validate_path(path).map_err(config_errors)?;
        Self::from_config(config, plugins).await
    }

    /// Validate `config`, register every configured source and store the
    /// CMS config.
    ///
    /// An invalid config is rejected with [`CloakError::Config`] before
    /// anything is registered. Sources are built concurrently with their
    /// plugins applied; if any fails, its error is returned and the sources
    /// that built stay registered. `default_source`, when set, becomes the
    /// registry default. Otherwise the first declared source does, unless the
    /// registry already had a default. The CMS config is stored idle and
    /// builds on first access.
    pub async fn load(
        &self,
        config: CloakConfig,
        mut plugins: SourcePlugins,
    ) -> Result<(), CloakError> {
        cloak_config::validation::validate_config(&config).map_err(config_errors)?;

        let CloakConfig {
            default_source,
            mut sources,
            mut cms,
            ..
        } = config.apply_environment_override();

        plugins.attach_to_sources(&mut sources);
        plugins.attach_to_cms(&mut cms);

        let had_default = self.sources.default_name().is_some();
        let default_source = default_source.or_else(|| {
            sources
                .first()
                .filter(|_| !had_default)
                .map(|source| CloakConfig::effective_name(source).to_string())
        });

        let count = sources.len();
        self.sources.register_multiple_from_config(sources).await?;
        if let Some(name) = default_source {
            self.sources.set_default(&name)?;
        }
        self.cms.set(cms);

        info!(sources = count, "configuration applied");
        Ok(())
    }

    pub fn sources(&self) -> &ContentSourceRegistry {
        &self.sources
    }

    pub fn cms(&self) -> &CmsConfigStore {
        &self.cms
    }

    /// Drop every registered source and both CMS configs.
    pub fn reset(&self) {
        self.sources.clear();
        self.cms.reset();
    }
}

fn config_errors(errors: Vec<ConfigError>) -> CloakError {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    CloakError::Config(messages.join("; "))
}
