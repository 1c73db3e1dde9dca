// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of built content sources, keyed by name.
//!
//! The first source registered becomes the default and stays the default
//! until [`ContentSourceRegistry::set_default`] or
//! [`ContentSourceRegistry::clear`] is called. Registering a name twice
//! replaces the stored source.
//!
//! Hosts normally own a registry and pass it around. For code that prefers a
//! process-wide instance, [`ContentSourceRegistry::global`] returns one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use cloak_core::{CloakError, ContentSourceConfig, PluginChain};
use cloak_plugin::Sequential;
use futures::future::join_all;
use tracing::{debug, info};

use crate::source::ContentSource;

static GLOBAL: LazyLock<ContentSourceRegistry> = LazyLock::new(ContentSourceRegistry::new);

#[derive(Default)]
struct RegistryState {
    sources: HashMap<String, Arc<ContentSource>>,
    default_name: Option<String>,
}

/// Named content sources plus a default pointer.
pub struct ContentSourceRegistry {
    state: RwLock<RegistryState>,
    chain: Arc<dyn PluginChain<ContentSourceConfig>>,
}

impl ContentSourceRegistry {
    /// Create an empty registry that applies plugins sequentially.
    pub fn new() -> Self {
        Self::with_chain(Arc::new(Sequential))
    }

    /// Create an empty registry that applies plugins with `chain`.
    pub fn with_chain(chain: Arc<dyn PluginChain<ContentSourceConfig>>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            chain,
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static ContentSourceRegistry {
        &GLOBAL
    }

    /// Store `source` under its name, replacing any source with that name.
    ///
    /// The first source registered into an empty registry becomes the default.
    pub fn register(&self, source: impl Into<Arc<ContentSource>>) {
        let source = source.into();
        let name = source.name().to_string();
        let mut state = self.write();

        if state.sources.insert(name.clone(), source).is_some() {
            debug!(source = %name, "replaced registered content source");
        }

        let became_default = state.default_name.is_none();
        if became_default {
            state.default_name = Some(name.clone());
        }
        info!(source = %name, default = became_default, "registered content source");
    }

    /// Register each source in order.
    pub fn register_multiple<I, S>(&self, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<ContentSource>>,
    {
        for source in sources {
            self.register(source);
        }
    }

    /// Build a source from `config`, apply its plugins, then register it.
    ///
    /// If a plugin fails nothing is registered and the plugin's error is
    /// returned.
    pub async fn register_from_config(
        &self,
        config: ContentSourceConfig,
    ) -> Result<Arc<ContentSource>, CloakError> {
        let mut source = ContentSource::new(config);
        source.apply_plugins_with(self.chain.as_ref()).await?;

        let source = Arc::new(source);
        self.register(Arc::clone(&source));
        Ok(source)
    }

    /// Build and register every config concurrently.
    ///
    /// Results come back in input order. Every build runs to completion; if
    /// any failed, the first failure in input order is returned and the
    /// sources that did build stay registered.
    pub async fn register_multiple_from_config(
        &self,
        configs: Vec<ContentSourceConfig>,
    ) -> Result<Vec<Arc<ContentSource>>, CloakError> {
        let builds = configs
            .into_iter()
            .map(|config| self.register_from_config(config));
        join_all(builds).await.into_iter().collect()
    }

    /// Look up a source by name, or the default source when `name` is `None`
    /// or empty.
    pub fn get(&self, name: Option<&str>) -> Result<Arc<ContentSource>, CloakError> {
        let state = self.read();
        let lookup = match name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => state.default_name.clone().ok_or(CloakError::NotFound {
                name: None,
                available: Vec::new(),
            })?,
        };

        state
            .sources
            .get(&lookup)
            .cloned()
            .ok_or_else(|| CloakError::NotFound {
                name: Some(lookup),
                available: sorted_names(&state.sources),
            })
    }

    /// All registered sources, in no particular order.
    pub fn get_all(&self) -> Vec<Arc<ContentSource>> {
        self.read().sources.values().cloned().collect()
    }

    /// The default source.
    pub fn get_default(&self) -> Result<Arc<ContentSource>, CloakError> {
        self.get(None)
    }

    /// Make `name` the default. Fails if no source has that name.
    pub fn set_default(&self, name: &str) -> Result<(), CloakError> {
        let mut state = self.write();
        if !state.sources.contains_key(name) {
            return Err(CloakError::NotFound {
                name: Some(name.to_string()),
                available: sorted_names(&state.sources),
            });
        }
        state.default_name = Some(name.to_string());
        info!(source = name, "default content source changed");
        Ok(())
    }

    /// Name of the default source, if one is set.
    pub fn default_name(&self) -> Option<String> {
        self.read().default_name.clone()
    }

    /// Whether a source called `name` is registered.
    pub fn has(&self, name: &str) -> bool {
        self.read().sources.contains_key(name)
    }

    /// Apply `f` to the registered source called `name`.
    ///
    /// The stored source is copied on write: handles obtained earlier from
    /// [`get`](Self::get) keep seeing the previous state. `f` runs under the
    /// registry's write lock and must not call back into the registry.
    pub fn update<F, R>(&self, name: &str, f: F) -> Result<R, CloakError>
    where
        F: FnOnce(&mut ContentSource) -> Result<R, CloakError>,
    {
        let mut state = self.write();
        let available = sorted_names(&state.sources);
        let entry = state
            .sources
            .get_mut(name)
            .ok_or_else(|| CloakError::NotFound {
                name: Some(name.to_string()),
                available,
            })?;

        let mut updated = (**entry).clone();
        let out = f(&mut updated)?;
        *entry = Arc::new(updated);
        Ok(out)
    }

    /// Remove every source and unset the default.
    pub fn clear(&self) {
        let mut state = self.write();
        let removed = state.sources.len();
        state.sources.clear();
        state.default_name = None;
        info!(removed, "cleared content source registry");
    }

    /// Snapshot of every registered source's config.
    pub fn to_config(&self) -> Vec<ContentSourceConfig> {
        self.read()
            .sources
            .values()
            .map(|source| source.config().clone())
            .collect()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        sorted_names(&self.read().sources)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.read().sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().sources.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ContentSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContentSourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("ContentSourceRegistry")
            .field("sources", &sorted_names(&state.sources))
            .field("default", &state.default_name)
            .finish()
    }
}

fn sorted_names(sources: &HashMap<String, Arc<ContentSource>>) -> Vec<String> {
    let mut names: Vec<String> = sources.keys().cloned().collect();
    names.sort();
    names
}
