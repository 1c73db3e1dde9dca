// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CMS config store with lazy building.
//!
//! A store holds up to two configs: an *idle* one registered with
//! [`CmsConfigStore::set`] and not yet built, and a *built* one produced by
//! [`CmsConfigStore::build`]. Async reads build the idle config on first use.
//! Reads of the built slot are lock-free.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwapOption;
use cloak_core::{CloakError, CmsConfig, CmsInstance, PluginChain, DEFAULT_NAME};
use cloak_plugin::Sequential;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::builder::build_cms_instance_with;

static GLOBAL: LazyLock<CmsConfigStore> = LazyLock::new(CmsConfigStore::new);

/// Holds the idle and built CMS configs.
pub struct CmsConfigStore {
    idle: ArcSwapOption<CmsConfig>,
    built: ArcSwapOption<CmsConfig>,
    /// Serializes builds so concurrent lazy reads build the idle config once.
    build_lock: Mutex<()>,
    chain: Arc<dyn PluginChain<CmsInstance>>,
}

impl CmsConfigStore {
    /// Create an empty store that applies plugins with [`Sequential`].
    pub fn new() -> Self {
        Self::with_chain(Arc::new(Sequential))
    }

    /// Create an empty store that applies plugins with `chain`.
    pub fn with_chain(chain: Arc<dyn PluginChain<CmsInstance>>) -> Self {
        Self {
            idle: ArcSwapOption::empty(),
            built: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
            chain,
        }
    }

    /// The process-wide store used by the free functions in this module.
    pub fn global() -> &'static CmsConfigStore {
        &GLOBAL
    }

    /// Register `config` to be built on first async access.
    ///
    /// A previously built config is left in place and keeps being returned
    /// until the next successful [`build`](Self::build).
    pub fn set(&self, config: CmsConfig) {
        debug!(instances = config.instances.len(), "storing idle CMS config");
        self.idle.store(Some(Arc::new(config)));
    }

    /// Build every instance in order and store the result.
    ///
    /// The first instance is named [`DEFAULT_NAME`] when it has no name. On
    /// error nothing is stored and the previous built config stays current.
    pub async fn build(&self, config: CmsConfig) -> Result<Arc<CmsConfig>, CloakError> {
        let _guard = self.build_lock.lock().await;
        self.build_locked(config).await
    }

    /// The built config, building the idle one first if needed.
    pub async fn get(&self) -> Result<Arc<CmsConfig>, CloakError> {
        if let Some(built) = self.built.load_full() {
            return Ok(built);
        }

        let _guard = self.build_lock.lock().await;
        // Another task may have built while we waited.
        if let Some(built) = self.built.load_full() {
            return Ok(built);
        }
        match self.idle.load_full() {
            Some(idle) => {
                debug!("building idle CMS config on first access");
                self.build_locked((*idle).clone()).await
            }
            None => Err(CloakError::NotBuilt {
                operation: "get_cms_config()",
            }),
        }
    }

    /// The built config, without triggering a build.
    pub fn built(&self) -> Result<Arc<CmsConfig>, CloakError> {
        self.built.load_full().ok_or(CloakError::NotBuilt {
            operation: "get_cms_config()",
        })
    }

    /// The idle config last passed to [`set`](Self::set), if any.
    pub fn idle(&self) -> Option<Arc<CmsConfig>> {
        self.idle.load_full()
    }

    /// Look up an instance by name, building the idle config if needed.
    ///
    /// Without a name the first instance is returned. A name matching no
    /// instance yields `Ok(None)`.
    pub async fn instance(&self, name: Option<&str>) -> Result<Option<CmsInstance>, CloakError> {
        let config = self.get().await.map_err(as_instance_error)?;
        select_instance(&config, name)
    }

    /// Like [`instance`](Self::instance) but only consults the built config.
    pub fn instance_sync(&self, name: Option<&str>) -> Result<Option<CmsInstance>, CloakError> {
        let config = self.built().map_err(as_instance_error)?;
        select_instance(&config, name)
    }

    /// Forget both the idle and the built config.
    pub fn reset(&self) {
        self.idle.store(None);
        self.built.store(None);
    }

    async fn build_locked(&self, config: CmsConfig) -> Result<Arc<CmsConfig>, CloakError> {
        let mut instances = Vec::with_capacity(config.instances.len());
        for (index, mut instance) in config.instances.into_iter().enumerate() {
            if index == 0 && instance.name.as_deref().is_none_or(str::is_empty) {
                instance.name = Some(DEFAULT_NAME.to_string());
            }
            instances.push(build_cms_instance_with(instance, self.chain.as_ref()).await?);
        }

        let built = Arc::new(CmsConfig { instances });
        self.built.store(Some(Arc::clone(&built)));
        info!(instances = built.instances.len(), "CMS config built");
        Ok(built)
    }
}

impl Default for CmsConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CmsConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfigStore")
            .field("idle", &self.idle.load().is_some())
            .field("built", &self.built.load().is_some())
            .finish()
    }
}

fn as_instance_error(err: CloakError) -> CloakError {
    match err {
        CloakError::NotBuilt { .. } => CloakError::NotBuilt {
            operation: "get_cms_instance()",
        },
        other => other,
    }
}

fn select_instance(
    config: &CmsConfig,
    name: Option<&str>,
) -> Result<Option<CmsInstance>, CloakError> {
    if config.instances.is_empty() {
        return Err(CloakError::NoInstances {
            operation: "get_cms_instance()",
        });
    }
    let found = match name.filter(|n| !n.is_empty()) {
        None => config.instances.first(),
        Some(name) => config
            .instances
            .iter()
            .find(|instance| instance.name.as_deref() == Some(name)),
    };
    Ok(found.cloned())
}

/// Build `config` into the global store. See [`CmsConfigStore::build`].
pub async fn build_cms_config(config: CmsConfig) -> Result<Arc<CmsConfig>, CloakError> {
    CmsConfigStore::global().build(config).await
}

/// Register an idle config on the global store. See [`CmsConfigStore::set`].
pub fn set_cms_config(config: CmsConfig) {
    CmsConfigStore::global().set(config);
}

/// The global built config, building lazily. See [`CmsConfigStore::get`].
pub async fn get_cms_config() -> Result<Arc<CmsConfig>, CloakError> {
    CmsConfigStore::global().get().await
}

/// An instance from the global config. See [`CmsConfigStore::instance`].
pub async fn get_cms_instance(name: Option<&str>) -> Result<Option<CmsInstance>, CloakError> {
    CmsConfigStore::global().instance(name).await
}
