// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock plugins for deterministic testing.
//!
//! Every mock implements [`Plugin`] for any config type it can work with, so
//! the same mock serves content source and CMS instance tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cloak_core::{CloakError, CmsInstance, ContentSourceConfig, Meta, Plugin};

/// Configs that carry a meta map.
pub trait HasMeta {
    fn meta_mut(&mut self) -> &mut Meta;
}

impl HasMeta for ContentSourceConfig {
    fn meta_mut(&mut self) -> &mut Meta {
        self.meta.get_or_insert_with(Meta::new)
    }
}

impl HasMeta for CmsInstance {
    fn meta_mut(&mut self) -> &mut Meta {
        self.meta.get_or_insert_with(Meta::new)
    }
}

/// Writes `key = value` into the config's meta map.
#[derive(Debug, Clone)]
pub struct MarkerPlugin {
    key: String,
    value: serde_json::Value,
}

impl MarkerPlugin {
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Shorthand for `Arc::new(MarkerPlugin::new(..))` as a trait object.
    pub fn arc<C>(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Arc<dyn Plugin<C>>
    where
        C: HasMeta + Send + 'static,
    {
        Arc::new(Self::new(key, value))
    }
}

#[async_trait]
impl<C> Plugin<C> for MarkerPlugin
where
    C: HasMeta + Send + 'static,
{
    fn name(&self) -> &str {
        "marker"
    }

    async fn apply(&self, mut config: C) -> Result<C, CloakError> {
        config
            .meta_mut()
            .insert(self.key.clone(), self.value.clone());
        Ok(config)
    }
}

/// Passes the config through and counts how often it ran.
#[derive(Debug, Clone, Default)]
pub struct CountingPlugin {
    calls: Arc<AtomicUsize>,
}

impl CountingPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trait-object handle sharing this plugin's counter.
    pub fn as_plugin<C: Send + 'static>(&self) -> Arc<dyn Plugin<C>> {
        Arc::new(self.clone())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<C> Plugin<C> for CountingPlugin
where
    C: Send + 'static,
{
    fn name(&self) -> &str {
        "counting"
    }

    async fn apply(&self, config: C) -> Result<C, CloakError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(config)
    }
}

/// Always fails with [`CloakError::Plugin`] carrying `message`.
#[derive(Debug, Clone)]
pub struct FailingPlugin {
    name: String,
    message: String,
}

impl FailingPlugin {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn arc<C: Send + 'static>(
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Arc<dyn Plugin<C>> {
        Arc::new(Self::new(name, message))
    }
}

#[async_trait]
impl<C> Plugin<C> for FailingPlugin
where
    C: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, _config: C) -> Result<C, CloakError> {
        Err(CloakError::plugin(
            self.name.clone(),
            std::io::Error::other(self.message.clone()),
        ))
    }
}

/// Shared, ordered log of plugin tags.
pub type PluginLog = Arc<Mutex<Vec<String>>>;

/// Appends its tag to a [`PluginLog`] when it finishes, optionally after a
/// delay. Useful for asserting execution and completion order.
#[derive(Debug, Clone)]
pub struct RecordingPlugin {
    tag: String,
    log: PluginLog,
    delay: Option<Duration>,
}

impl RecordingPlugin {
    pub fn new(tag: impl Into<String>, log: &PluginLog) -> Self {
        Self {
            tag: tag.into(),
            log: Arc::clone(log),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn into_plugin<C: Send + 'static>(self) -> Arc<dyn Plugin<C>> {
        Arc::new(self)
    }

    /// Create an empty log.
    pub fn log() -> PluginLog {
        Arc::new(Mutex::new(Vec::new()))
    }
}

#[async_trait]
impl<C> Plugin<C> for RecordingPlugin
where
    C: Send + 'static,
{
    fn name(&self) -> &str {
        &self.tag
    }

    async fn apply(&self, config: C) -> Result<C, CloakError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().await.push(self.tag.clone());
        Ok(config)
    }
}
