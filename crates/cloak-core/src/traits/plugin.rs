// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin and plugin-chain traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CloakError;

/// A transformation applied to a config before it is considered final.
///
/// A plugin receives the current config by value and returns the config the
/// next plugin should see. Returning an error aborts the whole chain.
#[async_trait]
pub trait Plugin<C>: Send + Sync
where
    C: Send + 'static,
{
    /// Name used in logs and in [`CloakError::Plugin`].
    fn name(&self) -> &str;

    /// Transform `config`.
    async fn apply(&self, config: C) -> Result<C, CloakError>;
}

/// Ordered list of plugins as stored on a config.
pub type PluginList<C> = Vec<Arc<dyn Plugin<C>>>;

/// Strategy for running a plugin list against an initial value.
///
/// The toolkit depends on this capability rather than on a concrete
/// implementation so hosts and tests can substitute their own.
#[async_trait]
pub trait PluginChain<C>: Send + Sync
where
    C: Send + 'static,
{
    /// Run `plugins` against `initial` and return the final value.
    async fn apply(&self, initial: C, plugins: &[Arc<dyn Plugin<C>>]) -> Result<C, CloakError>;
}
