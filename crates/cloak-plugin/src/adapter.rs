// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closure adapters for the [`Plugin`] trait.
//!
//! Most plugins are a single function. [`from_fn`] wraps a synchronous
//! closure and [`from_async_fn`] wraps one returning a future. Errors that are
//! not already a [`CloakError`] are reported as [`CloakError::Plugin`] under
//! the adapter's name.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use cloak_core::{CloakError, Plugin};

type BoxError = Box<dyn Error + Send + Sync>;

/// Plugin backed by a synchronous closure.
pub struct FnPlugin<F> {
    name: String,
    f: F,
}

/// Plugin backed by a closure returning a future.
pub struct AsyncFnPlugin<F> {
    name: String,
    f: F,
}

impl<F> fmt::Debug for FnPlugin<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPlugin").field("name", &self.name).finish()
    }
}

impl<F> fmt::Debug for AsyncFnPlugin<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFnPlugin")
            .field("name", &self.name)
            .finish()
    }
}

#[async_trait]
impl<C, F, E> Plugin<C> for FnPlugin<F>
where
    C: Send + 'static,
    F: Fn(C) -> Result<C, E> + Send + Sync,
    E: Into<BoxError> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, config: C) -> Result<C, CloakError> {
        (self.f)(config).map_err(|e| into_plugin_error(&self.name, e))
    }
}

#[async_trait]
impl<C, F, Fut, E> Plugin<C> for AsyncFnPlugin<F>
where
    C: Send + 'static,
    F: Fn(C) -> Fut + Send + Sync,
    Fut: Future<Output = Result<C, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, config: C) -> Result<C, CloakError> {
        (self.f)(config)
            .await
            .map_err(|e| into_plugin_error(&self.name, e))
    }
}

/// Wrap a synchronous `C -> Result<C, E>` closure as a named plugin.
pub fn from_fn<C, F, E>(name: impl Into<String>, f: F) -> Arc<dyn Plugin<C>>
where
    C: Send + 'static,
    F: Fn(C) -> Result<C, E> + Send + Sync + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(FnPlugin {
        name: name.into(),
        f,
    })
}

/// Wrap an asynchronous `C -> Future<Result<C, E>>` closure as a named plugin.
pub fn from_async_fn<C, F, Fut, E>(name: impl Into<String>, f: F) -> Arc<dyn Plugin<C>>
where
    C: Send + 'static,
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(AsyncFnPlugin {
        name: name.into(),
        f,
    })
}

/// A `CloakError` raised inside a closure passes through unchanged.
fn into_plugin_error<E: Into<BoxError>>(name: &str, err: E) -> CloakError {
    match err.into().downcast::<CloakError>() {
        Ok(cloak) => *cloak,
        Err(other) => CloakError::Plugin {
            plugin: name.to_string(),
            source: other,
        },
    }
}
