// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cloak content source toolkit.

use thiserror::Error;

/// The primary error type used by content sources, the registry, the CMS
/// config store, and the plugin pipeline.
#[derive(Debug, Error)]
pub enum CloakError {
    /// The operation is not valid for the current state of the receiver
    /// (e.g. switching environments on a single-URL content source).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A registry lookup found no matching source.
    ///
    /// `name` is `None` when no default source has been registered yet.
    #[error("{}", not_found_message(.name.as_deref(), .available))]
    NotFound {
        name: Option<String>,
        available: Vec<String>,
    },

    /// The CMS config was read before it was built or set.
    #[error("called {operation} before the CMS config was built")]
    NotBuilt { operation: &'static str },

    /// The built CMS config has no instances.
    #[error("called {operation} without setting `instances` in the CMS config")]
    NoInstances { operation: &'static str },

    /// A plugin failed while transforming a config. The plugin's own error is
    /// preserved as the source.
    #[error("plugin `{plugin}` failed: {source}")]
    Plugin {
        plugin: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration loading or validation errors.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CloakError {
    /// Wrap an arbitrary error raised by the named plugin.
    pub fn plugin(
        plugin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CloakError::Plugin {
            plugin: plugin.into(),
            source: source.into(),
        }
    }

    /// Returns true for registry lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloakError::NotFound { .. })
    }
}

fn not_found_message(name: Option<&str>, available: &[String]) -> String {
    match name {
        None => "no default content source found; this likely means none has been registered yet"
            .to_string(),
        Some(name) => format!(
            "content source \"{name}\" not found. Available sources: {}",
            available.join(", ")
        ),
    }
}
