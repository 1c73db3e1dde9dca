// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cloak content source toolkit.
//!
//! This crate provides the error type, the declarative configuration model
//! for content sources and CMS instances, and the plugin traits every other
//! crate in the workspace builds on.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod util;

// Re-export key items at crate root for ergonomic imports.
pub use config::{CmsConfig, CmsInstance, ContentSourceConfig, DEFAULT_NAME};
pub use error::CloakError;
pub use traits::{Plugin, PluginChain, PluginList};
pub use types::{BlockRenderer, ClientFactory, Environment, EnvironmentUrls, Meta, SourceUrl};
pub use util::strip_trailing_slash;
