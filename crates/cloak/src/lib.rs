// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named content sources and CMS instances.
//!
//! A content source is a CMS endpoint with a base URL per environment, admin
//! and asset paths, free-form metadata, an optional client factory and a
//! chain of async plugins that can rewrite its config. Sources live in a
//! [`ContentSourceRegistry`]; CMS instances live in a [`CmsConfigStore`].
//! [`Cloak`] bundles one of each and can bootstrap both from a `cloak.toml`.
//!
//! ```no_run
//! # async fn run() -> Result<(), cloak::CloakError> {
//! use cloak::{Cloak, SourcePlugins};
//!
//! let cloak = Cloak::from_file("cloak.toml".as_ref(), SourcePlugins::new()).await?;
//! let source = cloak.sources().get_default()?;
//! println!("{}", source.admin_url(None));
//! # Ok(())
//! # }
//! ```

pub mod context;

pub use context::{Cloak, SourcePlugins};

pub use cloak_cms::{
    build_cms_config, build_cms_instance, get_cms_config, get_cms_instance, set_cms_config,
    CmsConfigStore,
};
pub use cloak_config::{
    load_and_validate, load_and_validate_path, load_and_validate_str, render_errors,
    CloakConfig, ConfigError,
};
pub use cloak_core::{
    strip_trailing_slash, BlockRenderer, ClientFactory, CloakError, CmsConfig, CmsInstance,
    ContentSourceConfig, Environment, EnvironmentUrls, Meta, Plugin, PluginChain, PluginList,
    SourceUrl, DEFAULT_NAME,
};
pub use cloak_plugin::{from_async_fn, from_fn, with_plugins, Sequential};
pub use cloak_source::{ContentSource, ContentSourceRegistry};
