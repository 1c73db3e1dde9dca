// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Cloak crates.
//!
//! Provides mock plugins with observable behavior and config fixtures so
//! tests stay short and deterministic.
//!
//! # Components
//!
//! - [`MarkerPlugin`] - writes a meta entry
//! - [`CountingPlugin`] - counts invocations
//! - [`FailingPlugin`] - always fails
//! - [`RecordingPlugin`] - appends its tag to a shared log, optionally after a delay

pub mod fixtures;
pub mod mock_plugin;

pub use fixtures::{cms_instance, multi_env_config, single_url_config};
pub use mock_plugin::{
    CountingPlugin, FailingPlugin, HasMeta, MarkerPlugin, PluginLog, RecordingPlugin,
};
