// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams of the toolkit.
//!
//! Both traits use `#[async_trait]` so they can be stored and invoked as
//! trait objects.

pub mod plugin;

pub use plugin::{Plugin, PluginChain, PluginList};
