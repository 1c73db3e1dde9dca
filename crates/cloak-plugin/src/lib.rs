// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin pipeline for the Cloak toolkit.
//!
//! A plugin chain is a strict left-to-right fold: every plugin receives the
//! output of the previous one, each step is awaited before the next starts,
//! and the first error stops the chain.

pub mod adapter;
pub mod pipeline;

pub use adapter::{from_async_fn, from_fn, AsyncFnPlugin, FnPlugin};
pub use pipeline::{with_plugins, Sequential};
