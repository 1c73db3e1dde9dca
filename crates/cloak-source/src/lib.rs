// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content sources and the named source registry.
//!
//! A [`ContentSource`] wraps one endpoint's configuration and resolves
//! environment-specific URLs from it. The [`ContentSourceRegistry`] stores
//! built sources by name and tracks which one is the default.

pub mod registry;
pub mod source;

pub use registry::ContentSourceRegistry;
pub use source::ContentSource;
