// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CMS config building and access.
//!
//! [`build_cms_instance`] runs one instance's plugins. [`CmsConfigStore`]
//! builds whole configs, keeps the built result, and can hold an unbuilt
//! ("idle") config that is built on first access.

pub mod builder;
pub mod store;

pub use builder::{build_cms_instance, build_cms_instance_with};
pub use store::{
    build_cms_config, get_cms_config, get_cms_instance, set_cms_config, CmsConfigStore,
};
