// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by content source and CMS configurations.

use std::any::Any;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Deployment environment a content source URL belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Local,
    Staging,
    #[default]
    Production,
}

impl Environment {
    /// All environments, in promotion order.
    pub const ALL: [Environment; 3] = [
        Environment::Local,
        Environment::Staging,
        Environment::Production,
    ];
}

/// One base URL per environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentUrls {
    pub local: String,
    pub staging: String,
    pub production: String,
}

impl EnvironmentUrls {
    /// Returns the URL configured for `environment`.
    pub fn get(&self, environment: Environment) -> &str {
        match environment {
            Environment::Local => &self.local,
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }
}

/// The `url` field of a content source: either a single URL used for every
/// environment, or a URL per environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceUrl {
    Single(String),
    PerEnvironment(EnvironmentUrls),
}

impl From<&str> for SourceUrl {
    fn from(url: &str) -> Self {
        SourceUrl::Single(url.to_string())
    }
}

impl From<String> for SourceUrl {
    fn from(url: String) -> Self {
        SourceUrl::Single(url)
    }
}

impl From<EnvironmentUrls> for SourceUrl {
    fn from(urls: EnvironmentUrls) -> Self {
        SourceUrl::PerEnvironment(urls)
    }
}

/// Free-form metadata attached to a config. Plugins commonly stash values here.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Factory for whatever client object talks to a content source. Invoked on
/// every `client()` call; the returned value is never inspected.
pub type ClientFactory = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// Opaque block renderer carried alongside a config.
pub type BlockRenderer = Arc<dyn Any + Send + Sync>;
