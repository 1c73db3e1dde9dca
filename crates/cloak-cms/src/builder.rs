// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single CMS instance building.

use cloak_core::{CloakError, CmsInstance, PluginChain};
use cloak_plugin::Sequential;

/// Run the instance's plugins in order and return the result.
///
/// An instance without plugins is returned unchanged. Naming is left to
/// [`CmsConfigStore::build`](crate::CmsConfigStore::build).
pub async fn build_cms_instance(config: CmsInstance) -> Result<CmsInstance, CloakError> {
    build_cms_instance_with(config, &Sequential).await
}

/// Like [`build_cms_instance`] with a caller-supplied chain.
pub async fn build_cms_instance_with(
    config: CmsInstance,
    chain: &dyn PluginChain<CmsInstance>,
) -> Result<CmsInstance, CloakError> {
    match config.plugins.clone() {
        Some(plugins) => chain.apply(config, &plugins).await,
        None => Ok(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloak_test_utils::{cms_instance, FailingPlugin, MarkerPlugin};
    use serde_json::json;

    #[tokio::test]
    async fn instance_without_plugins_passes_through() {
        let built = build_cms_instance(cms_instance("https://cms.example.com"))
            .await
            .unwrap();
        assert_eq!(built.url, "https://cms.example.com");
        assert!(built.name.is_none());
        assert!(built.meta.is_none());
    }

    #[tokio::test]
    async fn plugins_are_applied_in_order() {
        let instance = cms_instance("https://cms.example.com")
            .with_plugin(MarkerPlugin::arc("step", 1))
            .with_plugin(MarkerPlugin::arc("step", 2));
        let built = build_cms_instance(instance).await.unwrap();
        assert_eq!(built.get_meta("step"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn plugin_error_propagates() {
        let instance = cms_instance("https://cms.example.com")
            .with_plugin(FailingPlugin::arc("auth", "no token"));
        let err = build_cms_instance(instance).await.unwrap_err();
        assert!(matches!(err, CloakError::Plugin { ref plugin, .. } if plugin == "auth"));
    }
}
