// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential plugin application.

use std::sync::Arc;

use async_trait::async_trait;
use cloak_core::{CloakError, Plugin, PluginChain};
use tracing::{debug, warn};

/// Apply `plugins` to `initial` in order, awaiting each step.
///
/// An empty list returns `initial` untouched. A failing plugin aborts the
/// chain: later plugins never run and its error is returned as-is.
pub async fn with_plugins<C>(initial: C, plugins: &[Arc<dyn Plugin<C>>]) -> Result<C, CloakError>
where
    C: Send + 'static,
{
    let total = plugins.len();
    let mut current = initial;

    for (index, plugin) in plugins.iter().enumerate() {
        debug!(
            plugin = plugin.name(),
            position = index + 1,
            total,
            "applying plugin"
        );
        current = match plugin.apply(current).await {
            Ok(next) => next,
            Err(e) => {
                warn!(plugin = plugin.name(), error = %e, "plugin failed, aborting chain");
                return Err(e);
            }
        };
    }

    if total > 0 {
        debug!(total, "plugin chain complete");
    }
    Ok(current)
}

/// The default [`PluginChain`]: runs plugins one after another via
/// [`with_plugins`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

#[async_trait]
impl<C> PluginChain<C> for Sequential
where
    C: Send + 'static,
{
    async fn apply(&self, initial: C, plugins: &[Arc<dyn Plugin<C>>]) -> Result<C, CloakError> {
        with_plugins(initial, plugins).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_test::traced_test;

    /// Appends its tag to the value after an optional delay.
    struct Append {
        tag: &'static str,
        delay_ms: u64,
    }

    #[async_trait]
    impl Plugin<String> for Append {
        fn name(&self) -> &str {
            self.tag
        }

        async fn apply(&self, config: String) -> Result<String, CloakError> {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            Ok(format!("{config}{}", self.tag))
        }
    }

    struct Fail;

    #[async_trait]
    impl Plugin<String> for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        async fn apply(&self, _config: String) -> Result<String, CloakError> {
            Err(CloakError::InvalidOperation("boom".into()))
        }
    }

    struct Count(Arc<AtomicUsize>);

    #[async_trait]
    impl Plugin<String> for Count {
        fn name(&self) -> &str {
            "count"
        }

        async fn apply(&self, config: String) -> Result<String, CloakError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(config)
        }
    }

    fn append(tag: &'static str, delay_ms: u64) -> Arc<dyn Plugin<String>> {
        Arc::new(Append { tag, delay_ms })
    }

    #[tokio::test]
    async fn empty_chain_is_identity() {
        let out = with_plugins("base".to_string(), &[]).await.unwrap();
        assert_eq!(out, "base");
    }

    #[tokio::test(start_paused = true)]
    async fn plugins_run_left_to_right_even_when_slow() {
        // The first plugin is the slowest; a parallel fold would reorder.
        let plugins = vec![append("a", 30), append("b", 10), append("c", 0)];
        let out = with_plugins(String::new(), &plugins).await.unwrap();
        assert_eq!(out, "abc");
    }

    #[tokio::test]
    async fn failure_aborts_remaining_plugins() {
        let counter = Arc::new(AtomicUsize::new(0));
        let plugins: Vec<Arc<dyn Plugin<String>>> = vec![
            Arc::new(Count(Arc::clone(&counter))),
            Arc::new(Fail),
            Arc::new(Count(Arc::clone(&counter))),
        ];

        let err = with_plugins(String::new(), &plugins).await.unwrap_err();
        assert!(matches!(err, CloakError::InvalidOperation(ref m) if m == "boom"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sequential_chain_delegates_to_with_plugins() {
        let chain: &dyn PluginChain<String> = &Sequential;
        let out = chain
            .apply("x".to_string(), &[append("y", 0), append("z", 0)])
            .await
            .unwrap();
        assert_eq!(out, "xyz");
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_is_logged() {
        let plugins: Vec<Arc<dyn Plugin<String>>> = vec![Arc::new(Fail)];
        let _ = with_plugins(String::new(), &plugins).await;
        assert!(logs_contain("plugin failed, aborting chain"));
        assert!(logs_contain("invalid operation: boom"));
    }
}
