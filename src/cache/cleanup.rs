use crate::cache::ttl_cache::TtlCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest sweep period; `tokio::time::interval` panics on zero.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Periodic sweeper calling [`TtlCache::cleanup`] on a tokio ticker.
///
/// Must be spawned from inside a tokio runtime. The task stops on
/// [`CleanupTask::shutdown`] or when the handle is dropped.
pub struct CleanupTask {
    handle: JoinHandle<()>,
    interval: Duration,
}

impl CleanupTask {
    pub fn spawn<V>(cache: Arc<TtlCache<V>>, interval: Duration) -> Self
    where
        V: Clone + Send + 'static,
    {
        let interval = if interval < MIN_SWEEP_INTERVAL {
            tracing::warn!(
                "⚠️ Cleanup interval {:?} is too short, using {:?}",
                interval,
                MIN_SWEEP_INTERVAL
            );
            MIN_SWEEP_INTERVAL
        } else {
            interval
        };

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 會立即觸發，跳過
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let evicted = cache.cleanup();
                if evicted > 0 {
                    tracing::debug!("🧹 Cache sweep evicted {} expired entries", evicted);
                } else {
                    tracing::trace!("Cache sweep found nothing to evict");
                }
            }
        });

        tracing::info!("🧹 Background cache cleanup every {:?}", interval);
        Self { handle, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn shutdown(self) {
        self.handle.abort();
        tracing::debug!("Background cache cleanup stopped");
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
