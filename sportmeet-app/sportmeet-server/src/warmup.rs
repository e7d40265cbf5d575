use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

use sportmeet_core::services::SamplingCache;

/// Re-run the feed warm-up every `interval_secs`. `None` when disabled.
pub fn spawn_refresh(feed: Arc<SamplingCache>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("Periodic cache refresh disabled");
        return None;
    }

    let period = Duration::from_secs(interval_secs);
    Some(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Failures are logged by the feed; previous batches stay served.
            feed.warm_up().await.ok();
        }
    }))
}
