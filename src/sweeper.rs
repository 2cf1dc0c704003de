use std::sync::Arc;

use tokio::time::interval;
use tracing::info;

use crate::registry::SessionRegistry;

/// Periodically evicts expired sessions so the registry does not grow without
/// bound. Optional; embedders that never run it keep the
/// reference behavior of retaining every session for the process lifetime.
pub async fn run_eviction_task(
    registry: Arc<SessionRegistry>,
    every: std::time::Duration,
    grace: time::Duration,
) {
    let mut ticker = interval(every);
    info!("session eviction task started");

    loop {
        ticker.tick().await;
        registry.evict_expired(grace);
    }
}
