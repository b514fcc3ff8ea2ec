//! Polling loop
//!
//! Runs a crawl cycle every interval. Each cycle gets the interval itself as
//! its time budget; a cycle that fails or runs over is logged and the loop
//! goes on. Only the shutdown token ends the loop.

use crate::crawler::coordinator::{Coordinator, CycleReport};
use crate::{CrawlError, Result};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Runs one cycle, abandoning it once `budget` has elapsed
pub async fn run_bounded(coordinator: &Coordinator, budget: Duration) -> Result<CycleReport> {
    match timeout(budget, coordinator.run_cycle()).await {
        Ok(result) => result,
        Err(_) => Err(CrawlError::CycleTimeout(budget)),
    }
}

/// Polls the front page until `shutdown` is cancelled
///
/// Cancellation is observed before a cycle starts and during the sleep
/// between cycles; a running cycle is left to finish or time out.
///
/// # Returns
///
/// The number of cycles started
pub async fn monitor(
    coordinator: &Coordinator,
    interval: Duration,
    shutdown: CancellationToken,
) -> u64 {
    let mut cycles = 0;

    loop {
        if shutdown.is_cancelled() {
            break;
        }

        cycles += 1;
        match run_bounded(coordinator, interval).await {
            Ok(report) => info!(
                cycle = cycles,
                discovered = report.discovered,
                skipped = report.skipped,
                succeeded = report.succeeded,
                failed = report.failed,
                "Crawl cycle finished"
            ),
            Err(e) => error!("Crawler failed: {}", e),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = sleep(interval) => {}
        }
    }

    info!("Monitor loop stopped after {} cycles", cycles);
    cycles
}
