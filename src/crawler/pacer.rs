//! Launch pacing
//!
//! The site answers bursts of requests with a "not able to serve your
//! requests this quickly" page instead of content, so article launches
//! within a cycle are spaced out by a fixed delay.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    delays: AtomicUsize,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            delays: AtomicUsize::new(0),
        }
    }

    /// Sleeps for the pacing delay on the tokio clock
    pub async fn pause(&self) {
        self.delays.fetch_add(1, Ordering::Relaxed);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Number of pauses issued so far
    pub fn delays(&self) -> usize {
        self.delays.load(Ordering::Relaxed)
    }
}
