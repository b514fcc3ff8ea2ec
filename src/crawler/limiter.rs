//! Per-host connection limiting
//!
//! One semaphore per host, created on first use and shared by every fetch
//! in the process. Requests beyond the ceiling wait for a permit instead of
//! failing. A host with no permit out and nobody waiting is forgotten, so
//! the map only holds hosts that are currently being fetched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct HostLimiter {
    per_host: usize,
    hosts: Arc<Mutex<HashMap<String, Arc<Semaphore>>>>,
}

impl HostLimiter {
    /// Creates a limiter allowing `per_host` concurrent connections per host
    pub fn new(per_host: usize) -> Self {
        Self {
            per_host: per_host.max(1),
            hosts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Waits for a connection slot on `host`
    ///
    /// The slot is released when the returned permit is dropped. `None` is
    /// only returned if the semaphore was closed, which this limiter never
    /// does.
    pub async fn acquire(&self, host: &str) -> Option<OwnedSemaphorePermit> {
        self.semaphore(host).acquire_owned().await.ok()
    }

    fn semaphore(&self, host: &str) -> Arc<Semaphore> {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);

        // Permits and pending acquires each hold a clone of the semaphore
        hosts.retain(|_, semaphore| Arc::strong_count(semaphore) > 1);

        hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host)))
            .clone()
    }
}
