//! Storage trait
//!
//! The pipeline only talks to the output tree through [`Persister`], so
//! tests can swap the disk for an in-memory recorder.

use crate::crawler::FetchResult;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for output backends
#[async_trait]
pub trait Persister: Send + Sync {
    /// Creates `dir` and its parents if they are missing
    async fn ensure_dir(&self, dir: &Path) -> Result<()>;

    /// Writes `result` to `<dir>/<base_name><extension>`
    ///
    /// A failed write is logged and yields `None`; it never fails the
    /// caller, which still holds the fetched data.
    async fn save(&self, dir: &Path, base_name: &str, result: &FetchResult) -> Option<PathBuf>;

    /// Returns true if the article directory `dir` holds an `article.*` file
    async fn is_processed(&self, dir: &Path) -> bool;
}
