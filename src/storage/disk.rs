use crate::crawler::FetchResult;
use crate::storage::{is_article_file, Persister};
use crate::{CrawlError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Filesystem-backed [`Persister`]
///
/// Writes run on the blocking thread pool so they never stall the tasks
/// driving the downloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskPersister;

impl DiskPersister {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Persister for DiskPersister {
    async fn ensure_dir(&self, dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(())
    }

    async fn save(&self, dir: &Path, base_name: &str, result: &FetchResult) -> Option<PathBuf> {
        let path = dir.join(result.file_name(base_name));
        let bytes = result.content.as_bytes().to_vec();
        let target = path.clone();

        match tokio::task::spawn_blocking(move || std::fs::write(&target, bytes)).await {
            Ok(Ok(())) => {
                debug!("Saved {} ({} bytes)", path.display(), result.content.len());
                Some(path)
            }
            Ok(Err(source)) => {
                error!("{}", CrawlError::Persist { path, source });
                None
            }
            Err(e) => {
                error!("Write task for {} failed: {}", path.display(), e);
                None
            }
        }
    }

    async fn is_processed(&self, dir: &Path) -> bool {
        let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
            return false;
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            if is_article_file(&entry.file_name().to_string_lossy()) {
                return true;
            }
        }

        false
    }
}
