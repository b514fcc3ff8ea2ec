//! Per-article download pipeline
//!
//! One article is one join group: the article body and the comment branch
//! run concurrently, and inside the comment branch every comment link is
//! fetched concurrently. The first failure in the group drops the pending
//! futures of that group and is returned; other articles are untouched.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchMode, FetchResult, Fetcher};
use crate::crawler::parser::{parse_comment_links, Article};
use crate::storage::{comment_file, Persister, ARTICLE_FILE, DETAIL_FILE};
use crate::Result;
use futures::future::try_join_all;
use futures::try_join;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Downloads articles and their comment links into the output tree
///
/// Cloning is cheap; each spawned article task owns a clone.
#[derive(Clone)]
pub struct ArticlePipeline {
    fetcher: Arc<dyn Fetcher>,
    persister: Arc<dyn Persister>,
    config: Arc<CrawlerConfig>,
}

impl ArticlePipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        persister: Arc<dyn Persister>,
        config: Arc<CrawlerConfig>,
    ) -> Self {
        Self {
            fetcher,
            persister,
            config,
        }
    }

    /// Populates `<output_root>/<article.id>/`
    ///
    /// # Returns
    ///
    /// * `Ok(n)` - Article, detail page and `n` comment links saved
    /// * `Err(CrawlError)` - The first fetch failure of this article
    pub async fn process(&self, article: &Article, output_root: &Path) -> Result<usize> {
        debug!("Handle article: {} (ID {})", article.title, article.id);

        let dir = output_root.join(&article.id);
        self.persister.ensure_dir(&dir).await?;

        let (_, comments) = try_join!(
            self.download_page(&article.url, &dir, ARTICLE_FILE, FetchMode::Binary),
            self.handle_comments(&article.id, &dir),
        )?;

        Ok(comments)
    }

    /// Downloads the detail page, then every comment link it contains
    ///
    /// File numbers follow the order of the links in the page, fixed before
    /// any download starts.
    async fn handle_comments(&self, article_id: &str, dir: &Path) -> Result<usize> {
        let detail_url = self.config.item_url(article_id);
        let detail = self
            .download_page(&detail_url, dir, DETAIL_FILE, FetchMode::Text)
            .await?;

        let links = parse_comment_links(&detail.content.text());
        debug!("Handle comments for {}: {} links", article_id, links.len());

        let downloads = links.iter().enumerate().map(|(idx, link)| {
            let name = comment_file(idx + 1);
            async move {
                self.download_page(link, dir, &name, FetchMode::Binary)
                    .await
            }
        });
        try_join_all(downloads).await?;

        Ok(links.len())
    }

    /// Fetches `url` and saves it as `<dir>/<base_name><ext>`
    ///
    /// A failed save is logged by the persister; the fetched result is
    /// returned either way.
    pub async fn download_page(
        &self,
        url: &str,
        dir: &Path,
        base_name: &str,
        mode: FetchMode,
    ) -> Result<FetchResult> {
        let result = self.fetcher.fetch(url, mode).await?;
        self.persister.save(dir, base_name, &result).await;
        Ok(result)
    }
}
