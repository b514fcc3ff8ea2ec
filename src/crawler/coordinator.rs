//! Crawler coordinator - one crawl cycle
//!
//! A cycle downloads the front page, keeps the articles that have no
//! `article.*` file yet, launches one pipeline task per article with a
//! pacing delay between launches, and waits for all of them. Article
//! failures are logged and counted, they never fail the cycle.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchMode, Fetcher, HttpFetcher};
use crate::crawler::pacer::Pacer;
use crate::crawler::parser::{parse_front_page, Article};
use crate::crawler::pipeline::ArticlePipeline;
use crate::storage::{DiskPersister, Persister, MAIN_FILE};
use crate::{CrawlError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Outcome of one crawl cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Articles listed on the front page
    pub discovered: usize,

    /// Articles already on disk (or listed twice)
    pub skipped: usize,

    /// Pipelines that completed
    pub succeeded: usize,

    /// Pipelines that failed
    pub failed: usize,
}

impl CycleReport {
    /// Articles launched this cycle
    pub fn launched(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<CrawlerConfig>,
    persister: Arc<dyn Persister>,
    pipeline: ArticlePipeline,
    pacer: Pacer,
}

impl Coordinator {
    /// Creates a coordinator that crawls over HTTP and writes to disk
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_parts(
            config,
            Arc::new(fetcher),
            Arc::new(DiskPersister::new()),
        ))
    }

    /// Creates a coordinator from explicit collaborators
    pub fn with_parts(
        config: CrawlerConfig,
        fetcher: Arc<dyn Fetcher>,
        persister: Arc<dyn Persister>,
    ) -> Self {
        let config = Arc::new(config);
        let pacer = Pacer::new(config.pacing_delay);
        let pipeline = ArticlePipeline::new(fetcher, persister.clone(), config.clone());

        Self {
            config,
            persister,
            pipeline,
            pacer,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// Runs one crawl cycle
    ///
    /// Dropping the returned future aborts every article task it spawned.
    ///
    /// # Returns
    ///
    /// * `Ok(CycleReport)` - The front page was processed
    /// * `Err(CrawlError::FrontPage)` - The front page could not be fetched
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let root = &self.config.output_dir;
        self.persister.ensure_dir(root).await?;

        let main = self
            .pipeline
            .download_page(self.config.front_page_url(), root, MAIN_FILE, FetchMode::Text)
            .await
            .map_err(|e| CrawlError::FrontPage(Box::new(e)))?;

        let articles = parse_front_page(&main.content.text());
        let discovered = articles.len();
        let pending = self.pending_articles(articles).await;
        info!("Handle main page: {} new articles", pending.len());

        let mut report = CycleReport {
            discovered,
            skipped: discovered - pending.len(),
            ..CycleReport::default()
        };

        let mut tasks = JoinSet::new();
        for (idx, article) in pending.into_iter().enumerate() {
            if idx > 0 {
                self.pacer.pause().await;
            }

            let pipeline = self.pipeline.clone();
            let root = root.clone();
            tasks.spawn(async move {
                let result = pipeline.process(&article, &root).await;
                (article, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((article, Ok(comments))) => {
                    debug!(
                        "Article {} saved with {} comment links",
                        article.id, comments
                    );
                    report.succeeded += 1;
                }
                Ok((article, Err(e))) => {
                    error!(article = %article.id, error = %e, "Article processing failed");
                    report.failed += 1;
                }
                Err(e) => {
                    error!("Article task failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Filters out articles whose directory already holds an `article.*` file
    ///
    /// The check reads the filesystem every time; nothing is cached between
    /// cycles. An id listed twice is only kept once.
    pub async fn pending_articles(&self, articles: Vec<Article>) -> Vec<Article> {
        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(articles.len());

        for article in articles {
            if !seen.insert(article.id.clone()) {
                continue;
            }

            let dir = self.config.output_dir.join(&article.id);
            if self.persister.is_processed(&dir).await {
                debug!("Article {} already processed", article.id);
            } else {
                pending.push(article);
            }
        }

        pending
    }
}
