use std::path::PathBuf;
use std::time::Duration;

/// Directory the crawl output is written to when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "news";

/// Front page re-check period, also the per-cycle time budget
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Root of the crawled site; relative links are resolved against it
pub const DEFAULT_SITE_ROOT: &str = "https://news.ycombinator.com";

/// The site serves a different page to clients without a browser user agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_4) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1 Safari/605.1.15";

/// Timeout of a single request, body included
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Concurrent connections allowed to one host across the whole process
pub const DEFAULT_MAX_HOST_CONNECTIONS: usize = 3;

/// Delay between two article launches within a cycle
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(1);

/// Main configuration structure for the crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// Root of the output tree (`main.*` and one directory per article)
    pub output_dir: PathBuf,

    /// Polling interval between cycles and upper bound of a cycle
    pub interval: Duration,

    /// Site root, e.g. `https://news.ycombinator.com`
    pub site_root: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Per-host concurrent connection ceiling
    pub max_host_connections: usize,

    /// Pacing delay between article launches
    pub pacing_delay: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            interval: DEFAULT_INTERVAL,
            site_root: DEFAULT_SITE_ROOT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_host_connections: DEFAULT_MAX_HOST_CONNECTIONS,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

impl CrawlerConfig {
    /// URL of the front page
    pub fn front_page_url(&self) -> &str {
        &self.site_root
    }

    /// URL of the detail (comments) page of an article
    pub fn item_url(&self, id: &str) -> String {
        format!("{}/item?id={}", self.site_root.trim_end_matches('/'), id)
    }
}
