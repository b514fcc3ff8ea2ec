//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the browser-like user agent
//! - Resolving site-relative links against the site root
//! - Holding a per-host connection permit for the duration of a request
//! - Inferring a file extension from the declared Content-Type
//! - Error classification

use crate::config::CrawlerConfig;
use crate::crawler::limiter::HostLimiter;
use crate::url::{host_key, resolve_url};
use crate::{CrawlError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::borrow::Cow;
use tracing::{debug, error, warn};
use url::Url;

/// Body the site serves instead of content when it throttles a client
pub const RATE_LIMIT_MESSAGE: &str = "Sorry, we're not able to serve your requests this quickly";

/// How the response body is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Raw bytes, stored untouched
    Binary,
    /// Decoded text, needed when the page is parsed afterwards
    Text,
}

/// Downloaded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Binary(Vec<u8>),
    Text(String),
}

impl Payload {
    /// Bytes as written to disk
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Binary(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Text view of the body, lossy for binary payloads
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Binary(bytes) => String::from_utf8_lossy(bytes),
            Self::Text(text) => Cow::Borrowed(text),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Result of a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Page body
    pub content: Payload,

    /// Extension with its leading dot (`.html`), empty when unknown
    pub extension: String,
}

impl FetchResult {
    pub fn text(content: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            content: Payload::Text(content.into()),
            extension: extension.into(),
        }
    }

    pub fn binary(content: impl Into<Vec<u8>>, extension: impl Into<String>) -> Self {
        Self {
            content: Payload::Binary(content.into()),
            extension: extension.into(),
        }
    }

    /// File name for this result under the given base name
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}{}", base_name, self.extension)
    }
}

/// Capability to download one URL
///
/// Implementations must log failures with the URL and the cause and then
/// return them; a fetcher never swallows an error.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchResult>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout)
        .connect_timeout(config.request_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a Content-Type header value to a file extension
///
/// # Examples
///
/// ```
/// use ycrawler::crawler::extension_for;
///
/// assert_eq!(extension_for("text/html; charset=utf-8"), ".html");
/// assert_eq!(extension_for("application/pdf"), ".pdf");
/// assert_eq!(extension_for("application/x-no-such-type"), "");
/// ```
pub fn extension_for(content_type: &str) -> String {
    let Ok(mime) = content_type.trim().parse::<mime_guess::Mime>() else {
        return String::new();
    };
    let essence = mime.essence_str();

    // mime_guess does not order its candidates, pin the usual ones
    let preferred = match essence {
        "text/html" => Some("html"),
        "text/plain" => Some("txt"),
        "text/css" => Some("css"),
        "text/xml" | "application/xml" => Some("xml"),
        "application/json" => Some("json"),
        "application/javascript" | "text/javascript" => Some("js"),
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "application/octet-stream" => Some("bin"),
        "audio/mpeg" => Some("mp3"),
        "video/mp4" => Some("mp4"),
        _ => None,
    };

    preferred
        .or_else(|| canonical_extension(essence))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// First candidate extension that maps back to `essence`
fn canonical_extension(essence: &str) -> Option<&'static str> {
    let candidates = mime_guess::get_mime_extensions_str(essence)?;

    candidates
        .iter()
        .copied()
        .find(|ext| {
            mime_guess::from_ext(ext)
                .first()
                .is_some_and(|mime| mime.essence_str() == essence)
        })
        .or_else(|| candidates.first().copied())
}

/// Classifies a reqwest failure
fn classify_error(url: &str, error: reqwest::Error) -> CrawlError {
    if error.is_timeout() {
        CrawlError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        CrawlError::Connect {
            url: url.to_string(),
            source: error,
        }
    } else {
        CrawlError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// [`Fetcher`] backed by `reqwest`
///
/// Clones share the HTTP client and the host limiter, so the per-host
/// connection ceiling holds across every clone in the process.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    site_root: Url,
    limiter: HostLimiter,
}

impl HttpFetcher {
    /// Creates a fetcher for the configured site
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let site_root = Url::parse(&config.site_root).map_err(|source| CrawlError::InvalidUrl {
            url: config.site_root.clone(),
            source,
        })?;
        let client = build_http_client(config).map_err(|source| CrawlError::Http {
            url: config.site_root.clone(),
            source,
        })?;

        Ok(Self {
            client,
            site_root,
            limiter: HostLimiter::new(config.max_host_connections),
        })
    }

    async fn download(&self, url: &str, mode: FetchMode) -> Result<FetchResult> {
        let target = resolve_url(&self.site_root, url).map_err(|source| CrawlError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        // Waiting for a permit is not part of the request timeout
        let _permit = match host_key(&target) {
            Some(host) => self.limiter.acquire(&host).await,
            None => None,
        };

        debug!("Downloading url: {}", target);

        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| classify_error(target.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: target.to_string(),
                status: status.as_u16(),
            });
        }

        let extension = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(extension_for)
            .unwrap_or_default();

        let content = match mode {
            FetchMode::Binary => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| classify_error(target.as_str(), e))?;
                Payload::Binary(bytes.to_vec())
            }
            FetchMode::Text => {
                let text = response
                    .text()
                    .await
                    .map_err(|e| classify_error(target.as_str(), e))?;
                if text.contains(RATE_LIMIT_MESSAGE) {
                    return Err(CrawlError::RateLimited {
                        url: target.to_string(),
                    });
                }
                Payload::Text(text)
            }
        };

        Ok(FetchResult { content, extension })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchResult> {
        let result = self.download(url, mode).await;

        match &result {
            Err(e @ CrawlError::RateLimited { .. }) => {
                warn!("Downloading error: {} [{}]", url, e);
            }
            Err(e) => {
                error!("Downloading error: {} [{}]", url, e);
            }
            Ok(_) => {}
        }

        result
    }
}
