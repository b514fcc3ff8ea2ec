//! URL handling module for YCrawler
//!
//! Links found on the crawled pages are often site-relative. This module
//! decides whether a link is already absolute, resolves it against the site
//! root otherwise, and derives the key the per-host connection limiter
//! groups requests by.

mod host;
mod resolve;

pub use host::host_key;
pub use resolve::{is_absolute, resolve_url};
