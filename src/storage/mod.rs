//! Storage module for persisting crawl output
//!
//! The output tree is the crawler's only state:
//!
//! ```text
//! <output>/main.<ext>
//! <output>/<article id>/article.<ext>
//! <output>/<article id>/detail.<ext>
//! <output>/<article id>/comment_<n>.<ext>
//! ```
//!
//! An article counts as processed as soon as its `article.*` file exists.

mod disk;
mod traits;

pub use disk::DiskPersister;
pub use traits::Persister;

/// Base name of the article body file
pub const ARTICLE_FILE: &str = "article";

/// Base name of the article's comment page
pub const DETAIL_FILE: &str = "detail";

/// Base name of the front page file
pub const MAIN_FILE: &str = "main";

/// Base name of the file holding the `index`-th (1-based) comment link
pub fn comment_file(index: usize) -> String {
    format!("comment_{}", index)
}

/// Returns true if `file_name` is an article body file
///
/// An article saved without a known extension is named plain `article`.
pub fn is_article_file(file_name: &str) -> bool {
    file_name == ARTICLE_FILE
        || file_name
            .strip_prefix(ARTICLE_FILE)
            .is_some_and(|rest| rest.starts_with('.'))
}
