//! HTML parser for the front page and the comment pages
//!
//! Both functions are pure and best-effort: odd markup yields fewer results,
//! never an error.

use scraper::{Html, Selector};
use tracing::debug;

/// Story rows on the front page
const STORY_ROW: &str = "tr.athing";

/// Story link inside a row; older layouts tag the link itself, newer ones
/// wrap it in a `titleline` span
const STORY_LINK: &str = "a.storylink, span.titleline > a";

/// Links posted inside comment bodies
const COMMENT_LINK: &str = r#"div.comment a[rel~="nofollow"][href]"#;

/// One story discovered on the front page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Site identifier, also the name of the article directory
    pub id: String,

    /// Link text
    pub title: String,

    /// Link target, absolute or site-relative
    pub url: String,
}

/// Extracts the articles listed on the front page, in document order
///
/// Rows without a story link, without an `href` or without a usable
/// identifier are skipped.
///
/// # Example
///
/// ```
/// use ycrawler::crawler::parse_front_page;
///
/// let html = r#"<table>
///     <tr class="athing" id="1"><td><a class="storylink" href="http://x">A</a></td></tr>
/// </table>"#;
/// let articles = parse_front_page(html);
/// assert_eq!(articles.len(), 1);
/// assert_eq!(articles[0].id, "1");
/// assert_eq!(articles[0].title, "A");
/// assert_eq!(articles[0].url, "http://x");
/// ```
pub fn parse_front_page(html: &str) -> Vec<Article> {
    let (Ok(row_selector), Ok(link_selector)) =
        (Selector::parse(STORY_ROW), Selector::parse(STORY_LINK))
    else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut articles = Vec::new();

    for row in document.select(&row_selector) {
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };

        let Some(id) = row.value().id().filter(|id| is_valid_id(id)) else {
            debug!("Skipping story row without a usable id");
            continue;
        };

        let Some(href) = link.value().attr("href") else {
            debug!("Skipping story {} without a link target", id);
            continue;
        };

        articles.push(Article {
            id: id.to_string(),
            title: link.text().collect::<String>().trim().to_string(),
            url: href.trim().to_string(),
        });
    }

    articles
}

/// Extracts the links posted in comments, in document order
///
/// Every matching anchor counts, so `comment_<n>` is the n-th link in the
/// page. Duplicates are kept and an empty href stays empty, which resolves
/// to the site root when fetched.
pub fn parse_comment_links(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(COMMENT_LINK) else {
        return Vec::new();
    };

    Html::parse_document(html)
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}

/// The id names a directory under the output root
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.chars().any(char::is_control)
}
