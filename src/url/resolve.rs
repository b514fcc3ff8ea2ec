use url::{ParseError, Url};

/// Returns true if `link` starts with a `scheme://` prefix
///
/// # Examples
///
/// ```
/// use ycrawler::url::is_absolute;
///
/// assert!(is_absolute("https://example.com/page"));
/// assert!(is_absolute("HTTP://example.com"));
/// assert!(!is_absolute("/relative"));
/// assert!(!is_absolute("item?id=1"));
/// ```
pub fn is_absolute(link: &str) -> bool {
    let Some((scheme, _)) = link.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}

/// Resolves a link found on the site into an absolute URL
///
/// Absolute links are parsed as they are; anything else is taken relative
/// to `root`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ycrawler::url::resolve_url;
///
/// let root = Url::parse("https://news.ycombinator.com").unwrap();
/// let url = resolve_url(&root, "item?id=42").unwrap();
/// assert_eq!(url.as_str(), "https://news.ycombinator.com/item?id=42");
/// ```
pub fn resolve_url(root: &Url, link: &str) -> Result<Url, ParseError> {
    let link = link.trim();
    if is_absolute(link) {
        Url::parse(link)
    } else {
        root.join(link)
    }
}
