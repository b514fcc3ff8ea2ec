use url::Url;

/// Extracts the connection-limiting key of a URL
///
/// The key is the lowercase host followed by the effective port, so two
/// servers on the same machine but different ports are limited separately.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ycrawler::url::host_key;
///
/// let url = Url::parse("https://News.Ycombinator.com/item?id=1").unwrap();
/// assert_eq!(host_key(&url), Some("news.ycombinator.com:443".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port_or_known_default() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
