use url::Url;

/// Extracts the lowercase host of a URL, without the port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hostwalk::url::host_of;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(host_of(&url), Some("example.com".to_string()));
/// ```
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` lives on `host`
///
/// The comparison ignores scheme and port, so `http://example.com:8080/a` is on
/// the same host as `https://example.com/`.
pub fn is_same_host(url: &Url, host: &str) -> bool {
    url.host_str()
        .map_or(false, |h| h.eq_ignore_ascii_case(host))
}
