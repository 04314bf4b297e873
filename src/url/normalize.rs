use crate::UrlError;
use url::Url;

/// Normalizes a URL string into its canonical form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` URLs with a host
/// 3. Lowercase scheme and host, drop the default port (done by the parser)
/// 4. Normalize path:
///    - Collapse duplicate slashes
///    - Remove dot segments (. and ..)
///    - Decode percent-encoded unreserved characters, uppercase the rest
///    - Remove trailing slash (except for root /)
/// 5. Remove fragment (everything after #)
/// 6. Normalize percent-encoding in the query, drop an empty query (trailing ?)
/// 7. Re-parse the result so callers never get an unusable value
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use hostwalk::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM:80//docs/./guide/#intro").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/docs/guide");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize(url)
}

/// Normalizes an already parsed URL
///
/// Same rules as [`normalize_url`]; used for links resolved against a base.
pub fn normalize(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    match url.query().map(normalize_escapes) {
        Some(query) if query.is_empty() => url.set_query(None),
        Some(query) => url.set_query(Some(&query)),
        None => {}
    }

    Url::parse(url.as_str()).map_err(|e| UrlError::Malformed(format!("{}: {}", url, e)))
}

/// Normalizes a URL path by collapsing slashes and removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<String> = Vec::new();

    for segment in path.split('/') {
        let segment = normalize_escapes(segment);
        match segment.as_str() {
            // Empty segments come from duplicate or trailing slashes
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

/// Decodes escapes of unreserved characters and uppercases the remaining escapes
///
/// `%7e` becomes `~`, `%2f` becomes `%2F`. Malformed escapes are left untouched.
fn normalize_escapes(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && bytes.get(i + 1..i + 3).map_or(false, is_escape) {
            let decoded = hex_value(bytes[i + 1]) * 16 + hex_value(bytes[i + 2]);
            if is_unreserved(decoded) {
                out.push(decoded);
            } else {
                out.push(b'%');
                out.push(bytes[i + 1].to_ascii_uppercase());
                out.push(bytes[i + 2].to_ascii_uppercase());
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    // Only ASCII triples were replaced, so the input's UTF-8 validity is preserved
    String::from_utf8_lossy(&out).into_owned()
}

fn is_escape(pair: &[u8]) -> bool {
    pair.len() == 2 && pair.iter().all(u8::is_ascii_hexdigit)
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// RFC 3986 unreserved characters
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}
