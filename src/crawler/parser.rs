//! HTML parser for extracting the title and same-host links
//!
//! Links are resolved against the document's `<base href>` (or the page URL when
//! there is none), normalized, filtered to the crawl host and de-duplicated in
//! document order.

use crate::url::{is_same_host, normalize};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (empty when the document has none)
    pub title: String,

    /// Canonical same-host links, unique within this page, in document order
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts the title and crawlable links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` whose resolved, normalized URL is on `host`
///
/// **Exclude:**
/// - Empty and fragment-only hrefs (`#section`)
/// - hrefs that do not resolve or normalize (`mailto:`, `javascript:`, broken URLs)
/// - Links on any other host
/// - Repeats of a link already extracted from this page
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the document was retrieved from
/// * `host` - The crawl host; links elsewhere are dropped
///
/// # Example
///
/// ```
/// use hostwalk::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &page_url, "example.com");
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, page_url: &Url, host: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let base = resolve_base(&document, page_url);
    let links = extract_links(&document, &base, host);

    ParsedPage { title, links }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let title_selector = match Selector::parse("title") {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Picks the URL relative links resolve against
///
/// A `<base href>` wins when present and resolvable; it may itself be relative
/// to the page URL.
fn resolve_base(document: &Html, page_url: &Url) -> Url {
    let base_selector = match Selector::parse("base[href]") {
        Ok(selector) => selector,
        Err(_) => return page_url.clone(),
    };

    document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .and_then(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// Extracts same-host links from the HTML document
fn extract_links(document: &Html, base: &Url, host: &str) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let a_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    for element in document.select(&a_selector) {
        let href = match element.value().attr("href") {
            Some(href) => href,
            None => continue,
        };

        let link = match resolve_link(href, base) {
            Some(link) => link,
            None => continue,
        };

        if !is_same_host(&link, host) {
            tracing::debug!("ignored: external link, {}", link);
            continue;
        }

        // collect only unique links on page
        if seen.insert(link.as_str().to_string()) {
            links.push(link);
        }
    }

    links
}

/// Resolves a link href against the base and canonicalizes it
///
/// Returns None if the link should be skipped.
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = match base.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::trace!("Unparsable href {:?}: {}", href, e);
            return None;
        }
    };

    match normalize(absolute) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!("Skipping href {:?}: {}", href, e);
            None
        }
    }
}
