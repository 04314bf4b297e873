//! HTTP page fetcher
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Claiming each URL in the visited set before any network I/O
//! - Fetching the document and handing it to the link extractor

use crate::config::Config;
use crate::crawler::parser::parse_html;
use crate::state::VisitedSet;
use crate::url::normalize;
use crate::CrawlError;
use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Canonical URL of the page
    pub url: Url,

    /// Page title, empty when the document has none
    pub title: String,

    /// Same-host canonical links in document order, unique within the page
    pub links: Vec<Url>,

    /// Distance from the seed page (the seed is 0)
    pub depth: usize,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Source of pages for the crawl engine
///
/// Implementations own the at-most-once claim: `fetch` must fail with
/// [`CrawlError::AlreadyVisited`] for a URL some earlier call already claimed.
pub trait Fetcher: Send + Sync + 'static {
    /// Claims and fetches `url`, returning its title and same-host links
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Page, CrawlError>>;

    /// Returns true if `url` was already claimed
    fn is_processed(&self, url: &Url) -> bool;
}

/// Fetches pages at most once per canonical URL
///
/// All fetchers of one crawl share the same [`VisitedSet`].
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    visited: Arc<VisitedSet>,
    host: String,
}

impl PageFetcher {
    /// Creates a fetcher restricted to links on `host`
    pub fn new(client: Client, visited: Arc<VisitedSet>, host: impl Into<String>) -> Self {
        Self {
            client,
            visited,
            host: host.into(),
        }
    }

    /// Returns true if the URL has already been claimed by some fetch
    ///
    /// URLs that cannot be normalized are never considered processed.
    pub fn is_processed(&self, url: &Url) -> bool {
        normalize(url.clone())
            .map(|key| self.visited.contains(key.as_str()))
            .unwrap_or(false)
    }

    /// Fetches a page and extracts its title and links
    ///
    /// # Request Flow
    ///
    /// 1. Normalize the URL into its canonical key
    /// 2. Claim the key; if someone already did, fail with `AlreadyVisited`
    /// 3. GET the page (status codes are not errors; the body is parsed anyway)
    /// 4. Claim the URL reached after redirects too, if it differs
    /// 5. Reject non-HTML responses with `ParseFailed`
    /// 6. Extract title and same-host links, resolved against the final response URL
    ///
    /// A claimed URL stays claimed even if the fetch fails, so it is never retried.
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The fetched page, with `depth` 0
    /// * `Err(CrawlError::AlreadyVisited)` - Another fetch owns this URL
    /// * `Err(CrawlError::MalformedUrl)` - The URL could not be normalized
    /// * `Err(CrawlError::FetchFailed)` - Transport error
    /// * `Err(CrawlError::ParseFailed)` - The response is not an HTML document
    pub async fn fetch(&self, url: &Url) -> Result<Page, CrawlError> {
        let key = normalize(url.clone())?;

        if !self.visited.try_claim(key.as_str()) {
            return Err(CrawlError::AlreadyVisited {
                url: key.to_string(),
            });
        }

        let start = Instant::now();
        tracing::debug!("Fetching {}", key);

        let response = self
            .client
            .get(key.clone())
            .send()
            .await
            .map_err(|source| CrawlError::FetchFailed {
                url: key.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned HTTP {}", key, status.as_u16());
        }

        let final_url = response.url().clone();

        // The redirect target is the document actually downloaded
        if let Ok(final_key) = normalize(final_url.clone()) {
            if final_key != key && !self.visited.try_claim(final_key.as_str()) {
                tracing::debug!("{} redirected to already visited {}", key, final_key);
                return Err(CrawlError::AlreadyVisited {
                    url: final_key.to_string(),
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = &content_type {
            if !is_html(content_type) {
                return Err(CrawlError::ParseFailed {
                    url: key.to_string(),
                    message: format!("Expected HTML, got {}", content_type),
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|source| CrawlError::FetchFailed {
                url: key.to_string(),
                source,
            })?;

        tracing::debug!("Completed {} in {:?}", key, start.elapsed());

        let parsed = parse_html(&body, &final_url, &self.host);

        Ok(Page {
            url: key,
            title: parsed.title,
            links: parsed.links,
            depth: 0,
        })
    }
}

impl Fetcher for PageFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Page, CrawlError>> {
        Box::pin(PageFetcher::fetch(self, url))
    }

    fn is_processed(&self, url: &Url) -> bool {
        PageFetcher::is_processed(self, url)
    }
}

/// Checks a Content-Type value for an HTML media type
fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}
