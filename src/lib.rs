//! Hostwalk: a same-host, depth-bounded concurrent web crawler
//!
//! Starting from a seed URL, the crawler fetches a page, extracts its title and
//! same-host links, and recursively crawls newly discovered links up to a depth
//! limit. Every visited page is streamed to the consumer as soon as it completes.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("URL already visited: {url}")]
    AlreadyVisited { url: String },

    #[error("Failed to fetch {url}: {source}")]
    FetchFailed { url: String, source: reqwest::Error },

    #[error("Failed to parse {url}: {message}")]
    ParseFailed { url: String, message: String },

    #[error("Malformed URL: {0}")]
    MalformedUrl(#[from] UrlError),

    #[error("Page stream closed by consumer")]
    StreamClosed,

    #[error("Crawl task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl CrawlError {
    /// Returns true for failures scoped to a single page (network or document errors)
    pub fn is_branch_local(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::ParseFailed { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL after normalization: {0}")]
    Malformed(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, ErrorPolicy};
pub use crawler::{collect_pages, start_crawl, CrawlSession, Page};
pub use output::CrawlSummary;
pub use state::VisitedSet;
pub use crate::url::{host_of, normalize_url};
