//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with at-most-once claims per URL
//! - HTML parsing and same-host link extraction
//! - Recursive, depth-bounded, concurrent traversal
//! - Session ownership of the shared state and the page stream

mod engine;
mod fetcher;
mod limiter;
mod parser;
mod session;

pub use engine::CrawlEngine;
pub use fetcher::{build_http_client, Fetcher, Page, PageFetcher};
pub use limiter::FetchLimiter;
pub use parser::{parse_html, ParsedPage};
pub use session::{collect_pages, start_crawl, CrawlSession};
