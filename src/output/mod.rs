//! Output module for presenting crawl results
//!
//! This module handles:
//! - Rendering streamed pages as an indented console listing
//! - Recording crawl statistics and the end-of-run summary

mod console;
pub mod stats;

pub use console::{render_page, ConsolePrinter};
pub use stats::{CrawlStats, CrawlSummary};
