//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with jitter and retry logic
//! - HTML parsing with link and image extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_crawl, Coordinator, CrawlTask};
pub use fetcher::{build_http_client, random_delay, FetchError, Fetcher};
pub use parser::{extract_images, extract_links, parse_html, ParsedPage};

use crate::config::Config;
use crate::output::CrawlStats;
use crate::SpiderError;
use url::Url;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Visit the start page and every page reachable within the depth limit
/// 3. Download each unique image found on those pages
/// 4. Return the run statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration; `crawler.output-dir` must exist
/// * `start_url` - The page to start from
pub async fn crawl(config: &Config, start_url: &Url) -> Result<CrawlStats, SpiderError> {
    run_crawl(config, start_url).await
}
