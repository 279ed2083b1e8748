//! Crawler coordinator - the crawl engine
//!
//! This module drives a crawl run:
//! - Tracking visited pages and remaining depth per task
//! - Fetching each page through the retrying fetcher
//! - Downloading the images a page references
//! - Following discovered links until depth is exhausted

use crate::config::Config;
use crate::crawler::parser::parse_html;
use crate::crawler::Fetcher;
use crate::output::CrawlStats;
use crate::state::VisitedSet;
use crate::storage::{DownloadOutcome, ImageStore};
use crate::SpiderError;
use std::path::PathBuf;
use url::Url;

/// A pending page visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The page to visit
    pub url: Url,

    /// Levels left including this page; 0 means nothing is done
    pub remaining_depth: u32,
}

/// Main crawler coordinator structure
///
/// Owns the visited set, the image store (and with it the downloaded set)
/// and the statistics for one run. Traversal is depth-first and strictly
/// sequential: a page and all of its images are finished before the first
/// discovered link is followed, and links are followed in document order.
pub struct Coordinator {
    fetcher: Fetcher,
    store: ImageStore,
    visited: VisitedSet,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a coordinator writing images into `output_dir`
    ///
    /// The HTTP client is built once from the configuration and shared by
    /// page fetches and image downloads.
    pub fn new(config: &Config, output_dir: impl Into<PathBuf>) -> Result<Self, SpiderError> {
        let fetcher = Fetcher::from_config(config)?;
        let store = ImageStore::new(fetcher.client().clone(), output_dir);
        Ok(Self::with_parts(fetcher, store))
    }

    /// Creates a coordinator from an existing fetcher and image store
    pub fn with_parts(fetcher: Fetcher, store: ImageStore) -> Self {
        Self {
            fetcher,
            store,
            visited: VisitedSet::new(),
            stats: CrawlStats::start(),
        }
    }

    /// Pages visited so far
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// The image store and its downloaded set
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Statistics of the run so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Crawls from `start_url` down to `max_depth` levels
    ///
    /// Depth 1 visits only the start page; depth N follows links N-1 hops
    /// away from it. Page and image failures are logged and counted but
    /// never abort the run.
    pub async fn run(&mut self, start_url: &Url, max_depth: u32) -> &CrawlStats {
        tracing::info!("Starting crawl of {} with depth {}", start_url, max_depth);

        let mut pending = vec![CrawlTask {
            url: start_url.clone(),
            remaining_depth: max_depth,
        }];

        while let Some(task) = pending.pop() {
            if task.remaining_depth == 0 || self.visited.contains(&task.url) {
                continue;
            }

            // Mark before fetching so a failed page is not retried via another link
            self.visited.mark(&task.url);

            let links = self.process_page(&task).await;

            // Reversed so the first link on the page is popped first
            for url in links.into_iter().rev() {
                pending.push(CrawlTask {
                    url,
                    remaining_depth: task.remaining_depth - 1,
                });
            }
        }

        self.stats.finish();
        tracing::info!(
            "Crawl completed: {} pages visited, {} images saved in {}s",
            self.stats.pages_visited,
            self.stats.images_saved,
            self.stats.duration().num_seconds()
        );

        &self.stats
    }

    /// Fetches one page, downloads its images and returns its links
    ///
    /// Returns no links when the page could not be fetched.
    async fn process_page(&mut self, task: &CrawlTask) -> Vec<Url> {
        tracing::info!(
            "Visiting {} (depth {} remaining)",
            task.url,
            task.remaining_depth
        );
        self.stats.pages_visited += 1;

        let body = match self.fetcher.fetch_text(&task.url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(attempts = e.attempts(), "Giving up on {}: {}", e.url(), e);
                self.stats.pages_failed += 1;
                return Vec::new();
            }
        };

        let parsed = parse_html(&body, &task.url);
        tracing::trace!(
            "{}: {} images, {} links",
            task.url,
            parsed.images.len(),
            parsed.links.len()
        );
        self.stats.images_found += parsed.images.len() as u64;

        for image_url in &parsed.images {
            self.download_image(image_url).await;
        }

        parsed.links
    }

    async fn download_image(&mut self, image_url: &Url) {
        let outcome = self.store.download(image_url).await;

        match &outcome {
            DownloadOutcome::Saved(path) => {
                tracing::info!("Downloaded {} -> {}", image_url, path.display());
            }
            DownloadOutcome::AlreadyDownloaded => {
                tracing::debug!("Already downloaded {}", image_url);
            }
            DownloadOutcome::Rejected(reason) => {
                tracing::debug!("Skipping {}: {}", image_url, reason);
            }
            DownloadOutcome::Failed(reason) => {
                tracing::warn!("Failed to download {}: {}", image_url, reason);
            }
        }

        self.stats.record_download(&outcome);
    }
}

/// Runs a complete crawl using the depth and output directory from `config`
///
/// The output directory must already exist.
///
/// # Example
///
/// ```no_run
/// use image_spider::config::Config;
/// use image_spider::crawler::run_crawl;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let stats = run_crawl(&config, &Url::parse("https://example.com/")?).await?;
/// println!("{} images saved", stats.images_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, start_url: &Url) -> Result<CrawlStats, SpiderError> {
    let mut coordinator = Coordinator::new(config, &config.crawler.output_dir)?;
    let stats = coordinator.run(start_url, config.crawler.max_depth).await;
    Ok(stats.clone())
}
