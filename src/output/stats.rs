//! Statistics collected during a crawl run

use crate::storage::DownloadOutcome;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Pages handed to the fetcher
    pub pages_visited: u64,

    /// Pages whose fetch failed after all retries
    pub pages_failed: u64,

    /// Image references found across all pages (duplicates included)
    pub images_found: u64,

    /// Images written to disk
    pub images_saved: u64,

    /// Images skipped because they were already saved
    pub images_skipped: u64,

    /// Images rejected without a request
    pub images_rejected: u64,

    /// Images whose download failed
    pub images_failed: u64,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished, if it did
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStats {
    /// Creates empty statistics starting now
    pub fn start() -> Self {
        Self {
            pages_visited: 0,
            pages_failed: 0,
            images_found: 0,
            images_saved: 0,
            images_skipped: 0,
            images_rejected: 0,
            images_failed: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Counts the outcome of one download request
    pub fn record_download(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Saved(_) => self.images_saved += 1,
            DownloadOutcome::AlreadyDownloaded => self.images_skipped += 1,
            DownloadOutcome::Rejected(_) => self.images_rejected += 1,
            DownloadOutcome::Failed(_) => self.images_failed += 1,
        }
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall time of the run, up to now if it has not finished
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Visited: {}", stats.pages_visited);
    println!("  Failed: {}", stats.pages_failed);
    println!();

    println!("Images:");
    println!("  Found: {}", stats.images_found);
    println!("  Saved: {}", stats.images_saved);
    println!("  Already downloaded: {}", stats.images_skipped);
    if stats.images_rejected > 0 {
        println!("  Rejected: {}", stats.images_rejected);
    }
    println!("  Failed: {}", stats.images_failed);
    println!();

    println!(
        "Finished in {:.1}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
}
