//! Output module for crawl summaries
//!
//! This module handles:
//! - Counting what a crawl run did (pages, images, failures)
//! - Printing the end-of-run summary

pub mod stats;

pub use stats::{print_statistics, CrawlStats};
