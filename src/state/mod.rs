//! Crawl state tracking
//!
//! This module contains the two de-duplication sets a crawl run carries:
//! - Visited set: pages already handed to the crawl engine
//! - Downloaded set: images already saved to disk
//!
//! Both live for a single process run and are never persisted.

mod downloaded;
mod visited;

pub use downloaded::DownloadedSet;
pub use visited::VisitedSet;
