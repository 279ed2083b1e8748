//! Configuration module for Image-Spider
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and resolving command-line options into the
//! parameters the crawl engine runs with.
//!
//! # Example
//!
//! ```no_run
//! use image_spider::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spider.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod options;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::load_config;

pub use options::{prepare_output_dir, resolve_depth};
pub use validation::validate;
