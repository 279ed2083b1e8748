//! Storage module for Image-Spider
//!
//! This module persists downloaded images as flat files in the output
//! directory and remembers which image URLs were already saved.

mod image_store;

pub use image_store::{DownloadOutcome, ImageStore};

use thiserror::Error;

/// Errors that can occur while saving an image
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
