//! Resolution of command-line options into crawl parameters

use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Computes the effective crawl depth from the `-r` and `-l` options
///
/// * `-l N` without `-r` is a configuration error
/// * `-r -l N` yields `N`
/// * anything else yields 1, which visits only the start page
///
/// # Example
///
/// ```
/// use image_spider::config::resolve_depth;
///
/// assert_eq!(resolve_depth(true, Some(3)).unwrap(), 3);
/// assert_eq!(resolve_depth(true, None).unwrap(), 1);
/// assert!(resolve_depth(false, Some(3)).is_err());
/// ```
pub fn resolve_depth(recursive: bool, level: Option<u32>) -> Result<u32, ConfigError> {
    match (recursive, level) {
        (false, Some(_)) => Err(ConfigError::LevelWithoutRecursion),
        (_, Some(0)) => Err(ConfigError::InvalidDepth(0)),
        (true, Some(n)) => Ok(n),
        (_, None) => Ok(1),
    }
}

/// Creates the output directory if it does not exist yet
///
/// Returns the absolute path of the directory. This runs once at startup;
/// the image store assumes the directory is already present.
pub fn prepare_output_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| ConfigError::OutputDir {
                path: path.to_path_buf(),
                source,
            })?
            .join(path)
    };

    if !absolute.is_dir() {
        std::fs::create_dir_all(&absolute).map_err(|source| ConfigError::OutputDir {
            path: absolute.clone(),
            source,
        })?;
        tracing::debug!("Created output directory {}", absolute.display());
    }

    Ok(absolute)
}
