//! URL handling module for Image-Spider
//!
//! This module provides Target URL validation, resolution of references
//! found in HTML against the page that contained them, and the filename and
//! extension rules applied to image URLs.

mod image;
mod resolve;

pub use image::{has_allowed_extension, image_filename, ALLOWED_EXTENSIONS};
pub use resolve::{is_valid_target, parse_start_url, resolve_reference};
