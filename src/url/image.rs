use url::Url;

/// File extensions accepted as images, lowercase and with the leading dot
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp"];

/// Returns the final, non-empty path segment of a URL
fn last_segment(url: &Url) -> Option<&str> {
    url.path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
}

/// Returns true if the URL's final path segment carries an allowed image
/// extension (case-insensitive)
///
/// Query strings and fragments are not part of the path and are ignored.
///
/// # Examples
///
/// ```
/// use image_spider::url::has_allowed_extension;
/// use url::Url;
///
/// assert!(has_allowed_extension(&Url::parse("http://x.test/a/PIC.JPG?w=10").unwrap()));
/// assert!(!has_allowed_extension(&Url::parse("http://x.test/a/pic.webp").unwrap()));
/// ```
pub fn has_allowed_extension(url: &Url) -> bool {
    let Some(segment) = last_segment(url) else {
        return false;
    };

    let lowered = segment.to_lowercase();
    match lowered.rfind('.') {
        Some(idx) => ALLOWED_EXTENSIONS.contains(&&lowered[idx..]),
        None => false,
    }
}

/// Derives the local filename for an image URL from its final path segment
///
/// Returns `None` when the path ends in a slash or has no segments.
pub fn image_filename(url: &Url) -> Option<String> {
    last_segment(url)
        .filter(|segment| *segment != "." && *segment != "..")
        .map(str::to_string)
}
