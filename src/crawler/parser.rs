//! HTML parser for extracting links and images
//!
//! This module turns already-fetched HTML into resolved Target URLs:
//! - Links to follow (from `<a href>` elements)
//! - Images to download (from `<img src>` elements, extension-filtered)
//!
//! Nothing here performs network I/O. Malformed or host-less references are
//! treated as noise and dropped silently.

use crate::url::{has_allowed_extension, resolve_reference};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Unique links found on the page, in first-seen document order
    pub links: Vec<Url>,

    /// Image URLs in document order, not de-duplicated
    pub images: Vec<Url>,
}

/// Parses HTML content once and extracts both links and images
///
/// # Example
///
/// ```
/// use image_spider::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<img src="pic.jpg"><a href="/next">Next</a>"#;
/// let base_url = Url::parse("http://x.test/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.images[0].as_str(), "http://x.test/pic.jpg");
/// assert_eq!(parsed.links[0].as_str(), "http://x.test/next");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: links_in(&document, base_url),
        images: images_in(&document, base_url),
    }
}

/// Extracts the set of absolute hyperlink URLs reachable from a page
///
/// Duplicates are collapsed; the first occurrence fixes the position.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    links_in(&Html::parse_document(html), base_url)
}

/// Extracts absolute image URLs in document order
///
/// Only images whose final path segment ends in an allowed extension are
/// kept. The same image may appear more than once.
pub fn extract_images(html: &str, base_url: &Url) -> Vec<Url> {
    images_in(&Html::parse_document(html), base_url)
}

fn links_in(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();

    attribute_urls(document, "a[href]", "href", base_url)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

fn images_in(document: &Html, base_url: &Url) -> Vec<Url> {
    attribute_urls(document, "img[src]", "src", base_url)
        .filter(has_allowed_extension)
        .collect()
}

/// Resolves the given attribute of every element matching `selector`
fn attribute_urls<'a>(
    document: &'a Html,
    selector: &str,
    attribute: &'a str,
    base_url: &'a Url,
) -> impl Iterator<Item = Url> + 'a {
    let elements = Selector::parse(selector)
        .ok()
        .map(|selector| document.select(&selector).collect::<Vec<_>>())
        .unwrap_or_default();

    elements.into_iter().filter_map(move |element| {
        element
            .value()
            .attr(attribute)
            .and_then(|value| resolve_reference(value, base_url))
    })
}
