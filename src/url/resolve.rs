use crate::UrlError;
use url::Url;

/// Returns true if the URL qualifies as a Target URL
///
/// A Target URL needs both a non-empty scheme and a non-empty host. This
/// rules out `mailto:`, `javascript:`, `data:` and similar references.
pub fn is_valid_target(url: &Url) -> bool {
    !url.scheme().is_empty() && url.host_str().is_some_and(|host| !host.is_empty())
}

/// Resolves a reference found in a page against the page URL
///
/// Handles absolute, root-relative (`/img/a.png`), path-relative
/// (`../b.jpg`), protocol-relative (`//cdn.example.com/c.gif`) and
/// fragment-only forms. The fragment is dropped from the result since it
/// never changes the fetched resource.
///
/// Returns `None` for empty references, references that fail to parse and
/// results that are not valid Target URLs.
///
/// # Examples
///
/// ```
/// use image_spider::url::resolve_reference;
/// use url::Url;
///
/// let base = Url::parse("http://x.test/gallery/index.html").unwrap();
/// let resolved = resolve_reference("../b.jpg", &base).unwrap();
/// assert_eq!(resolved.as_str(), "http://x.test/b.jpg");
/// ```
pub fn resolve_reference(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut resolved = base_url.join(href).ok()?;
    resolved.set_fragment(None);

    is_valid_target(&resolved).then_some(resolved)
}

/// Parses the start URL given on the command line
///
/// Unlike references found in pages, the start URL must be HTTP or HTTPS.
/// Its fragment is dropped the same way, so links back to it match.
pub fn parse_start_url(input: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if !is_valid_target(&url) {
        return Err(UrlError::MissingHost(input.to_string()));
    }

    url.set_fragment(None);
    Ok(url)
}
