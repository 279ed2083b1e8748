use std::collections::HashSet;
use url::Url;

/// Pages already handed to the crawl engine during the current run
///
/// Membership is the only cycle-avoidance mechanism: a page is marked before
/// it is fetched, so a failed fetch is never retried through another link.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<Url>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the URL was already visited
    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url)
    }

    /// Marks a URL as visited
    ///
    /// Returns true if the URL was not visited before.
    pub fn mark(&mut self, url: &Url) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.clone())
    }

    /// Number of visited pages
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true if nothing was visited yet
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
