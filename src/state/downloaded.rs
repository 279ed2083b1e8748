use std::collections::HashSet;
use url::Url;

/// Image URLs already saved during the current run
///
/// Only successful downloads are recorded; a failed attempt leaves the URL
/// free to be tried again when another page links to it.
#[derive(Debug, Default, Clone)]
pub struct DownloadedSet {
    urls: HashSet<Url>,
}

impl DownloadedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url)
    }

    /// Records a successful download
    pub fn record(&mut self, url: Url) -> bool {
        self.urls.insert(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
