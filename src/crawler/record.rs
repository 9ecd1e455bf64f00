use url::Url;

/// A discovered link and the page it was found on
///
/// The seed page is represented with no parent at depth 0; every other
/// record sits exactly one level below its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Normalized absolute URL of the link target
    pub url: Url,

    /// Page the link was found on
    pub parent_url: Option<Url>,

    /// Distance from the seed page
    pub depth: u32,
}

impl LinkRecord {
    pub fn new(url: Url, parent_url: Option<Url>, depth: u32) -> Self {
        Self {
            url,
            parent_url,
            depth,
        }
    }

    /// Builds the depth-0 record for a crawl seed
    pub fn seed(url: Url) -> Self {
        Self::new(url, None, 0)
    }

    /// Builds a record for a link found on this record's page
    pub fn child(&self, url: Url) -> Self {
        Self::new(url, Some(self.url.clone()), self.depth + 1)
    }

    /// Parent URL as written to CSV (empty for the seed)
    pub fn parent_str(&self) -> &str {
        self.parent_url.as_ref().map_or("", Url::as_str)
    }
}
