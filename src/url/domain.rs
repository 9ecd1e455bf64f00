use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_ripple::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks if a domain matches a wildcard pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches the bare
/// domain and any subdomain at any depth.
///
/// ```
/// use link_ripple::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.example.com", "blog.example.com"));
/// assert!(!matches_wildcard("example.com", "blog.example.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// The domain a crawl is restricted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDomain {
    pattern: String,
}

impl RootDomain {
    /// Builds a root domain from an explicit pattern, lowercased
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
        }
    }

    /// Uses the seed URL's host as an exact-match root domain
    pub fn from_seed(seed: &Url) -> Option<Self> {
        extract_domain(seed).map(|host| Self { pattern: host })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns true if the URL's host is inside this root domain
    pub fn contains(&self, url: &Url) -> bool {
        extract_domain(url)
            .map(|host| matches_wildcard(&self.pattern, &host))
            .unwrap_or(false)
    }
}
