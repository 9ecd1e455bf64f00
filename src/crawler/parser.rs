//! Link extraction from fetched pages
//!
//! Parses one page's markup and yields the normalized outbound links found
//! in its `<a href>` elements.

use crate::crawler::LinkRecord;
use crate::url::{normalize_url, DownloadFilter};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Schemes that never point at a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["mailto:", "javascript:", "tel:"];

/// Extracts link records from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document, resolved against
/// `base_url` (the page's final URL after redirects).
///
/// **Exclude:**
/// - `mailto:`, `javascript:`, `tel:` links
/// - Fragment-only links (`#section`)
/// - Links matching the download filter
/// - Anything that does not resolve to an HTTP(S) URL
///
/// Each resolved URL is emitted at most once per page, in document order.
/// The HTML parser is error-tolerant: malformed markup yields whatever links
/// can still be recovered instead of an error.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `base_url` - URL used to resolve relative references
/// * `page` - Record of the page being parsed; becomes the parent
/// * `filter` - Download-content filter
///
/// # Example
///
/// ```
/// use link_ripple::crawler::{extract_links, LinkRecord};
/// use link_ripple::url::DownloadFilter;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let page = LinkRecord::seed(base.clone());
/// let html = r#"<a href="/about">About</a><a href="mailto:a@b.c">Mail</a>"#;
/// let links = extract_links(html, &base, &page, &DownloadFilter::default());
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url.as_str(), "https://example.com/about");
/// assert_eq!(links[0].depth, 1);
/// ```
pub fn extract_links(
    html: &str,
    base_url: &Url,
    page: &LinkRecord,
    filter: &DownloadFilter,
) -> Vec<LinkRecord> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_link(href, base_url, filter) else {
            continue;
        };

        if seen.insert(url.as_str().to_string()) {
            links.push(page.child(url));
        }
    }

    links
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url, filter: &DownloadFilter) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;

    if filter.is_download(absolute.as_str()) {
        return None;
    }

    normalize_url(absolute.as_str()).ok()
}
