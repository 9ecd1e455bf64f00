use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used for visited-set membership
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP or HTTPS scheme and a host
/// 3. Lowercase scheme and host, drop default ports and dot segments
///    (performed by the parser)
/// 4. Remove the fragment
/// 5. Remove an empty query string (trailing `?`)
///
/// Path case, trailing slashes and query parameters are left as-is: servers
/// are free to treat them as distinct resources.
///
/// # Examples
///
/// ```
/// use link_ripple::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/a/../page?#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
