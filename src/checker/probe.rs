//! Single-attempt URL probe
//!
//! Issues one GET, follows redirects, and reports the final status code and
//! Content-Type. The body is never read. Transport failures are classified
//! into an `ErrorKind`.

use crate::checker::{CheckOutcome, ErrorKind};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::error::Error as StdError;
use url::Url;

/// Substrings that mark an error chain as a TLS/certificate failure
const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// Performs one status check against `url`
///
/// The caller bounds the attempt's duration; the client's own timeout is a
/// backstop and is classified the same way.
pub async fn probe_url(client: &Client, url: &Url) -> CheckOutcome {
    match client.get(url.clone()).send().await {
        Ok(response) => {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            CheckOutcome::status(response.status().as_u16(), content_type)
        }
        Err(e) => {
            let kind = classify_error(&e);
            tracing::trace!("Probe of {} failed ({}): {}", url, kind, e);
            CheckOutcome::Error(kind)
        }
    }
}

/// Maps a transport error to the kind reported in logs and statistics
pub fn classify_error(error: &reqwest::Error) -> ErrorKind {
    if error.is_timeout() {
        return ErrorKind::Timeout;
    }

    if mentions_tls(error) {
        return ErrorKind::SslError;
    }

    if error.is_connect() {
        return ErrorKind::ConnectionError;
    }

    ErrorKind::Other
}

/// Inspects the causes only; the top-level message embeds the URL
fn mentions_tls(error: &(dyn StdError + 'static)) -> bool {
    let mut source = error.source();
    while let Some(err) = source {
        let message = err.to_string().to_ascii_lowercase();
        if TLS_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        source = err.source();
    }
    false
}
