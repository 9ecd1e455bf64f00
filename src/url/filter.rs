/// Excludes links that designate downloadable resources
///
/// A link is a download link when its absolute form contains any of the
/// configured literal substrings, e.g. `ld.php?content_id=`.
#[derive(Debug, Clone, Default)]
pub struct DownloadFilter {
    patterns: Vec<String>,
}

impl DownloadFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        let patterns = patterns.into_iter().filter(|p| !p.is_empty()).collect();
        Self { patterns }
    }

    pub fn is_download(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| url.contains(p.as_str()))
    }
}
