//! URL classification into the content kind that decides which extractor runs.

use std::fmt;
use url::Url;

/// Host markers of supported video sites
const VIDEO_MARKERS: &[&str] = &["youtube.com", "youtu.be"];

/// The kind of content a URL refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Article,
    Video,
    Pdf,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Article => "article",
            SourceKind::Video => "video",
            SourceKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a URL. Video markers win over a `.pdf` path; anything else is an article.
pub fn classify(url: &str) -> SourceKind {
    let lowered = url.to_ascii_lowercase();

    if VIDEO_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return SourceKind::Video;
    }

    if url_path(&lowered).ends_with(".pdf") {
        return SourceKind::Pdf;
    }

    SourceKind::Article
}

/// Path component of the URL, without query string or fragment.
fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Not an absolute URL; cut at the first query or fragment marker
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}
