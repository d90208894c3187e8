//! Extraction seam: one `Extractor` per source kind, selected by classification.

use crate::config::FetchConfig;
use crate::fetch::{Fetch, FetchError};
use crate::pdf::PdfExtractor;
use crate::scraper::ArticleExtractor;
use crate::source::SourceKind;
use crate::transcript::{TimedTextSource, TranscriptSource, VideoExtractor};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure to turn a source into text
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] FetchError),
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),
    #[error("Could not retrieve transcript: {0}")]
    TranscriptUnavailable(String),
    #[error("Failed to parse PDF: {0}")]
    PdfParse(String),
}

/// Turns the content behind a URL into plain text.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, ExtractionError>;
}

/// The three extractors, one per source kind
pub struct Extractors {
    article: Box<dyn Extractor>,
    video: Box<dyn Extractor>,
    pdf: Box<dyn Extractor>,
}

impl Extractors {
    pub fn new(
        article: Box<dyn Extractor>,
        video: Box<dyn Extractor>,
        pdf: Box<dyn Extractor>,
    ) -> Self {
        Self {
            article,
            video,
            pdf,
        }
    }

    /// Wire the default extractors onto a shared fetcher
    pub fn from_config(fetcher: Arc<dyn Fetch>, config: &FetchConfig) -> Self {
        let transcripts: Arc<dyn TranscriptSource> =
            Arc::new(TimedTextSource::new(fetcher.clone(), config));

        Self::new(
            Box::new(ArticleExtractor::new(fetcher.clone(), config.article_timeout())),
            Box::new(VideoExtractor::new(transcripts)),
            Box::new(PdfExtractor::new(fetcher, config.pdf_timeout())),
        )
    }

    pub fn for_kind(&self, kind: SourceKind) -> &dyn Extractor {
        match kind {
            SourceKind::Article => self.article.as_ref(),
            SourceKind::Video => self.video.as_ref(),
            SourceKind::Pdf => self.pdf.as_ref(),
        }
    }
}
