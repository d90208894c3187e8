//! PDF extraction.
//!
//! Downloads the document through the shared fetcher and reads page text
//! with pdf-extract on a blocking thread.

use crate::extract::{ExtractionError, Extractor};
use crate::fetch::Fetch;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub struct PdfExtractor {
    fetcher: Arc<dyn Fetch>,
    timeout: Duration,
}

impl PdfExtractor {
    pub fn new(fetcher: Arc<dyn Fetch>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        let bytes = self.fetcher.get_bytes(url, self.timeout).await?;
        tracing::debug!(url, bytes = bytes.len(), "PDF downloaded");

        // pdf-extract can panic on malformed input; the join error catches it
        tokio::task::spawn_blocking(move || pdf_text(&bytes))
            .await
            .map_err(|e| ExtractionError::PdfParse(format!("parser aborted: {e}")))?
    }
}

/// Concatenated text of every page, in page order, with no separator.
///
/// Image-only documents yield empty or near-empty text, which is not an error here.
pub fn pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::PdfParse(e.to_string()))?;
    Ok(pages.concat())
}
