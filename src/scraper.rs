//! Article extraction from web pages.
//!
//! Uses the shared fetcher for retrieval and scraper for HTML parsing.

use crate::extract::{ExtractionError, Extractor};
use crate::fetch::Fetch;
use async_trait::async_trait;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("static selector");
}

/// Extracts paragraph text from an HTML page
pub struct ArticleExtractor {
    fetcher: Arc<dyn Fetch>,
    timeout: Duration,
}

impl ArticleExtractor {
    pub fn new(fetcher: Arc<dyn Fetch>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }
}

#[async_trait]
impl Extractor for ArticleExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        let html = self.fetcher.get_text(url, self.timeout).await?;
        let text = paragraph_text(&html);
        tracing::debug!(url, chars = text.chars().count(), "article paragraphs extracted");
        Ok(text)
    }
}

/// Text of every `<p>` element in document order, joined by single spaces.
///
/// Returns an empty string when the page has no paragraphs.
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .select(&PARAGRAPH)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
