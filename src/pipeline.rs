//! Pipeline coordination: validate, classify, extract, check, normalize, summarize.
//!
//! Each stage runs once, in order; the first failure ends the request.

use crate::agent::{SummarizationClient, SummarizationError, Summarizer};
use crate::config::Config;
use crate::extract::{ExtractionError, Extractors};
use crate::fetch::{FetchError, HttpFetcher};
use crate::normalize::Normalizer;
use crate::source::{classify, SourceKind};
use crate::summary::Summary;
use std::sync::Arc;
use thiserror::Error;

const MISSING_CREDENTIAL_WARNING: &str =
    "no summarization credential configured; summaries will fail until HF_API_TOKEN is set";

/// Who is at fault for a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    ClientFault,
    ServerFault,
}

impl StatusClass {
    pub fn status_code(&self) -> u16 {
        match self {
            StatusClass::ClientFault => 400,
            StatusClass::ServerFault => 500,
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("URL is required")]
    Validation,
    #[error("{source}")]
    Extraction {
        kind: SourceKind,
        source: ExtractionError,
    },
    #[error("{}", empty_content_message(.0))]
    EmptyContent(SourceKind),
    #[error(transparent)]
    Summarization(#[from] SummarizationError),
}

fn empty_content_message(kind: &SourceKind) -> &'static str {
    match kind {
        SourceKind::Article => "Failed to retrieve or parse article text",
        SourceKind::Video => "Failed to retrieve or parse video transcript",
        SourceKind::Pdf => "Failed to retrieve or parse PDF text",
    }
}

impl PipelineError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            PipelineError::Validation | PipelineError::Extraction { .. } => {
                StatusClass::ClientFault
            }
            PipelineError::EmptyContent(_) | PipelineError::Summarization(_) => {
                StatusClass::ServerFault
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_class().status_code()
    }
}

/// Text pulled from a source, before normalization
#[derive(Debug, Clone)]
pub struct Extracted {
    pub kind: SourceKind,
    pub text: String,
}

pub struct Pipeline {
    extractors: Extractors,
    normalizer: Normalizer,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        extractors: Extractors,
        normalizer: Normalizer,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            extractors,
            normalizer,
            summarizer,
        }
    }

    /// Build the pipeline against the live collaborators
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch.user_agent)?);
        let client = SummarizationClient::new(&config.summarizer);
        if !client.has_credential() {
            tracing::warn!("{}", MISSING_CREDENTIAL_WARNING);
        }

        Ok(Self::new(
            Extractors::from_config(fetcher, &config.fetch),
            Normalizer::from_config(&config.summarizer),
            Arc::new(client),
        ))
    }

    /// Validate, classify and extract. Text that is empty after trimming is a failure.
    pub async fn extract(&self, url: &str) -> Result<Extracted, PipelineError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PipelineError::Validation);
        }

        let kind = classify(url);
        tracing::info!(url, %kind, "classified source");

        let text = self
            .extractors
            .for_kind(kind)
            .extract(url)
            .await
            .map_err(|source| {
                tracing::warn!(url, %kind, error = %source, "extraction failed");
                PipelineError::Extraction { kind, source }
            })?;

        if text.trim().is_empty() {
            tracing::warn!(url, %kind, "extraction produced no text");
            return Err(PipelineError::EmptyContent(kind));
        }

        tracing::info!(url, %kind, chars = text.chars().count(), "extracted text");
        Ok(Extracted { kind, text })
    }

    /// Run the full pipeline for one URL
    pub async fn summarize_url(&self, url: &str) -> Result<Summary, PipelineError> {
        let extracted = self.extract(url).await?;

        let bounded = self.normalizer.normalize(&extracted.text);
        if bounded.truncated {
            tracing::info!(kept = bounded.kept_chars, "truncated text to input budget");
        }

        let summary = self.summarizer.summarize(&bounded).await.map_err(|e| {
            match &e {
                SummarizationError::Service { cause } => {
                    tracing::warn!(%cause, "summarization failed")
                }
                SummarizationError::Auth => tracing::warn!("summarization credential missing"),
            }
            PipelineError::from(e)
        })?;

        Ok(Summary::new(summary))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeSummarizer;
    use super::*;
    use crate::config::{FetchConfig, SummarizerConfig};
    use crate::extract::testing::FakeFetcher;

    const PROMPT_PREFIX: &str =
        "Summarize the following text in a detailed and structured way:\n\n";

    fn pipeline(fetcher: Arc<FakeFetcher>, summarizer: Arc<FakeSummarizer>) -> Pipeline {
        Pipeline::new(
            Extractors::from_config(fetcher, &FetchConfig::default()),
            Normalizer::from_config(&SummarizerConfig::default()),
            summarizer,
        )
    }

    #[tokio::test]
    async fn empty_url_is_rejected_without_network() {
        let fetcher = Arc::new(FakeFetcher::default());
        let summarizer = Arc::new(FakeSummarizer::ok());
        let pipeline = pipeline(fetcher.clone(), summarizer.clone());

        for url in ["", "   "] {
            let err = pipeline.summarize_url(url).await.unwrap_err();
            assert!(matches!(err, PipelineError::Validation));
            assert_eq!(err.to_string(), "URL is required");
            assert_eq!(err.status_code(), 400);
        }
        assert_eq!(fetcher.call_count(), 0);
        assert!(summarizer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn article_paragraphs_reach_the_summarizer() {
        let fetcher = Arc::new(
            FakeFetcher::default()
                .with("https://example.com/article", "<p>A.</p><p>B.</p><p>C.</p>"),
        );
        let summarizer = Arc::new(FakeSummarizer::ok());
        let pipeline = pipeline(fetcher, summarizer.clone());

        let summary = pipeline
            .summarize_url("https://example.com/article")
            .await
            .unwrap();

        assert_eq!(summary, Summary::new("A short summary."));
        assert_eq!(
            summarizer.prompts.lock().unwrap().as_slice(),
            &[format!("{PROMPT_PREFIX}A. B. C.")]
        );
    }

    #[tokio::test]
    async fn long_text_is_cut_to_budget() {
        let paragraph = "word ".repeat(2000);
        let fetcher = Arc::new(
            FakeFetcher::default().with("https://example.com/long", format!("<p>{paragraph}</p>")),
        );
        let summarizer = Arc::new(FakeSummarizer::ok());
        let pipeline = pipeline(fetcher, summarizer.clone());

        pipeline.summarize_url("https://example.com/long").await.unwrap();

        let prompts = summarizer.prompts.lock().unwrap();
        let body = prompts[0].strip_prefix(PROMPT_PREFIX).unwrap();
        assert_eq!(body.chars().count(), 4096);
        assert_eq!(body, &paragraph[..4096]);
    }

    #[tokio::test]
    async fn video_url_without_id_is_a_client_fault() {
        let fetcher = Arc::new(FakeFetcher::default());
        let pipeline = pipeline(fetcher.clone(), Arc::new(FakeSummarizer::ok()));

        let err = pipeline
            .summarize_url("https://www.youtube.com/watch?list=PL1")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Extraction {
                kind: SourceKind::Video,
                source: ExtractionError::InvalidUrl(_)
            }
        ));
        assert!(err.to_string().starts_with("Invalid YouTube URL"));
        assert_eq!(err.status_code(), 400);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn fetch_failures_are_client_faults() {
        let pipeline = pipeline(Arc::new(FakeFetcher::default()), Arc::new(FakeSummarizer::ok()));

        let err = pipeline
            .summarize_url("https://example.com/report.pdf")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Extraction {
                kind: SourceKind::Pdf,
                source: ExtractionError::Fetch(_)
            }
        ));
        assert_eq!(err.status_class(), StatusClass::ClientFault);
    }

    #[tokio::test]
    async fn page_without_paragraphs_is_a_server_fault() {
        let fetcher = Arc::new(
            FakeFetcher::default().with("https://example.com/empty", "<div>menu</div><p>  </p>"),
        );
        let summarizer = Arc::new(FakeSummarizer::ok());
        let pipeline = pipeline(fetcher, summarizer.clone());

        let err = pipeline.summarize_url("https://example.com/empty").await.unwrap_err();

        assert!(matches!(err, PipelineError::EmptyContent(SourceKind::Article)));
        assert_eq!(err.to_string(), "Failed to retrieve or parse article text");
        assert_eq!(err.status_code(), 500);
        assert!(summarizer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summarization_failures_are_server_faults() {
        let fetcher =
            Arc::new(FakeFetcher::default().with("https://example.com/a", "<p>Text.</p>"));

        let service = pipeline(
            fetcher.clone(),
            Arc::new(FakeSummarizer::answering(|| {
                Err(SummarizationError::Service {
                    cause: "HTTP 503".to_string(),
                })
            })),
        );
        let err = service.summarize_url("https://example.com/a").await.unwrap_err();
        assert_eq!(err.status_class(), StatusClass::ServerFault);
        assert!(err.to_string().contains("try again"));

        let auth = pipeline(
            fetcher,
            Arc::new(FakeSummarizer::answering(|| Err(SummarizationError::Auth))),
        );
        let err = auth.summarize_url("https://example.com/a").await.unwrap_err();
        assert!(matches!(err, PipelineError::Summarization(SummarizationError::Auth)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn repeated_runs_extract_the_same_text() {
        let fetcher = Arc::new(
            FakeFetcher::default().with("https://example.com/article", "<p>One.</p><p>Two.</p>"),
        );
        let pipeline = pipeline(fetcher, Arc::new(FakeSummarizer::ok()));

        let first = pipeline.extract("https://example.com/article").await.unwrap();
        let second = pipeline.extract("https://example.com/article").await.unwrap();

        assert_eq!(first.kind, second.kind);
        assert_eq!(first.text.len(), second.text.len());
    }
}
