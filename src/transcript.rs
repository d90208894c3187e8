//! Video extraction from caption tracks.
//!
//! The video id comes from the `v` query parameter, or from the path of a
//! `youtu.be` short link. Caption segments are
//! looked up through a `TranscriptSource`; the default source reads the
//! timedtext XML track (`<transcript><text start dur>..</text></transcript>`).

use crate::config::FetchConfig;
use crate::extract::{ExtractionError, Extractor};
use crate::fetch::Fetch;
use async_trait::async_trait;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("caption service error: {0}")]
    Service(#[from] crate::fetch::FetchError),
    #[error("no captions available for video {0}")]
    NoCaptions(String),
    #[error("malformed caption track: {0}")]
    Malformed(String),
}

/// One caption line
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptSegment {
    #[serde(rename = "$text", default)]
    pub text: String,
    /// Offset from the start of the video, in seconds
    #[serde(rename = "@start")]
    pub start: f64,
    #[serde(rename = "@dur", default)]
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
struct TimedTextTrack {
    #[serde(rename = "text", default)]
    segments: Vec<TranscriptSegment>,
}

/// Looks up the caption track of a video by id.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str)
        -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Caption lookup against a timedtext-style endpoint
pub struct TimedTextSource {
    fetcher: Arc<dyn Fetch>,
    endpoint: String,
    lang: String,
    timeout: Duration,
}

impl TimedTextSource {
    pub fn new(fetcher: Arc<dyn Fetch>, config: &FetchConfig) -> Self {
        Self {
            fetcher,
            endpoint: config.transcript_endpoint.clone(),
            lang: config.transcript_lang.clone(),
            timeout: config.transcript_timeout(),
        }
    }

    fn track_url(&self, video_id: &str) -> Result<String, TranscriptError> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[("v", video_id), ("lang", self.lang.as_str())],
        )
        .map_err(|e| TranscriptError::Malformed(format!("bad caption endpoint: {e}")))?;
        Ok(url.into())
    }
}

#[async_trait]
impl TranscriptSource for TimedTextSource {
    async fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let url = self.track_url(video_id)?;
        let xml = self.fetcher.get_text(&url, self.timeout).await?;

        // The service answers with an empty body when captions are disabled
        if xml.trim().is_empty() {
            return Err(TranscriptError::NoCaptions(video_id.to_string()));
        }

        let segments = parse_track(&xml)?;
        if segments.is_empty() {
            return Err(TranscriptError::NoCaptions(video_id.to_string()));
        }
        Ok(segments)
    }
}

/// Parse a timedtext XML track into segments
pub fn parse_track(xml: &str) -> Result<Vec<TranscriptSegment>, TranscriptError> {
    let track: TimedTextTrack =
        quick_xml::de::from_str(xml).map_err(|e| TranscriptError::Malformed(e.to_string()))?;

    Ok(track
        .segments
        .into_iter()
        .map(|mut segment| {
            segment.text = decode_entities(&segment.text);
            segment
        })
        .collect())
}

/// Caption text arrives escaped twice; the XML layer removes only the outer level.
/// Text that is not a valid escape sequence (a bare `&`) is kept as is.
fn decode_entities(text: &str) -> String {
    let decoded = quick_xml::escape::unescape(text).unwrap_or(Cow::Borrowed(text));
    decoded.replace('\n', " ")
}

/// Video id of a URL: the `v` query parameter, or the first path segment of a
/// `youtu.be` short link
pub fn video_id(url: &str) -> Result<String, ExtractionError> {
    let parsed = Url::parse(url).map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;

    let id = if parsed.host_str().is_some_and(|host| host.ends_with("youtu.be")) {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string)
    } else {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    };

    id.filter(|id| !id.is_empty())
        .ok_or_else(|| ExtractionError::InvalidUrl("missing 'v' query parameter".to_string()))
}

/// Join segments chronologically with single spaces
pub fn join_segments(mut segments: Vec<TranscriptSegment>) -> String {
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct VideoExtractor {
    transcripts: Arc<dyn TranscriptSource>,
}

impl VideoExtractor {
    pub fn new(transcripts: Arc<dyn TranscriptSource>) -> Self {
        Self { transcripts }
    }
}

#[async_trait]
impl Extractor for VideoExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        let id = video_id(url)?;

        let segments = self
            .transcripts
            .fetch_transcript(&id)
            .await
            .map_err(|e| ExtractionError::TranscriptUnavailable(e.to_string()))?;

        tracing::debug!(video_id = %id, segments = segments.len(), "transcript retrieved");
        Ok(join_segments(segments))
    }
}
