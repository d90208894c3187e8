//! Summarization client for a hosted inference endpoint.
//!
//! Sends `{inputs, parameters: {min_length, max_length}}` with a bearer token
//! and reads `summary_text` from the first element of the response array.

use crate::config::SummarizerConfig;
use crate::normalize::BoundedText;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("Summarization credential is not configured; set HF_API_TOKEN")]
    Auth,
    /// The cause is kept for logging; callers only see the retry advice.
    #[error("Failed to get summary from the API. The model might be loading, please try again in a minute.")]
    Service { cause: String },
}

impl SummarizationError {
    fn service(cause: impl Into<String>) -> Self {
        SummarizationError::Service {
            cause: cause.into(),
        }
    }
}

/// Produces a summary for bounded text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &BoundedText) -> Result<String, SummarizationError>;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    min_length: u32,
    max_length: u32,
}

#[derive(Deserialize)]
struct InferenceOutput {
    summary_text: String,
}

pub struct SummarizationClient {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    min_length: u32,
    max_length: u32,
    timeout: Duration,
}

impl SummarizationClient {
    pub fn new(config: &SummarizerConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            min_length: config.min_length,
            max_length: config.max_length,
            timeout: config.timeout(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_token.is_some()
    }
}

#[async_trait]
impl Summarizer for SummarizationClient {
    async fn summarize(&self, text: &BoundedText) -> Result<String, SummarizationError> {
        let token = self.api_token.as_deref().ok_or(SummarizationError::Auth)?;

        let request = InferenceRequest {
            inputs: &text.prompt,
            parameters: InferenceParameters {
                min_length: self.min_length,
                max_length: self.max_length,
            },
        };

        tracing::debug!(endpoint = %self.endpoint, chars = text.kept_chars, "requesting summary");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizationError::service(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummarizationError::service(format!("failed to read response: {e}")))?;

        parse_response(status, &body)
    }
}

/// Read the summary out of an inference response
pub fn parse_response(status: StatusCode, body: &str) -> Result<String, SummarizationError> {
    if !status.is_success() {
        return Err(SummarizationError::service(format!("HTTP {status}: {body}")));
    }

    let outputs: Vec<InferenceOutput> = serde_json::from_str(body)
        .map_err(|e| SummarizationError::service(format!("unexpected response: {e}: {body}")))?;

    outputs
        .into_iter()
        .next()
        .map(|output| output.summary_text)
        .ok_or_else(|| SummarizationError::service("empty response array"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use crate::server::testing::serve_local;
    use axum::extract::{Json, State};
    use axum::http::{self, header, HeaderMap};
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Local inference endpoint answering every request with `status` and `reply`
    async fn inference_endpoint(status: http::StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/models/summarizer",
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let auth = headers
                                .get(header::AUTHORIZATION)
                                .and_then(|value| value.to_str().ok())
                                .map(str::to_string);
                            captured.lock().unwrap().push((auth, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let addr = serve_local(app).await;
        (format!("http://{addr}/models/summarizer"), captured)
    }

    fn client_for(endpoint: String) -> (SummarizationClient, Normalizer) {
        let config = SummarizerConfig {
            endpoint,
            api_token: Some("hf_test".to_string()),
            ..SummarizerConfig::default()
        };
        (
            SummarizationClient::new(&config),
            Normalizer::from_config(&config),
        )
    }

    #[test]
    fn returns_first_summary_verbatim() {
        let summary = parse_response(
            StatusCode::OK,
            r#"[{"summary_text": "  X  "}, {"summary_text": "Y"}]"#,
        )
        .unwrap();
        assert_eq!(summary, "  X  ");
    }

    #[test]
    fn missing_summary_field_is_a_service_error() {
        let err = parse_response(StatusCode::OK, r#"[{"generated_text": "X"}]"#).unwrap_err();
        assert!(matches!(err, SummarizationError::Service { .. }));
    }

    #[test]
    fn loading_model_error_body_is_a_service_error() {
        let err = parse_response(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":"Model is currently loading","estimated_time":20.0}"#,
        )
        .unwrap_err();

        match err {
            SummarizationError::Service { cause } => assert!(cause.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_array_and_garbage_are_service_errors() {
        assert!(parse_response(StatusCode::OK, "[]").is_err());
        assert!(parse_response(StatusCode::OK, "<html>").is_err());
    }

    #[test]
    fn service_message_hides_the_cause() {
        let err = SummarizationError::service("HTTP 500: stack trace");
        assert!(!err.to_string().contains("stack trace"));
        assert!(err.to_string().contains("try again"));
    }

    #[test]
    fn request_body_shape() {
        let request = InferenceRequest {
            inputs: "text",
            parameters: InferenceParameters {
                min_length: 30,
                max_length: 150,
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "inputs": "text",
                "parameters": {"min_length": 30, "max_length": 150}
            })
        );
    }

    #[tokio::test]
    async fn sends_bearer_token_and_length_bounds() {
        let (endpoint, captured) =
            inference_endpoint(http::StatusCode::OK, json!([{ "summary_text": "S." }])).await;
        let (client, normalizer) = client_for(endpoint);
        let bounded = normalizer.normalize("A. B. C.");

        let summary = client.summarize(&bounded).await.unwrap();
        assert_eq!(summary, "S.");

        let requests = captured.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (auth, body) = &requests[0];
        assert_eq!(auth.as_deref(), Some("Bearer hf_test"));
        assert_eq!(
            body,
            &json!({
                "inputs": bounded.prompt,
                "parameters": {"min_length": 30, "max_length": 150}
            })
        );
    }

    #[tokio::test]
    async fn error_status_from_endpoint_is_a_service_error() {
        let (endpoint, captured) = inference_endpoint(
            http::StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": "Model is currently loading" }),
        )
        .await;
        let (client, normalizer) = client_for(endpoint);

        let err = client
            .summarize(&normalizer.normalize("text"))
            .await
            .unwrap_err();

        match err {
            SummarizationError::Service { cause } => assert!(cause.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let config = SummarizerConfig {
            // Unroutable; reaching it would be a Service error, not Auth
            endpoint: "http://127.0.0.1:9/never".to_string(),
            api_token: None,
            ..SummarizerConfig::default()
        };
        let client = SummarizationClient::new(&config);
        assert!(!client.has_credential());

        let bounded = Normalizer::from_config(&config).normalize("text");
        let err = client.summarize(&bounded).await.unwrap_err();
        assert!(matches!(err, SummarizationError::Auth));
    }
}
