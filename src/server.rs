//! HTTP boundary: `POST /summarize` and `GET /health`.

use crate::pipeline::Pipeline;
use crate::summary::{ErrorBody, SummarizeRequest};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/summarize", post(summarize_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { pipeline })
}

pub async fn start_server(pipeline: Pipeline, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(pipeline));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn summarize_handler(
    State(state): State<AppState>,
    request: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected request body");
            let body = ErrorBody::new(rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match state.pipeline.summarize_url(request.url()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ErrorBody::new(e.to_string()))).into_response()
        }
    }
}
