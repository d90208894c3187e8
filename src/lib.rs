//! # Linkdigest
//!
//! Summarise the content behind a URL using a hosted inference endpoint.
//!
//! ## Features
//!
//! - **Three source kinds**: web articles, captioned videos and PDF documents,
//!   classified from the URL alone
//! - **One result shape**: every failure becomes a `PipelineError` with a
//!   client or server fault class
//! - **HTTP boundary**: `POST /summarize` via axum

pub mod agent;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod pdf;
pub mod pipeline;
pub mod scraper;
pub mod server;
pub mod source;
pub mod summary;
pub mod transcript;

pub use config::Config;
pub use pipeline::{Pipeline, PipelineError, StatusClass};
pub use source::{classify, SourceKind};
pub use summary::Summary;
