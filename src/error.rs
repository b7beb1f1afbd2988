//! Error types for storyrelay
//!
//! All errors implement `IntoResponse` for Axum handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Number of characters of model output kept in a malformed-output error
const OUTPUT_PREVIEW_CHARS: usize = 200;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Completion provider at {url} is unreachable: {source}")]
    UpstreamUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Completion provider returned HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Completion provider returned an unusable response: {0}")]
    UpstreamResponse(String),

    #[error("Model output is not valid JSON ({source}). Output began with: {preview:?}")]
    MalformedModelOutput {
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a `MalformedModelOutput` error, keeping only a bounded preview of the output
    pub fn malformed_output(output: &str, source: serde_json::Error) -> Self {
        Self::MalformedModelOutput {
            preview: output.chars().take(OUTPUT_PREVIEW_CHARS).collect(),
            source,
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamHttp { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamResponse(_) => StatusCode::BAD_GATEWAY,
            Self::MalformedModelOutput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable label, used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::UpstreamHttp { .. } => "upstream_http",
            Self::UpstreamResponse(_) => "upstream_response",
            Self::MalformedModelOutput { .. } => "malformed_output",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(msg) | Self::Internal(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
