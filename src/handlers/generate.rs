//! Title and story generation handlers
//!
//! `GET|PUT /get_titles` and `GET|PUT /get_stories` share one pipeline:
//! extract fields → build conversation → call the provider → parse JSON.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::metrics::OUTCOME_SUCCESS;
use crate::middleware::RequestId;
use crate::prompts::{GenerationKind, build_conversation};
use crate::shared::GenerationFields;
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State},
};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// GET|PUT /get_titles handler
pub async fn titles_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    generate(&state, GenerationKind::Titles, request_id, &query, &body).await
}

/// GET|PUT /get_stories handler
pub async fn stories_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    generate(&state, GenerationKind::Stories, request_id, &query, &body).await
}

async fn generate(
    state: &AppState,
    kind: GenerationKind,
    request_id: RequestId,
    query: &HashMap<String, String>,
    body: &[u8],
) -> AppResult<Json<Value>> {
    let result = run_generation(state, kind, request_id, query, body).await;

    let outcome = match &result {
        Ok(_) => OUTCOME_SUCCESS,
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!(
                    request_id = %request_id,
                    route = kind.as_str(),
                    error_kind = e.kind(),
                    error = %e,
                    "Generation request failed"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    route = kind.as_str(),
                    error_kind = e.kind(),
                    error = %e,
                    "Generation request rejected"
                );
            }
            e.kind()
        }
    };

    // Metrics failures are logged and never fail the request.
    if let Err(e) = state.metrics().record_request(kind, outcome) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    result.map(Json)
}

async fn run_generation(
    state: &AppState,
    kind: GenerationKind,
    request_id: RequestId,
    query: &HashMap<String, String>,
    body: &[u8],
) -> AppResult<Value> {
    let fields = GenerationFields::extract(query, body)?;

    tracing::debug!(
        request_id = %request_id,
        route = kind.as_str(),
        has_title = fields.title.is_some(),
        has_description = fields.description.is_some(),
        "Received generation request"
    );

    let conversation = build_conversation(
        kind.system_prompt(),
        fields.title.as_deref(),
        fields.description.as_deref(),
    );

    let started = Instant::now();
    let completion = state.client().complete(&conversation).await;
    let upstream_ms = started.elapsed().as_secs_f64() * 1000.0;

    if let Err(e) = state.metrics().record_upstream_duration(kind, upstream_ms) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    let content = completion?;

    tracing::info!(
        request_id = %request_id,
        route = kind.as_str(),
        upstream_ms = %upstream_ms,
        content_length = content.len(),
        "Completion received"
    );

    parse_model_output(&content)
}

/// Parse the model's text content as JSON
pub fn parse_model_output(content: &str) -> AppResult<Value> {
    serde_json::from_str(content).map_err(|e| AppError::malformed_output(content, e))
}
