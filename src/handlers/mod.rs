//! HTTP request handlers for the storyrelay API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::llm::{CompletionClient, GroqClient};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod generate;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers. Provider
/// settings live in the client; nothing else reads the config after startup.
#[derive(Clone)]
pub struct AppState {
    client: Arc<dyn CompletionClient>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState backed by the Groq completion client
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = GroqClient::new(config.llm.clone())?;
        Self::with_client(Arc::new(client))
    }

    /// Create a new AppState with a caller-supplied completion client
    pub fn with_client(client: Arc<dyn CompletionClient>) -> AppResult<Self> {
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to initialize metrics: {}", e)))?;

        Ok(Self {
            client,
            metrics: Arc::new(metrics),
        })
    }

    /// Get reference to the completion client
    pub fn client(&self) -> &dyn CompletionClient {
        self.client.as_ref()
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/get_titles",
            get(generate::titles_handler).put(generate::titles_handler),
        )
        .route(
            "/get_stories",
            get(generate::stories_handler).put(generate::stories_handler),
        )
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
