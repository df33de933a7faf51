//! Server router definition.
//!
//! The following routes are supported:
//!
//! - GET: `/health`
//! - POST: `/`, see [crate::relay]

use crate::{auth::ApiKey, relay::relay_handler, slack::api::SlackClient};
use axum::{
    http::StatusCode,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

/// Dependencies shared by routes across requests. Read-only, so there's no
/// locking.
#[derive(Clone)]
pub struct Deps {
    pub slack_client: Arc<SlackClient>,
    pub api_key: Arc<ApiKey>,
}

/// Instantiate a new router with tracing.
pub fn new(deps: Deps) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
        .on_response(trace::DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        // Every method reaches the handler so that it can explain itself.
        .route("/", any(relay_handler))
        .layer(trace_layer)
        // Exclude the health check route from tracing.
        .route("/health", get(|| async { StatusCode::OK }))
        .with_state(deps)
}
