//! sevtrack-api library - bug report intake with severity classification
//!
//! Accepts bug reports over HTTP, runs an external severity classifier and
//! persists the classified records.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use classifier::SeverityClassifier;
use store::BugStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Bug record persistence
    pub store: Arc<dyn BugStore>,
    /// Severity classification
    pub classifier: SeverityClassifier,
}

impl AppState {
    pub fn new(store: Arc<dyn BugStore>, classifier: SeverityClassifier) -> Self {
        Self { store, classifier }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::bug_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
