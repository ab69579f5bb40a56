use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::FrontendConfig;
use crate::stats::StatsEngine;
use crate::storage::EventStore;

use super::handlers::{get_stats, health_check, record_visit, AppState};

pub fn create_router(store: Arc<dyn EventStore>, frontend: FrontendConfig) -> Router {
    let state = Arc::new(AppState {
        engine: StatsEngine::new(Arc::clone(&store)),
        store,
    });

    // The dashboard is served from anywhere, so the API allows any origin
    let router = Router::new()
        .route("/api/analytics/visit", post(record_visit))
        .route("/api/analytics/stats/{period}", get(get_stats))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state);

    match frontend.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}
