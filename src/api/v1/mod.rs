//! v1 API endpoints

pub mod logs;
pub mod resolve;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/resolve", post(resolve::resolve_query))
        .route(
            "/classification-logs",
            get(logs::list_classification_logs).delete(logs::clear_classification_logs),
        )
}
