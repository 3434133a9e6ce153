//! Query resolution endpoint handler

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ResolveRequest, ResolveResponse};

/// POST /v1/resolve
pub async fn resolve_query(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::bad_request("Query must not be empty").with_param("query"));
    }

    info!(
        query_len = request.query.len(),
        history_turns = request.history.len(),
        "Processing resolve request"
    );

    let resolution = state
        .resolver
        .resolve(&request.query, &request.history)
        .await?;

    info!(origin = resolution.origin.as_str(), "Resolved query");

    Ok(Json(ResolveResponse::from(resolution)))
}
