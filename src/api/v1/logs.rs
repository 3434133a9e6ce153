//! Classification audit log endpoints

use axum::{extract::State, http::StatusCode};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ClassificationLogList, Json};

/// GET /v1/classification-logs
pub async fn list_classification_logs(
    State(state): State<AppState>,
) -> Result<Json<ClassificationLogList>, ApiError> {
    let entries = state.audit_log.read_all().await?;

    Ok(Json(ClassificationLogList::new(entries)))
}

/// DELETE /v1/classification-logs
pub async fn clear_classification_logs(
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.audit_log.clear().await?;
    info!("Classification logs cleared");

    Ok(StatusCode::NO_CONTENT)
}
