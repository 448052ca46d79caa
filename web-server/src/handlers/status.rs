//! Engine status and schema handlers

use axum::{extract::State, Json};

use cardio_core::{EngineStatus, LayoutInfo};

use crate::AppState;

/// Model metadata, threshold and inference counters
pub async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine.status())
}

/// Feature schema for form rendering
pub async fn schema() -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}
