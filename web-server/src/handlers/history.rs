//! History handlers

use axum::{extract::{rejection::{JsonRejection, PathRejection}, Path, State}, Json};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::handlers::with_history;
use crate::models::{DeleteResponse, DeleteSelectedRequest, HistoryItem, HistoryList};

/// List all past results, oldest first
pub async fn list(State(state): State<AppState>) -> AppResult<Json<HistoryList>> {
    let entries = state.history.lock().list()?;

    let items: Vec<HistoryItem> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| HistoryItem::new(index, entry))
        .collect();

    Ok(Json(HistoryList {
        total: items.len(),
        items,
    }))
}

/// Delete one row by position
pub async fn delete_one(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(index) = path?;

    let (removed, remaining) = with_history(&state, move |_, history| {
        let removed = history.delete(index)?;
        Ok((removed, history.len()?))
    })
    .await?;

    tracing::info!("Deleted history entry {} at index {}", removed.id, index);

    Ok(Json(DeleteResponse { deleted: 1, remaining }))
}

/// Delete the selected rows, all or nothing
pub async fn delete_selected(
    State(state): State<AppState>,
    payload: Result<Json<DeleteSelectedRequest>, JsonRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let (removed, remaining) = with_history(&state, move |_, history| {
        let removed = history.delete_many(&req.indices)?;
        Ok((removed, history.len()?))
    })
    .await?;

    tracing::info!("Deleted {} history entries", removed.len());

    Ok(Json(DeleteResponse {
        deleted: removed.len(),
        remaining,
    }))
}
