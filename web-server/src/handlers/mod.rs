//! HTTP handlers

pub mod health;
pub mod status;
pub mod predict;
pub mod history;

use cardio_core::{HistoryStore, RiskEngine};

use crate::{AppError, AppResult, AppState};

/// Run `f` against the engine and the locked history on the blocking pool.
/// The lock is held for the whole call so writers apply in order.
pub async fn with_history<T, F>(state: &AppState, f: F) -> AppResult<T>
where
    F: FnOnce(&RiskEngine, &mut dyn HistoryStore) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let engine = state.engine.clone();
    let history = state.history.clone();

    tokio::task::spawn_blocking(move || {
        let mut history = history.lock();
        f(&engine, &mut **history)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("history task failed: {}", e)))?
}
