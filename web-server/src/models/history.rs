//! History DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use cardio_core::HistoryEntry;

/// History row as listed; `index` is what delete endpoints take
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub index: usize,
    pub percent: f64,
    /// False for rows recorded under an older feature schema
    pub current_layout: bool,
    #[serde(flatten)]
    pub entry: HistoryEntry,
}

impl HistoryItem {
    pub fn new(index: usize, entry: HistoryEntry) -> Self {
        Self {
            index,
            percent: entry.prediction.percent(),
            current_layout: entry.is_current_layout(),
            entry,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryList {
    pub total: usize,
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteSelectedRequest {
    #[validate(length(min = 1, message = "select at least one row"))]
    pub indices: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: usize,
    pub remaining: usize,
}
