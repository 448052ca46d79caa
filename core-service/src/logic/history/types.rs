use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::logic::features::layout::layout_hash;
use crate::logic::features::{FeatureRecord, FieldValue, SCHEMA_VERSION};
use crate::logic::model::PredictionResult;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("history file corrupt at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One persisted prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,

    // Layout the record was captured with
    pub schema_version: u8,
    pub layout_hash: u32,

    pub record: BTreeMap<String, FieldValue>,
    pub prediction: PredictionResult,

    /// False when the explanation step failed or was disabled
    pub explained: bool,
}

impl HistoryEntry {
    pub fn new(record: &FeatureRecord, prediction: PredictionResult, explained: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            schema_version: SCHEMA_VERSION,
            layout_hash: layout_hash(),
            record: record.to_map(),
            prediction,
            explained,
        }
    }

    /// Recorded with the schema this build validates against
    pub fn is_current_layout(&self) -> bool {
        self.schema_version == SCHEMA_VERSION && self.layout_hash == layout_hash()
    }
}

/// Remove `indices` from `entries`, all or nothing.
/// Duplicates are ignored; removed entries come back in index order.
pub(crate) fn remove_indices(entries: &mut Vec<HistoryEntry>, indices: &[usize]) -> HistoryResult<Vec<HistoryEntry>> {
    let len = entries.len();
    if let Some(&index) = indices.iter().find(|&&i| i >= len) {
        return Err(HistoryError::OutOfRange { index, len });
    }

    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut removed: Vec<HistoryEntry> = sorted.iter().rev().map(|&i| entries.remove(i)).collect();
    removed.reverse();
    Ok(removed)
}
