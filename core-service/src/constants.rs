//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! The web server reads overrides from the environment through the helpers below.

use std::path::PathBuf;

use crate::logic::error::{CardioError, CardioResult};

/// Default model artifact location (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "artifacts/model.json";

/// Default column-ordering artifact location
pub const DEFAULT_COLUMNS_PATH: &str = "artifacts/columns.json";

/// History file name inside the data directory
pub const HISTORY_FILE_NAME: &str = "history.jsonl";

/// Default decision threshold (label = risk iff probability >= threshold)
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Number of top factors shown to the user and used by explanation tips
pub const DEFAULT_TOP_FACTORS: usize = 5;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Base directory for persisted user data
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardio-risk")
}

/// Get model artifact path from environment or use default
pub fn get_model_path() -> PathBuf {
    std::env::var("CARDIO_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Get column artifact path from environment or use default
pub fn get_columns_path() -> PathBuf {
    std::env::var("CARDIO_COLUMNS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_COLUMNS_PATH))
}

/// Get history file path from environment or use the data directory
pub fn get_history_path() -> PathBuf {
    std::env::var("CARDIO_HISTORY_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join(HISTORY_FILE_NAME))
}

/// Get decision threshold from environment or use default.
/// A set but unparseable value is a startup error.
pub fn get_threshold() -> CardioResult<f64> {
    parse_threshold(std::env::var("CARDIO_THRESHOLD").ok().as_deref())
}

/// Parse a raw `CARDIO_THRESHOLD` value; unset or blank means the default
pub fn parse_threshold(raw: Option<&str>) -> CardioResult<f64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_THRESHOLD),
        Some(s) => s
            .parse()
            .map_err(|_| CardioError::startup(format!("CARDIO_THRESHOLD '{}' is not a number", s))),
    }
}

/// Get number of top factors from environment or use default
pub fn get_top_factors() -> usize {
    match std::env::var("CARDIO_TOP_FACTORS") {
        Ok(s) => match s.trim().parse() {
            Ok(n) if n > 0 => n,
            _ => {
                log::warn!("Ignoring CARDIO_TOP_FACTORS '{}', using {}", s, DEFAULT_TOP_FACTORS);
                DEFAULT_TOP_FACTORS
            }
        },
        Err(_) => DEFAULT_TOP_FACTORS,
    }
}

/// Check if per-prediction explanations are enabled
pub fn is_explain_enabled() -> bool {
    std::env::var("CARDIO_EXPLAIN_ENABLED")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}
