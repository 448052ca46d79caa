//! Logic Module - Business Logic & Engines
//!
//! ## Layout
//! - `features/` - Feature schema, validated records, column encoding
//! - `model/` - Artifact loading, tree-ensemble inference, threshold
//! - `explain/` - Per-prediction TreeSHAP attributions
//! - `tips/` - Rule-based wellness suggestions
//! - `history/` - Persisted prediction log
//! - `pipeline` - Predict → explain → tips → store orchestration

pub mod config;
pub mod error;

pub mod features;
pub mod model;
pub mod explain;
pub mod tips;
pub mod history;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod fixtures;
