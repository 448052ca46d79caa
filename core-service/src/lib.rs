//! Cardio Risk Core
//!
//! Heart-disease risk scoring behind the web front-end.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ FeatureRecord│──▶│  RiskEngine  │──▶│  Explainer   │──▶│ Tip rules    │
//! │ (validated)  │   │ (forest +    │   │ (TreeSHAP)   │   │              │
//! └──────────────┘   │  columns)    │   └──────────────┘   └──────┬───────┘
//!                    └──────────────┘                             ▼
//!                                                         ┌──────────────┐
//!                                                         │ HistoryStore │
//!                                                         └──────────────┘
//! ```
//!
//! Artifacts are loaded once into an immutable [`RiskEngine`] that is passed
//! by reference; the history store is the only mutable state.

pub mod constants;
pub mod logic;

pub use logic::error::{CardioError, CardioResult};
pub use logic::config::{EngineConfig, TipThresholds};
pub use logic::features::{FeatureRecord, FieldValue, FieldSpec, FeatureVector, LayoutInfo, SCHEMA, SCHEMA_VERSION};
pub use logic::model::{Artifacts, RiskEngine, PredictionResult, RiskLabel, DecisionThreshold, EngineStatus};
pub use logic::explain::{Explanation, FeatureContribution, Direction};
pub use logic::tips::{Tip, TipCategory, generate_tips, NO_SUGGESTIONS};
pub use logic::history::{HistoryEntry, HistoryError, HistoryResult, HistoryStore, JsonlHistory, MemoryHistory};
pub use logic::pipeline::{
    assess, population_comparison, what_if, Assessment, PopulationComparison, WhatIfAdjustments, WhatIfOutcome,
};
