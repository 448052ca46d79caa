//! Assessment Pipeline
//!
//! One submission = predict → explain → tips → store, synchronously.
//!
//! Failure policy:
//! - predictor error aborts before anything is stored
//! - explainer error is logged and the assessment continues without one
//! - storage error fails the request

use serde::{Deserialize, Serialize};

use crate::logic::error::{CardioError, CardioResult};
use crate::logic::explain::{Explanation, FeatureContribution};
use crate::logic::features::layout::{CHOLESTEROL, RESTING_BLOOD_PRESSURE};
use crate::logic::features::{FeatureRecord, SCHEMA};
use crate::logic::history::{HistoryEntry, HistoryStore};
use crate::logic::model::{PredictionResult, RiskEngine};
use crate::logic::tips::{generate_tips, Tip};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Everything shown for one submission
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub prediction: PredictionResult,
    pub explanation: Option<Explanation>,
    /// Leading `top_factors` contributions (empty without an explanation)
    pub top_factors: Vec<FeatureContribution>,
    pub tips: Vec<Tip>,
    /// The entry appended to history
    pub entry: HistoryEntry,
}

/// Replacement values for a what-if re-score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatIfAdjustments {
    pub cholesterol: Option<f64>,
    pub resting_blood_pressure: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhatIfOutcome {
    pub baseline: PredictionResult,
    pub adjusted: PredictionResult,
    /// adjusted - baseline probability
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationComparison {
    pub feature: String,
    pub label: String,
    pub population_mean: f64,
    pub value: f64,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Run the full assessment and append it to `history`
pub fn assess(
    engine: &RiskEngine,
    history: &mut dyn HistoryStore,
    record: &FeatureRecord,
) -> CardioResult<Assessment> {
    // 1. Predict
    let prediction = engine.predict(record)?;

    // 2. Explain (best effort)
    let explanation = match engine.explain(record) {
        Ok(explanation) => Some(explanation),
        Err(CardioError::ExplainDisabled) => None,
        Err(e) => {
            log::warn!("Explanation unavailable, continuing without it: {}", e);
            None
        }
    };

    let top_factors = explanation
        .as_ref()
        .map(|e| e.top(engine.config().top_factors).to_vec())
        .unwrap_or_default();

    // 3. Tips
    let tips = generate_tips(record, explanation.as_ref(), &engine.config().tips);

    // 4. Store
    let entry = HistoryEntry::new(record, prediction, explanation.is_some());
    history.append(entry.clone())?;

    log::info!(
        "Assessment stored: {:.1}% ({}), {} tips, explained={}",
        prediction.percent(),
        prediction.label,
        tips.len(),
        entry.explained
    );

    Ok(Assessment {
        prediction,
        explanation,
        top_factors,
        tips,
        entry,
    })
}

/// Re-score with cholesterol and/or blood pressure replaced. Never stores.
pub fn what_if(
    engine: &RiskEngine,
    record: &FeatureRecord,
    adjustments: &WhatIfAdjustments,
) -> CardioResult<WhatIfOutcome> {
    let mut adjusted_record = record.clone();
    if let Some(value) = adjustments.cholesterol {
        adjusted_record = adjusted_record.with_number(CHOLESTEROL, value)?;
    }
    if let Some(value) = adjustments.resting_blood_pressure {
        adjusted_record = adjusted_record.with_number(RESTING_BLOOD_PRESSURE, value)?;
    }

    let baseline = engine.predict(record)?;
    let adjusted = engine.predict(&adjusted_record)?;

    Ok(WhatIfOutcome {
        baseline,
        adjusted,
        delta: adjusted.probability - baseline.probability,
    })
}

/// Record values next to the training-set means shipped with the model
pub fn population_comparison(engine: &RiskEngine, record: &FeatureRecord) -> Vec<PopulationComparison> {
    let means = &engine.artifacts().model().population_means;

    SCHEMA
        .iter()
        .filter_map(|spec| {
            let population_mean = *means.get(spec.name)?;
            let value = record.number(spec.name)?;
            Some(PopulationComparison {
                feature: spec.name.to_string(),
                label: spec.label.to_string(),
                population_mean,
                value,
            })
        })
        .collect()
}
