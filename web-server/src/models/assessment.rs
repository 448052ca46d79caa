//! Assessment DTOs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use cardio_core::{
    Assessment, Explanation, FeatureContribution, FieldValue, HistoryEntry, PopulationComparison,
    PredictionResult, Tip, WhatIfAdjustments, WhatIfOutcome, NO_SUGGESTIONS,
};

/// Raw form fields, validated against the schema by the core
pub type RawRecord = BTreeMap<String, FieldValue>;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: PredictionResult,
    /// Probability in percent, one decimal
    pub percent: f64,
    pub explanation: Option<Explanation>,
    pub top_factors: Vec<FactorView>,
    pub tips: Vec<Tip>,
    /// Shown instead of the tip list when no rule fired
    pub tips_fallback: Option<&'static str>,
    pub population: Vec<PopulationComparison>,
    pub entry: HistoryEntry,
}

impl PredictResponse {
    pub fn new(assessment: Assessment, population: Vec<PopulationComparison>) -> Self {
        let tips_fallback = assessment.tips.is_empty().then_some(NO_SUGGESTIONS);
        Self {
            percent: assessment.prediction.percent(),
            prediction: assessment.prediction,
            top_factors: assessment.top_factors.iter().map(FactorView::from).collect(),
            explanation: assessment.explanation,
            tips: assessment.tips,
            tips_fallback,
            population,
            entry: assessment.entry,
        }
    }
}

/// One top factor with its rendered summary line
#[derive(Debug, Serialize)]
pub struct FactorView {
    #[serde(flatten)]
    pub contribution: FeatureContribution,
    pub summary: String,
}

impl From<&FeatureContribution> for FactorView {
    fn from(c: &FeatureContribution) -> Self {
        Self {
            summary: c.summary(),
            contribution: c.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct WhatIfRequest {
    pub record: RawRecord,

    #[validate(range(min = 100.0, max = 600.0))]
    pub cholesterol: Option<f64>,

    #[validate(range(min = 80.0, max = 200.0))]
    pub resting_blood_pressure: Option<f64>,
}

impl WhatIfRequest {
    pub fn adjustments(&self) -> WhatIfAdjustments {
        WhatIfAdjustments {
            cholesterol: self.cholesterol,
            resting_blood_pressure: self.resting_blood_pressure,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WhatIfResponse {
    pub baseline: PredictionResult,
    pub adjusted: PredictionResult,
    pub baseline_percent: f64,
    pub adjusted_percent: f64,
    pub delta: f64,
}

impl From<WhatIfOutcome> for WhatIfResponse {
    fn from(outcome: WhatIfOutcome) -> Self {
        Self {
            baseline_percent: outcome.baseline.percent(),
            adjusted_percent: outcome.adjusted.percent(),
            baseline: outcome.baseline,
            adjusted: outcome.adjusted,
            delta: outcome.delta,
        }
    }
}
