//! Decision Threshold
//!
//! Turns the forest probability into a binary risk label.
//! label = Risk iff probability >= threshold.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THRESHOLD;
use crate::logic::error::{CardioError, CardioResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    Risk,
    NoRisk,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Risk => "risk",
            RiskLabel::NoRisk => "no_risk",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated threshold in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionThreshold(f64);

impl DecisionThreshold {
    pub fn new(value: f64) -> CardioResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(CardioError::validation(format!(
                "decision threshold must be within [0, 1], got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn classify(&self, probability: f64) -> RiskLabel {
        if probability >= self.0 {
            RiskLabel::Risk
        } else {
            RiskLabel::NoRisk
        }
    }
}

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}
