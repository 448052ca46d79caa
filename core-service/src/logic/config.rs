//! Engine Configuration
//!
//! Tunables for scoring, explanations and tip rules. Everything has a
//! default; the server overrides from the environment via [`EngineConfig::from_env`].

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::error::CardioResult;

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Decision threshold (0.0 - 1.0)
    pub threshold: f64,

    /// Kill-switch for TreeSHAP explanations
    pub explain_enabled: bool,

    /// How many top factors are summarised / fed to explanation tips
    pub top_factors: usize,

    /// Tip rule cut-offs
    pub tips: TipThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: constants::DEFAULT_THRESHOLD,
            explain_enabled: true,
            top_factors: constants::DEFAULT_TOP_FACTORS,
            tips: TipThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, falling back to defaults.
    /// Fails on a threshold that is set but not a number.
    pub fn from_env() -> CardioResult<Self> {
        let top_factors = constants::get_top_factors();
        Ok(Self {
            threshold: constants::get_threshold()?,
            explain_enabled: constants::is_explain_enabled(),
            top_factors,
            tips: TipThresholds {
                explained_factors: top_factors,
                ..TipThresholds::default()
            },
        })
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn without_explanations(mut self) -> Self {
        self.explain_enabled = false;
        self
    }
}

/// Cut-offs for the wellness tip rule table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipThresholds {
    /// Cholesterol above this (mg/dl) triggers the diet tip
    pub cholesterol: f64,

    /// Resting blood pressure above this (mm Hg) triggers the salt tip
    pub resting_blood_pressure: f64,

    /// Max heart rate below this triggers the fitness tip...
    pub max_heart_rate: f64,

    /// ...but only for patients younger than this
    pub fitness_age_limit: f64,

    /// ST depression above this triggers the ECG follow-up tip
    pub oldpeak: f64,

    /// Leading explanation factors inspected by the explanation-driven tips
    pub explained_factors: usize,
}

impl Default for TipThresholds {
    fn default() -> Self {
        Self {
            cholesterol: 240.0,
            resting_blood_pressure: 130.0,
            max_heart_rate: 100.0,
            fitness_age_limit: 60.0,
            oldpeak: 2.0,
            explained_factors: constants::DEFAULT_TOP_FACTORS,
        }
    }
}
