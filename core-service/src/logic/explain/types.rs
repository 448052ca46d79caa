use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increases,
    Decreases,
}

impl Direction {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Direction::Increases
        } else {
            Direction::Decreases
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub label: String,
    pub value: f64, // signed, additive
    pub direction: Direction,
}

impl FeatureContribution {
    /// One-line rendering, e.g. `Cholesterol (mg/dl) (increases risk): contribution 0.042`
    pub fn summary(&self) -> String {
        let verb = match self.direction {
            Direction::Increases => "increases",
            Direction::Decreases => "decreases",
        };
        format!("{} ({} risk): contribution {:.3}", self.label, verb, self.value.abs())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Mean model output with every feature unknown
    pub expected_value: f64,
    /// Model output for this record; `expected_value + Σ contributions`
    pub prediction: f64,
    /// One entry per schema field, by descending |value|
    pub contributions: Vec<FeatureContribution>,
}

impl Explanation {
    pub fn top(&self, n: usize) -> &[FeatureContribution] {
        &self.contributions[..n.min(self.contributions.len())]
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureContribution> {
        self.contributions.iter().find(|c| c.feature == feature)
    }

    pub fn total(&self) -> f64 {
        self.contributions.iter().map(|c| c.value).sum()
    }
}
