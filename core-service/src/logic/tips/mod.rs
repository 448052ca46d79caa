//! Tips Module - rule-based wellness suggestions
//!
//! Pure function of the record and, when available, its explanation.
//! Output order follows the rule table, so identical inputs give identical
//! tips.

pub mod rules;

use serde::{Deserialize, Serialize};

use crate::logic::config::TipThresholds;
use crate::logic::explain::Explanation;
use crate::logic::features::layout::{CHOLESTEROL, RESTING_BLOOD_PRESSURE};
use crate::logic::features::FeatureRecord;

pub use rules::NO_SUGGESTIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Cholesterol,
    BloodPressure,
    Fitness,
    StressTest,
    CheckUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub category: TipCategory,
    pub message: String,
}

impl Tip {
    pub fn new(category: TipCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Run the rule table, then the explanation-driven rules
pub fn generate_tips(
    record: &FeatureRecord,
    explanation: Option<&Explanation>,
    thresholds: &TipThresholds,
) -> Vec<Tip> {
    let mut tips: Vec<Tip> = rules::RECORD_RULES
        .iter()
        .filter_map(|rule| rule(record, thresholds))
        .collect();

    if let Some(explanation) = explanation {
        let has = |tips: &[Tip], category: TipCategory| tips.iter().any(|t| t.category == category);

        for factor in explanation.top(thresholds.explained_factors) {
            if factor.value <= 0.0 {
                continue;
            }
            match factor.feature.as_str() {
                CHOLESTEROL if !has(&tips, TipCategory::Cholesterol) => {
                    tips.push(Tip::new(TipCategory::Cholesterol, rules::EXPLAINED_CHOLESTEROL_TIP));
                }
                RESTING_BLOOD_PRESSURE if !has(&tips, TipCategory::BloodPressure) => {
                    tips.push(Tip::new(TipCategory::BloodPressure, rules::EXPLAINED_BLOOD_PRESSURE_TIP));
                }
                _ => {}
            }
        }
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use crate::logic::explain::{Direction, FeatureContribution};
    use crate::logic::fixtures::record_with;

    fn factor(feature: &str, value: f64) -> FeatureContribution {
        FeatureContribution {
            feature: feature.to_string(),
            label: feature.to_string(),
            value,
            direction: Direction::of(value),
        }
    }

    fn explanation(factors: Vec<FeatureContribution>) -> Explanation {
        Explanation {
            expected_value: 0.4,
            prediction: 0.4 + factors.iter().map(|f| f.value).sum::<f64>(),
            contributions: factors,
        }
    }

    fn messages(tips: &[Tip]) -> Vec<&str> {
        tips.iter().map(|t| t.message.as_str()).collect()
    }

    #[test]
    fn test_sample_record_rules() {
        // 63 y/o male, bp 145, chol 233, max hr 150, oldpeak 2.3
        let tips = generate_tips(&record_with(&[]), None, &TipThresholds::default());
        assert_eq!(messages(&tips), vec![BLOOD_PRESSURE_TIP, STRESS_TEST_TIP, CHECK_UP_TIP]);
    }

    #[test]
    fn test_high_cholesterol_tip() {
        let record = record_with(&[("cholesterol", 241.0.into())]);
        let tips = generate_tips(&record, None, &TipThresholds::default());
        assert_eq!(tips[0], Tip::new(TipCategory::Cholesterol, CHOLESTEROL_TIP));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let record = record_with(&[
            ("cholesterol", 240.0.into()),
            ("resting_blood_pressure", 130.0.into()),
            ("oldpeak", 2.0.into()),
            ("sex", "female".into()),
        ]);
        assert!(generate_tips(&record, None, &TipThresholds::default()).is_empty());
    }

    #[test]
    fn test_fitness_tip_needs_young_patient() {
        let young = record_with(&[("age", 45.0.into()), ("max_heart_rate", 90.0.into())]);
        let old = record_with(&[("age", 65.0.into()), ("max_heart_rate", 90.0.into())]);
        let t = TipThresholds::default();

        assert!(generate_tips(&young, None, &t).iter().any(|tip| tip.category == TipCategory::Fitness));
        assert!(!generate_tips(&old, None, &t).iter().any(|tip| tip.category == TipCategory::Fitness));
    }

    #[test]
    fn test_custom_thresholds() {
        let t = TipThresholds {
            cholesterol: 200.0,
            ..TipThresholds::default()
        };
        let tips = generate_tips(&record_with(&[]), None, &t);
        assert_eq!(tips[0].category, TipCategory::Cholesterol);
    }

    #[test]
    fn test_explanation_adds_cholesterol_tip() {
        let record = record_with(&[("resting_blood_pressure", 120.0.into())]);
        let exp = explanation(vec![factor("cholesterol", 0.08), factor("age", 0.02)]);

        let tips = generate_tips(&record, Some(&exp), &TipThresholds::default());
        assert_eq!(tips.last().map(|t| t.message.as_str()), Some(EXPLAINED_CHOLESTEROL_TIP));
    }

    #[test]
    fn test_explanation_tip_does_not_duplicate_rule_tip() {
        let record = record_with(&[("cholesterol", 300.0.into())]);
        let exp = explanation(vec![factor("cholesterol", 0.1), factor("resting_blood_pressure", 0.05)]);

        let tips = generate_tips(&record, Some(&exp), &TipThresholds::default());
        let msgs = messages(&tips);
        assert!(msgs.contains(&CHOLESTEROL_TIP));
        assert!(!msgs.contains(&EXPLAINED_CHOLESTEROL_TIP));
        // bp 145 already has the rule tip
        assert!(!msgs.contains(&EXPLAINED_BLOOD_PRESSURE_TIP));
    }

    #[test]
    fn test_negative_factors_are_ignored() {
        let record = record_with(&[("resting_blood_pressure", 120.0.into())]);
        let exp = explanation(vec![factor("resting_blood_pressure", -0.1), factor("cholesterol", -0.05)]);

        let tips = generate_tips(&record, Some(&exp), &TipThresholds::default());
        assert_eq!(messages(&tips), vec![STRESS_TEST_TIP, CHECK_UP_TIP]);
    }

    #[test]
    fn test_only_top_factors_are_inspected() {
        let record = record_with(&[("resting_blood_pressure", 120.0.into())]);
        let exp = explanation(vec![factor("age", 0.2), factor("oldpeak", 0.1), factor("cholesterol", 0.05)]);
        let t = TipThresholds {
            explained_factors: 2,
            ..TipThresholds::default()
        };

        let tips = generate_tips(&record, Some(&exp), &t);
        assert!(!messages(&tips).contains(&EXPLAINED_CHOLESTEROL_TIP));
    }

    #[test]
    fn test_deterministic() {
        let record = record_with(&[("cholesterol", 280.0.into())]);
        let t = TipThresholds::default();
        assert_eq!(generate_tips(&record, None, &t), generate_tips(&record, None, &t));
    }
}
