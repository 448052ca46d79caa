//! Tip Rules
//!
//! Fixed rule table. Each rule looks at the raw record only; the
//! explanation-driven rules live in [`super::generate_tips`].
//! Cut-offs come from [`TipThresholds`].

use super::{Tip, TipCategory};
use crate::logic::config::TipThresholds;
use crate::logic::features::layout::{
    AGE, CHOLESTEROL, MAX_HEART_RATE, OLDPEAK, RESTING_BLOOD_PRESSURE, SEX,
};
use crate::logic::features::FeatureRecord;

// ============================================================================
// MESSAGES
// ============================================================================

pub const CHOLESTEROL_TIP: &str = "Reduce saturated fats and added sugars to help lower cholesterol.";
pub const BLOOD_PRESSURE_TIP: &str =
    "Lower salt intake and keep regular physical activity to help manage blood pressure.";
pub const FITNESS_TIP: &str = "Moderate aerobic exercise can help improve cardiovascular fitness.";
pub const STRESS_TEST_TIP: &str = "Discuss your stress-test or ECG results with a healthcare provider.";
pub const CHECK_UP_TIP: &str = "Men have slightly higher heart-disease risk; regular check-ups are important.";

pub const EXPLAINED_CHOLESTEROL_TIP: &str =
    "High cholesterol strongly influenced the prediction; consider a heart-healthy diet.";
pub const EXPLAINED_BLOOD_PRESSURE_TIP: &str =
    "Blood pressure was a key factor; monitor and maintain it within a healthy range.";

/// Shown by the presentation layer when no rule fires
pub const NO_SUGGESTIONS: &str = "Great job! No extra suggestions beyond maintaining a balanced lifestyle.";

// ============================================================================
// RECORD RULES (in display order)
// ============================================================================

type Rule = fn(&FeatureRecord, &TipThresholds) -> Option<Tip>;

pub(super) const RECORD_RULES: &[Rule] = &[
    high_cholesterol,
    high_blood_pressure,
    low_max_heart_rate,
    high_oldpeak,
    male_check_up,
];

fn high_cholesterol(record: &FeatureRecord, t: &TipThresholds) -> Option<Tip> {
    let value = record.number(CHOLESTEROL)?;
    (value > t.cholesterol).then(|| Tip::new(TipCategory::Cholesterol, CHOLESTEROL_TIP))
}

fn high_blood_pressure(record: &FeatureRecord, t: &TipThresholds) -> Option<Tip> {
    let value = record.number(RESTING_BLOOD_PRESSURE)?;
    (value > t.resting_blood_pressure).then(|| Tip::new(TipCategory::BloodPressure, BLOOD_PRESSURE_TIP))
}

fn low_max_heart_rate(record: &FeatureRecord, t: &TipThresholds) -> Option<Tip> {
    let max_hr = record.number(MAX_HEART_RATE)?;
    let age = record.number(AGE)?;
    (max_hr < t.max_heart_rate && age < t.fitness_age_limit)
        .then(|| Tip::new(TipCategory::Fitness, FITNESS_TIP))
}

fn high_oldpeak(record: &FeatureRecord, t: &TipThresholds) -> Option<Tip> {
    let value = record.number(OLDPEAK)?;
    (value > t.oldpeak).then(|| Tip::new(TipCategory::StressTest, STRESS_TEST_TIP))
}

fn male_check_up(record: &FeatureRecord, _t: &TipThresholds) -> Option<Tip> {
    (record.category(SEX)? == "male").then(|| Tip::new(TipCategory::CheckUp, CHECK_UP_TIP))
}
