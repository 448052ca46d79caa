//! Shared test fixtures built on the sample artifacts in `artifacts/`.

use super::config::EngineConfig;
use super::features::FeatureRecord;
use super::model::{Artifacts, ModelArtifact, RiskEngine};

pub const MODEL_JSON: &str = include_str!("../../../artifacts/model.json");
pub const COLUMNS_JSON: &str = include_str!("../../../artifacts/columns.json");

pub fn sample_columns() -> Vec<String> {
    serde_json::from_str(COLUMNS_JSON).unwrap()
}

pub fn sample_model() -> ModelArtifact {
    serde_json::from_str(MODEL_JSON).unwrap()
}

pub fn sample_artifacts() -> Artifacts {
    Artifacts::from_parts(sample_model(), sample_columns()).unwrap()
}

pub fn sample_engine() -> RiskEngine {
    RiskEngine::new(sample_artifacts(), EngineConfig::default()).unwrap()
}

/// The 63-year-old male from the classic Cleveland example row
pub fn sample_record() -> FeatureRecord {
    record_with(&[])
}

/// Sample record with some fields overridden
pub fn record_with(overrides: &[(&str, super::features::FieldValue)]) -> FeatureRecord {
    let mut pairs: Vec<(&str, super::features::FieldValue)> = vec![
        ("age", 63.0.into()),
        ("sex", "Male".into()),
        ("chest_pain_type", "Typical Angina".into()),
        ("resting_blood_pressure", 145.0.into()),
        ("cholesterol", 233.0.into()),
        ("fasting_blood_sugar", "Yes".into()),
        ("rest_ecg", "Normal".into()),
        ("max_heart_rate", 150.0.into()),
        ("exercise_induced_angina", "No".into()),
        ("oldpeak", 2.3.into()),
        ("slope", "Down".into()),
    ];
    for (name, value) in overrides {
        if let Some(slot) = pairs.iter_mut().find(|(n, _)| *n == *name) {
            slot.1 = value.clone();
        }
    }
    FeatureRecord::from_pairs(pairs).unwrap()
}
