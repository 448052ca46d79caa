//! Inference Engine - risk scoring over the loaded forest
//!
//! [`RiskEngine`] is built once from validated [`Artifacts`] and shared by
//! reference. Scoring is deterministic: identical records and artifacts give
//! identical results.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::artifacts::{ArtifactInfo, Artifacts};
use super::threshold::{DecisionThreshold, RiskLabel};
use crate::logic::config::EngineConfig;
use crate::logic::error::{CardioError, CardioResult};
use crate::logic::features::{FeatureRecord, FeatureVector};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub probability: f64, // 0.0 - 1.0
    pub label: RiskLabel,
    pub threshold: f64,
}

impl PredictionResult {
    /// Probability as a percentage rounded to one decimal
    pub fn percent(&self) -> f64 {
        (self.probability * 1000.0).round() / 10.0
    }

    pub fn is_risk(&self) -> bool {
        self.label == RiskLabel::Risk
    }
}

/// Engine Status for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model: ArtifactInfo,
    pub threshold: f64,
    pub explain_enabled: bool,
    pub avg_latency_ms: f64,
    pub inference_count: u64,
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug)]
pub struct RiskEngine {
    artifacts: Artifacts,
    config: EngineConfig,
    threshold: DecisionThreshold,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl RiskEngine {
    pub fn new(artifacts: Artifacts, config: EngineConfig) -> CardioResult<Self> {
        let threshold = DecisionThreshold::new(config.threshold)
            .map_err(|e| CardioError::startup(e.to_string()))?;

        Ok(Self {
            artifacts,
            config,
            threshold,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    /// Load artifacts from disk and build the engine
    pub fn load(model_path: &Path, columns_path: &Path, config: EngineConfig) -> CardioResult<Self> {
        let artifacts = Artifacts::load(model_path, columns_path)?;
        Self::new(artifacts, config)
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn threshold(&self) -> DecisionThreshold {
        self.threshold
    }

    /// Record → column order → scaled model input
    pub fn encode(&self, record: &FeatureRecord) -> CardioResult<FeatureVector> {
        let mut vector = self.artifacts.columns().encode(record)?;
        let model = self.artifacts.model();
        model.check_shape(vector.as_slice())?;

        if let Some(scaler) = &model.scaler {
            scaler.transform(vector.as_mut_slice());
        }
        Ok(vector)
    }

    pub fn predict(&self, record: &FeatureRecord) -> CardioResult<PredictionResult> {
        let vector = self.encode(record)?;
        self.predict_vector(&vector)
    }

    /// Score an already encoded and scaled vector
    pub fn predict_vector(&self, vector: &FeatureVector) -> CardioResult<PredictionResult> {
        let start_time = Instant::now();

        let probability = self.artifacts.model().predict_proba(vector.as_slice())?;

        self.latency_sum_us
            .fetch_add(start_time.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        log::debug!("Predicted probability {:.4}", probability);

        Ok(PredictionResult {
            probability,
            label: self.threshold.classify(probability),
            threshold: self.threshold.value(),
        })
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: true,
            model: self.artifacts.info().clone(),
            threshold: self.threshold.value(),
            explain_enabled: self.config.explain_enabled,
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}
