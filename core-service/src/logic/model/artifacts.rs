//! Artifact Loader
//!
//! Loads the model artifact and the column-ordering artifact once at start-up.
//! Any missing, unreadable or inconsistent file is a startup error: the
//! process must not serve predictions with a partially loaded model.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::forest::ModelArtifact;
use crate::logic::error::{CardioError, CardioResult};
use crate::logic::features::ColumnLayout;

/// Model metadata for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub source: String,
    pub model_type: String,
    /// SHA-256 of the model artifact bytes
    pub checksum: String,
    pub trees: usize,
    pub n_features: usize,
    pub scaled: bool,
    pub loaded_at: DateTime<Utc>,
}

/// Loaded, validated artifacts. Read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct Artifacts {
    model: ModelArtifact,
    columns: ColumnLayout,
    info: ArtifactInfo,
}

impl Artifacts {
    /// Load both artifacts from disk
    pub fn load(model_path: &Path, columns_path: &Path) -> CardioResult<Self> {
        log::info!("Loading model artifact from: {}", model_path.display());

        let model_bytes = read_artifact(model_path)?;
        let model: ModelArtifact = serde_json::from_slice(&model_bytes).map_err(|e| {
            CardioError::startup(format!("corrupt model artifact {}: {}", model_path.display(), e))
        })?;

        log::info!("Loading column artifact from: {}", columns_path.display());

        let column_bytes = read_artifact(columns_path)?;
        let columns: Vec<String> = serde_json::from_slice(&column_bytes).map_err(|e| {
            CardioError::startup(format!("corrupt column artifact {}: {}", columns_path.display(), e))
        })?;

        Self::build(model, columns, model_path.display().to_string(), &model_bytes)
    }

    /// Build from in-memory artifacts (tests, embedded models)
    pub fn from_parts(model: ModelArtifact, columns: Vec<String>) -> CardioResult<Self> {
        let bytes = serde_json::to_vec(&model)
            .map_err(|e| CardioError::startup(format!("model is not serializable: {}", e)))?;
        Self::build(model, columns, "<memory>".to_string(), &bytes)
    }

    fn build(model: ModelArtifact, columns: Vec<String>, source: String, bytes: &[u8]) -> CardioResult<Self> {
        model.validate()?;

        if columns.len() != model.n_features {
            return Err(CardioError::startup(format!(
                "column artifact lists {} columns but the model expects {}",
                columns.len(),
                model.n_features
            )));
        }

        let layout = ColumnLayout::new(columns);
        let unresolved = layout.unresolved();
        if !unresolved.is_empty() {
            // Surfaced per request as a schema mismatch
            log::warn!("Columns not produced by the feature schema: {:?}", unresolved);
        }

        let info = ArtifactInfo {
            source,
            model_type: model.model_type.clone(),
            checksum: hex::encode(Sha256::digest(bytes)),
            trees: model.trees.len(),
            n_features: model.n_features,
            scaled: model.scaler.is_some(),
            loaded_at: Utc::now(),
        };

        log::info!(
            "Model loaded: {} trees, {} columns, sha256={}",
            info.trees,
            info.n_features,
            &info.checksum[..12]
        );

        Ok(Self { model, columns: layout, info })
    }

    pub fn model(&self) -> &ModelArtifact {
        &self.model
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn info(&self) -> &ArtifactInfo {
        &self.info
    }
}

fn read_artifact(path: &Path) -> CardioResult<Vec<u8>> {
    if !path.exists() {
        return Err(CardioError::startup(format!("artifact not found: {}", path.display())));
    }
    fs::read(path).map_err(|e| CardioError::startup(format!("cannot read {}: {}", path.display(), e)))
}
