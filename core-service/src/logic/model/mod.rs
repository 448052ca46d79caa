//! Model Module - Tree-Ensemble Inference
//!
//! Artifact loading is kept apart from scoring so the engine can be built
//! from disk in production and from in-memory artifacts in tests.

pub mod artifacts;
pub mod forest;
pub mod inference;
pub mod threshold;

// Re-export common types
pub use artifacts::{ArtifactInfo, Artifacts};
pub use forest::{DecisionTree, ModelArtifact, Scaler, TreeNode};
pub use inference::{EngineStatus, PredictionResult, RiskEngine};
pub use threshold::{DecisionThreshold, RiskLabel};
