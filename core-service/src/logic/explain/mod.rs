//! Explain Module - per-prediction feature attributions
//!
//! ## Structure
//! - `types`: `Explanation`, `FeatureContribution`, `Direction`
//! - `engine`: exact TreeSHAP over the forest plus `RiskEngine::explain`
//!
//! ## Usage
//! ```ignore
//! let explanation = engine.explain(&record)?;
//! for factor in explanation.top(5) {
//!     println!("{}", factor.summary());
//! }
//! ```

pub mod engine;
pub mod types;

pub use engine::tree_shap;
pub use types::{Direction, Explanation, FeatureContribution};
