//! Tree Ensemble - random forest classifier artifact
//!
//! Trees are stored as flat node lists in pre-order (children always have a
//! larger index than their parent). A sample goes left when
//! `x[feature] <= threshold`. Leaves carry per-class sample weights; the
//! forest probability is the mean over trees of the positive-class fraction
//! at the reached leaf.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::error::{CardioError, CardioResult};

// ============================================================================
// NODES & TREES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Training weight that reached this node
        cover: f64,
    },
    Leaf {
        /// Per-class training weight
        value: Vec<f64>,
        cover: f64,
    },
}

impl TreeNode {
    pub fn cover(&self) -> f64 {
        match self {
            TreeNode::Split { cover, .. } | TreeNode::Leaf { cover, .. } => *cover,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Structural checks; the message is wrapped into a startup error by the caller
    fn validate(&self, n_features: usize, positive_class: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right, cover } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {} (n_features = {})", i, feature, n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child index {}", i, child));
                        }
                    }
                    if !(cover.is_finite() && *cover > 0.0) {
                        return Err(format!("split node {} must have positive cover", i));
                    }
                }
                TreeNode::Leaf { value, cover } => {
                    if value.len() <= positive_class {
                        return Err(format!("leaf {} has no entry for class {}", i, positive_class));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {} has an invalid class distribution", i));
                    }
                    if !(cover.is_finite() && *cover >= 0.0) {
                        return Err(format!("leaf {} has invalid cover", i));
                    }
                }
            }
        }

        Ok(())
    }

    /// Index of the leaf reached by `x`
    pub fn leaf_index(&self, x: &[f64]) -> usize {
        let mut index = 0;
        while let TreeNode::Split { feature, threshold, left, right, .. } = &self.nodes[index] {
            index = if x[*feature] <= *threshold { *left } else { *right };
        }
        index
    }

    /// Positive-class fraction stored at `leaf`
    pub fn leaf_probability(&self, leaf: usize, positive_class: usize) -> f64 {
        match &self.nodes[leaf] {
            TreeNode::Leaf { value, .. } => value[positive_class] / value.iter().sum::<f64>(),
            TreeNode::Split { .. } => 0.0,
        }
    }

    pub fn predict(&self, x: &[f64], positive_class: usize) -> f64 {
        self.leaf_probability(self.leaf_index(x), positive_class)
    }
}

// ============================================================================
// PREPROCESSING
// ============================================================================

/// Standard scaler fitted at training time: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn transform(&self, values: &mut [f64]) {
        for ((v, mean), scale) in values.iter_mut().zip(&self.mean).zip(&self.scale) {
            *v = (*v - mean) / scale;
        }
    }
}

// ============================================================================
// MODEL ARTIFACT
// ============================================================================

pub const RANDOM_FOREST: &str = "random_forest";

/// Serialized classifier as exported from the training notebooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub n_features: usize,
    /// Index of the "disease present" class in leaf values
    #[serde(default = "default_positive_class")]
    pub positive_class: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
    /// Training-set means of selected raw fields, for comparisons
    #[serde(default)]
    pub population_means: BTreeMap<String, f64>,
    pub trees: Vec<DecisionTree>,
}

fn default_positive_class() -> usize {
    1
}

impl ModelArtifact {
    pub fn validate(&self) -> CardioResult<()> {
        if self.model_type != RANDOM_FOREST {
            return Err(CardioError::startup(format!("unsupported model type '{}'", self.model_type)));
        }
        if self.n_features == 0 {
            return Err(CardioError::startup("model declares zero features"));
        }
        if self.trees.is_empty() {
            return Err(CardioError::startup("model has no trees"));
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != self.n_features || scaler.scale.len() != self.n_features {
                return Err(CardioError::startup(format!(
                    "scaler has {} means / {} scales for {} features",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    self.n_features
                )));
            }
            if scaler.scale.iter().any(|s| !s.is_finite() || *s <= 0.0)
                || scaler.mean.iter().any(|m| !m.is_finite())
            {
                return Err(CardioError::startup("scaler contains invalid values"));
            }
        }

        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.positive_class)
                .map_err(|e| CardioError::startup(format!("tree {}: {}", t, e)))?;
        }

        Ok(())
    }

    pub(crate) fn check_shape(&self, x: &[f64]) -> CardioResult<()> {
        if x.len() != self.n_features {
            return Err(CardioError::SchemaMismatch {
                expected: self.n_features,
                actual: x.len(),
                detail: "feature vector length differs from the model input".to_string(),
            });
        }
        Ok(())
    }

    /// Positive-class probability for an encoded, scaled vector
    pub fn predict_proba(&self, x: &[f64]) -> CardioResult<f64> {
        self.check_shape(x)?;

        let sum: f64 = self.trees.iter().map(|t| t.predict(x, self.positive_class)).sum();
        Ok((sum / self.trees.len() as f64).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split { feature, threshold, left: 1, right: 2, cover: left[0] + left[1] + right[0] + right[1] },
                TreeNode::Leaf { value: left.to_vec(), cover: left[0] + left[1] },
                TreeNode::Leaf { value: right.to_vec(), cover: right[0] + right[1] },
            ],
        }
    }

    fn model(trees: Vec<DecisionTree>) -> ModelArtifact {
        ModelArtifact {
            model_type: RANDOM_FOREST.to_string(),
            n_features: 2,
            positive_class: 1,
            scaler: None,
            population_means: BTreeMap::new(),
            trees,
        }
    }

    #[test]
    fn test_split_goes_left_on_equal() {
        let tree = stump(0, 1.0, [3.0, 1.0], [1.0, 3.0]);
        assert_eq!(tree.predict(&[1.0, 0.0], 1), 0.25);
        assert_eq!(tree.predict(&[1.5, 0.0], 1), 0.75);
    }

    #[test]
    fn test_forest_averages_trees() {
        let m = model(vec![
            stump(0, 1.0, [3.0, 1.0], [1.0, 3.0]),
            stump(1, 0.0, [1.0, 1.0], [0.0, 4.0]),
        ]);
        m.validate().unwrap();

        let p = m.predict_proba(&[2.0, 1.0]).unwrap();
        assert!((p - (0.75 + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_length_is_schema_mismatch() {
        let m = model(vec![stump(0, 1.0, [3.0, 1.0], [1.0, 3.0])]);
        assert!(matches!(
            m.predict_proba(&[1.0]),
            Err(CardioError::SchemaMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_structure() {
        let mut bad_child = stump(0, 1.0, [3.0, 1.0], [1.0, 3.0]);
        if let TreeNode::Split { right, .. } = &mut bad_child.nodes[0] {
            *right = 0;
        }
        assert!(matches!(model(vec![bad_child]).validate(), Err(CardioError::Startup(_))));

        let bad_feature = stump(7, 1.0, [3.0, 1.0], [1.0, 3.0]);
        assert!(model(vec![bad_feature]).validate().is_err());

        let empty_leaf = stump(0, 1.0, [0.0, 0.0], [1.0, 3.0]);
        assert!(model(vec![empty_leaf]).validate().is_err());

        assert!(model(vec![]).validate().is_err());

        let mut wrong_type = model(vec![stump(0, 1.0, [3.0, 1.0], [1.0, 3.0])]);
        wrong_type.model_type = "svm".to_string();
        assert!(wrong_type.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scaler() {
        let mut m = model(vec![stump(0, 1.0, [3.0, 1.0], [1.0, 3.0])]);
        m.scaler = Some(Scaler { mean: vec![0.0], scale: vec![1.0] });
        assert!(m.validate().is_err());

        m.scaler = Some(Scaler { mean: vec![0.0, 0.0], scale: vec![1.0, 0.0] });
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_scaler_transform() {
        let scaler = Scaler { mean: vec![10.0, 0.0], scale: vec![2.0, 1.0] };
        let mut x = [14.0, 1.0];
        scaler.transform(&mut x);
        assert_eq!(x, [2.0, 1.0]);
    }
}
