//! TreeSHAP - exact additive attributions for the forest
//!
//! Path-dependent TreeSHAP (Lundberg et al., 2018): for every tree the
//! algorithm walks all root-to-leaf paths once, tracking for each feature on
//! the path the fraction of "feature unknown" (cover-weighted) and "feature
//! known" (follows `x`) flow. The result satisfies
//! `expected_value + Σφ == f(x)` exactly, where `expected_value` is the
//! cover-weighted mean leaf value.
//!
//! Column attributions are summed back onto schema fields, so the one-hot
//! columns of `chest_pain_type` report as a single `chest_pain_type` entry.

use super::types::{Direction, Explanation, FeatureContribution};
use crate::logic::error::{CardioError, CardioResult};
use crate::logic::features::{FeatureRecord, FIELD_COUNT, SCHEMA};
use crate::logic::model::{DecisionTree, ModelArtifact, RiskEngine, TreeNode};

// ============================================================================
// PATH BOOKKEEPING
// ============================================================================

/// Placeholder feature of the root path element
const NO_FEATURE: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct PathElement {
    feature: usize,
    zero_fraction: f64,
    one_fraction: f64,
    weight: f64,
}

/// Grow the path by one split, updating the permutation weights
fn extend(path: &mut Vec<PathElement>, zero_fraction: f64, one_fraction: f64, feature: usize) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        weight: if depth == 0 { 1.0 } else { 0.0 },
    });

    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].weight += one_fraction * path[i].weight * (i + 1) as f64 / denom;
        path[i].weight = zero_fraction * path[i].weight * (depth - i) as f64 / denom;
    }
}

/// Undo `extend` for the element at `index`
fn unwind(path: &mut Vec<PathElement>, index: usize) {
    let len = path.len();
    let one = path[index].one_fraction;
    let zero = path[index].zero_fraction;
    let l = len as f64;
    let mut next = path[len - 1].weight;

    for j in (0..len - 1).rev() {
        if one != 0.0 {
            let tmp = path[j].weight;
            path[j].weight = next * l / ((j + 1) as f64 * one);
            next = tmp - path[j].weight * zero * (len - j - 1) as f64 / l;
        } else {
            path[j].weight = path[j].weight * l / (zero * (len - j - 1) as f64);
        }
    }

    for j in index..len - 1 {
        path[j].feature = path[j + 1].feature;
        path[j].zero_fraction = path[j + 1].zero_fraction;
        path[j].one_fraction = path[j + 1].one_fraction;
    }
    path.pop();
}

fn unwound_sum(path: &[PathElement], index: usize) -> f64 {
    let mut scratch = path.to_vec();
    unwind(&mut scratch, index);
    scratch.iter().map(|e| e.weight).sum()
}

// ============================================================================
// PER-TREE RECURSION
// ============================================================================

struct TreeWalk<'a> {
    tree: &'a DecisionTree,
    x: &'a [f64],
    positive_class: usize,
    phi: &'a mut [f64],
}

impl TreeWalk<'_> {
    fn recurse(&mut self, node: usize, mut path: Vec<PathElement>, zero: f64, one: f64, feature: usize) {
        extend(&mut path, zero, one, feature);

        // Copy the shared references out so recursion can borrow `self` mutably
        let tree = self.tree;
        let x = self.x;

        match &tree.nodes[node] {
            TreeNode::Leaf { .. } => {
                let value = tree.leaf_probability(node, self.positive_class);
                for i in 1..path.len() {
                    let w = unwound_sum(&path, i);
                    let el = path[i];
                    self.phi[el.feature] += w * (el.one_fraction - el.zero_fraction) * value;
                }
            }
            TreeNode::Split { feature: split, threshold, left, right, cover } => {
                let (hot, cold) = if x[*split] <= *threshold { (*left, *right) } else { (*right, *left) };

                let mut incoming_zero = 1.0;
                let mut incoming_one = 1.0;
                // A feature split on twice along the path keeps one element
                if let Some(k) = path.iter().skip(1).position(|e| e.feature == *split).map(|p| p + 1) {
                    incoming_zero = path[k].zero_fraction;
                    incoming_one = path[k].one_fraction;
                    unwind(&mut path, k);
                }

                let hot_zero = incoming_zero * tree.nodes[hot].cover() / cover;
                let cold_zero = incoming_zero * tree.nodes[cold].cover() / cover;

                // Branches with no flow either way contribute nothing
                if hot_zero != 0.0 || incoming_one != 0.0 {
                    self.recurse(hot, path.clone(), hot_zero, incoming_one, *split);
                }
                if cold_zero != 0.0 {
                    self.recurse(cold, path, cold_zero, 0.0, *split);
                }
            }
        }
    }
}

/// Cover-weighted mean leaf value below `node`
fn expected_value(tree: &DecisionTree, node: usize, positive_class: usize) -> f64 {
    match &tree.nodes[node] {
        TreeNode::Leaf { .. } => tree.leaf_probability(node, positive_class),
        TreeNode::Split { left, right, cover, .. } => {
            let l = tree.nodes[*left].cover() * expected_value(tree, *left, positive_class);
            let r = tree.nodes[*right].cover() * expected_value(tree, *right, positive_class);
            (l + r) / cover
        }
    }
}

/// Column-level SHAP values and expected value for one encoded, scaled vector
pub fn tree_shap(model: &ModelArtifact, x: &[f64]) -> CardioResult<(Vec<f64>, f64)> {
    model.check_shape(x)?;

    let mut phi = vec![0.0; model.n_features];
    let mut expected = 0.0;

    for tree in &model.trees {
        let mut walk = TreeWalk {
            tree,
            x,
            positive_class: model.positive_class,
            phi: &mut phi,
        };
        walk.recurse(0, Vec::with_capacity(16), 1.0, 1.0, NO_FEATURE);
        expected += expected_value(tree, 0, model.positive_class);
    }

    let n_trees = model.trees.len() as f64;
    for v in &mut phi {
        *v /= n_trees;
    }

    Ok((phi, expected / n_trees))
}

// ============================================================================
// ENGINE INTEGRATION
// ============================================================================

impl RiskEngine {
    /// Explain the prediction for `record`
    pub fn explain(&self, record: &FeatureRecord) -> CardioResult<Explanation> {
        if !self.config().explain_enabled {
            return Err(CardioError::ExplainDisabled);
        }

        let vector = self.encode(record)?;
        let model = self.artifacts().model();

        let (column_phi, expected_value) = tree_shap(model, vector.as_slice())?;
        let prediction = model.predict_proba(vector.as_slice())?;

        let mut field_phi = [0.0f64; FIELD_COUNT];
        for (phi, owner) in column_phi.iter().zip(self.artifacts().columns().owners()) {
            let owner = owner.ok_or_else(|| CardioError::SchemaMismatch {
                expected: column_phi.len(),
                actual: column_phi.len(),
                detail: "column without an owning schema field".to_string(),
            })?;
            field_phi[owner] += phi;
        }

        let mut contributions: Vec<FeatureContribution> = SCHEMA
            .iter()
            .zip(field_phi.iter())
            .map(|(spec, &value)| FeatureContribution {
                feature: spec.name.to_string(),
                label: spec.label.to_string(),
                value,
                direction: Direction::of(value),
            })
            .collect();

        // Stable: ties keep schema order
        contributions.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));

        Ok(Explanation {
            expected_value,
            prediction,
            contributions,
        })
    }
}
