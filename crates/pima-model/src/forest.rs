//! Decision trees and majority-vote forests over flat node arrays.

use std::collections::BTreeMap;

use pima_core::{FeatureVector, PredictError, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// One node of a tree. Node `0` is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DecisionTree {
    pub(crate) nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {tree} has no nodes")));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            let TreeNode::Split { feature, threshold, left, right } = *node else {
                continue;
            };
            let invalid = |msg: String| ModelError::Invalid(format!("tree {tree} node {idx}: {msg}"));
            if feature >= FEATURE_COUNT {
                return Err(invalid(format!("feature index {feature} out of range")));
            }
            if !threshold.is_finite() {
                return Err(invalid("threshold must be finite".into()));
            }
            // children after their parent means every walk terminates
            for child in [left, right] {
                if child <= idx || child >= self.nodes.len() {
                    return Err(invalid(format!("child index {child} out of order or bounds")));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
        let values = features.values();
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { class }) => return Ok(*class),
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let x = values.get(*feature).ok_or_else(|| {
                        PredictError::Inference(format!("split on unknown feature {feature}"))
                    })?;
                    idx = if x <= threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictError::Inference(format!("tree node {idx} does not exist")))
                }
            }
        }
    }
}

/// Majority vote over one or more trees. Ties go to the lower class value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DecisionForest {
    pub(crate) trees: Vec<DecisionTree>,
}

impl DecisionForest {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".into()));
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(i, tree)| tree.validate(i))
    }

    pub(crate) fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict(features)?).or_default() += 1;
        }

        let mut winner: Option<(i64, usize)> = None;
        for (class, count) in votes {
            if winner.map_or(true, |(_, best)| count > best) {
                winner = Some((class, count));
            }
        }
        winner
            .map(|(class, _)| class)
            .ok_or_else(|| PredictError::Inference("forest produced no votes".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glucose_stump(threshold: f64) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 1, threshold, left: 1, right: 2 },
                TreeNode::Leaf { class: 0 },
                TreeNode::Leaf { class: 1 },
            ],
        }
    }

    fn with_glucose(glucose: f64) -> FeatureVector {
        FeatureVector::new([0.0, glucose, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_tree_split_goes_left_on_equal() {
        let tree = glucose_stump(127.5);
        assert_eq!(tree.predict(&with_glucose(127.5)).unwrap(), 0);
        assert_eq!(tree.predict(&with_glucose(128.0)).unwrap(), 1);
    }

    #[test]
    fn test_forest_majority_vote() {
        let forest = DecisionForest {
            trees: vec![glucose_stump(100.0), glucose_stump(120.0), glucose_stump(160.0)],
        };
        assert_eq!(forest.predict(&with_glucose(90.0)).unwrap(), 0);
        assert_eq!(forest.predict(&with_glucose(130.0)).unwrap(), 1);
        assert_eq!(forest.predict(&with_glucose(170.0)).unwrap(), 1);
    }

    #[test]
    fn test_forest_tie_goes_to_lower_class() {
        let forest = DecisionForest {
            trees: vec![glucose_stump(100.0), glucose_stump(160.0)],
        };
        assert_eq!(forest.predict(&with_glucose(130.0)).unwrap(), 0);
    }

    #[test]
    fn test_nodes_deserialize_untagged() {
        let tree: DecisionTree = serde_json::from_str(
            r#"{"nodes": [
                {"feature": 5, "threshold": 30.0, "left": 1, "right": 2},
                {"class": 0},
                {"class": 1}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(tree.nodes[0], TreeNode::Split { feature: 5, .. }));
        assert!(matches!(tree.nodes[2], TreeNode::Leaf { class: 1 }));
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 0, threshold: 1.0, left: 1, right: 0 },
                TreeNode::Leaf { class: 0 },
            ],
        };
        assert!(tree.validate(0).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_feature_and_empty() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 8, threshold: 1.0, left: 1, right: 2 },
                TreeNode::Leaf { class: 0 },
                TreeNode::Leaf { class: 1 },
            ],
        };
        assert!(tree.validate(0).is_err());
        assert!(DecisionTree { nodes: vec![] }.validate(0).is_err());
        assert!(DecisionForest { trees: vec![] }.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_child_past_end() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 1, threshold: 120.0, left: 1, right: 3 },
                TreeNode::Leaf { class: 0 },
                TreeNode::Leaf { class: 1 },
            ],
        };
        let err = tree.validate(0).unwrap_err();
        assert!(err.to_string().contains("child index 3"));
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        for threshold in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let tree = glucose_stump(threshold);
            let err = tree.validate(0).unwrap_err();
            assert!(err.to_string().contains("threshold must be finite"));
        }
        assert!(glucose_stump(127.5).validate(0).is_ok());
    }
}
