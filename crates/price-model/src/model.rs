//! Regression Models

use crate::PredictionError;
use serde::{Deserialize, Serialize};

/// Trained regressor, tagged by `kind` in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    /// Ordinary least squares style linear model
    Linear(LinearModel),
    /// Random forest of regression trees
    Forest(ForestModel),
}

impl Regressor {
    /// Predict a price from a schema-aligned feature vector
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let price = match self {
            Regressor::Linear(model) => model.predict(features)?,
            Regressor::Forest(model) => model.predict(features)?,
        };

        if price.is_finite() {
            Ok(price)
        } else {
            Err(PredictionError::NonFinite(price))
        }
    }

    /// Smallest feature vector the model can read
    pub fn min_features(&self) -> usize {
        match self {
            Regressor::Linear(model) => model.coefficients.len(),
            Regressor::Forest(model) => model
                .trees
                .iter()
                .flat_map(|tree| tree.nodes.iter())
                .filter_map(|node| match node {
                    TreeNode::Split { feature, .. } => Some(feature.saturating_add(1)),
                    TreeNode::Leaf { .. } => None,
                })
                .max()
                .unwrap_or(0),
        }
    }

    /// Model family name
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::Linear(_) => "linear",
            Regressor::Forest(_) => "forest",
        }
    }
}

/// `intercept + Σ coefficients[i] * x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictionError::InvalidInputShape {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }
}

/// Mean of the member trees' predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<RegressionTree>,
}

impl ForestModel {
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        if self.trees.is_empty() {
            return Err(PredictionError::MalformedModel("forest has no trees".to_string()));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

/// Node of a regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flattened regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let mut idx = 0;

        // A well-formed path visits each node at most once
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or(PredictionError::InvalidInputShape {
                        expected: feature.saturating_add(1),
                        actual: features.len(),
                    })?;
                    idx = if *x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictionError::MalformedModel(format!(
                        "tree node {} does not exist",
                        idx
                    )))
                }
            }
        }

        Err(PredictionError::MalformedModel(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearModel {
            intercept: 1000.0,
            coefficients: vec![10.0, 2.0, 0.0],
        };
        assert_eq!(model.predict(&[5.0, 100.0, 7.0]).unwrap(), 1250.0);
    }

    #[test]
    fn test_linear_shape_mismatch() {
        let model = Regressor::Linear(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0, 2.0],
        });
        assert_eq!(
            model.predict(&[1.0, 2.0, 3.0]).unwrap_err(),
            PredictionError::InvalidInputShape {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = Regressor::Forest(ForestModel {
            trees: vec![stump(0, 100.0, 10_000.0, 20_000.0), stump(1, 0.5, 12_000.0, 30_000.0)],
        });

        assert_eq!(forest.predict(&[150.0, 0.0]).unwrap(), 16_000.0);
        assert_eq!(forest.predict(&[50.0, 1.0]).unwrap(), 20_000.0);
        assert_eq!(forest.min_features(), 2);
    }

    #[test]
    fn test_tree_rejects_short_vector() {
        let tree = stump(3, 1.0, 0.0, 1.0);
        assert!(matches!(
            tree.predict(&[0.0]),
            Err(PredictionError::InvalidInputShape { expected: 4, actual: 1 })
        ));
    }

    #[test]
    fn test_huge_feature_index_does_not_overflow() {
        let json = r#"{"kind": "forest", "trees": [{"nodes": [
            {"feature": 18446744073709551615, "threshold": 0.0, "left": 1, "right": 1},
            {"value": 1.0}
        ]}]}"#;
        let model: Regressor = serde_json::from_str(json).unwrap();
        assert_eq!(model.min_features(), usize::MAX);
        assert!(matches!(
            model.predict(&[0.0]),
            Err(PredictionError::InvalidInputShape { expected: usize::MAX, actual: 1 })
        ));
    }

    #[test]
    fn test_tree_rejects_cycles_and_dangling_nodes() {
        let cyclic = RegressionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(matches!(
            cyclic.predict(&[0.0]),
            Err(PredictionError::MalformedModel(_))
        ));

        let dangling = stump(0, 1.0, 0.0, 1.0);
        let dangling = RegressionTree {
            nodes: dangling.nodes[..1].to_vec(),
        };
        assert!(matches!(
            dangling.predict(&[0.0]),
            Err(PredictionError::MalformedModel(_))
        ));
    }

    #[test]
    fn test_empty_forest_is_malformed() {
        let forest = Regressor::Forest(ForestModel { trees: vec![] });
        assert!(matches!(
            forest.predict(&[1.0]),
            Err(PredictionError::MalformedModel(_))
        ));
    }

    #[test]
    fn test_non_finite_prediction() {
        let model = Regressor::Linear(LinearModel {
            intercept: f64::INFINITY,
            coefficients: vec![1.0],
        });
        assert!(matches!(model.predict(&[1.0]), Err(PredictionError::NonFinite(_))));
    }

    #[test]
    fn test_deserialize_tagged_models() {
        let json = r#"{"kind": "forest", "trees": [{"nodes": [
            {"feature": 0, "threshold": 2.5, "left": 1, "right": 2},
            {"value": 1.0},
            {"value": 2.0}
        ]}]}"#;
        let model: Regressor = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "forest");
        assert_eq!(model.predict(&[3.0]).unwrap(), 2.0);
    }
}
