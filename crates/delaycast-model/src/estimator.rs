//! Estimators evaluated over encoded feature vectors

use delaycast_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A fitted binary classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    /// Linear model passed through a sigmoid
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },

    /// Binary decision tree stored as a flat node list, root at index 0
    DecisionTree { nodes: Vec<TreeNode> },
}

/// A decision tree node
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
        class: u32,
    },
}

fn default_threshold() -> f64 {
    0.5
}

impl Estimator {
    /// Check the estimator against the width of the encoded feature vector
    pub fn validate(&self, width: usize) -> Result<()> {
        match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
                threshold,
            } => {
                if coefficients.len() != width {
                    return Err(Error::decode(format!(
                        "logistic regression has {} coefficients but features encode to {} columns",
                        coefficients.len(),
                        width
                    )));
                }
                if !coefficients.iter().chain(Some(intercept)).all(|c| c.is_finite()) {
                    return Err(Error::decode("logistic regression weights must be finite"));
                }
                if !(*threshold > 0.0 && *threshold <= 1.0) {
                    return Err(Error::decode(format!(
                        "decision threshold {} outside (0, 1]",
                        threshold
                    )));
                }
                Ok(())
            }
            Self::DecisionTree { nodes } => {
                if nodes.is_empty() {
                    return Err(Error::decode("decision tree has no nodes"));
                }
                for (idx, node) in nodes.iter().enumerate() {
                    if let TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } = node
                    {
                        if *feature >= width {
                            return Err(Error::decode(format!(
                                "node {} splits on column {} but features encode to {} columns",
                                idx, feature, width
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(Error::decode(format!("node {} has a non-finite threshold", idx)));
                        }
                        // Children must come after their parent, which also rules out cycles.
                        for child in [left, right] {
                            if *child <= idx || *child >= nodes.len() {
                                return Err(Error::decode(format!(
                                    "node {} points to invalid child {}",
                                    idx, child
                                )));
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Predict the class index of one encoded row
    pub fn predict_class(&self, x: &[f64]) -> u32 {
        match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
                threshold,
            } => {
                let z = coefficients
                    .iter()
                    .zip(x)
                    .fold(*intercept, |acc, (w, v)| acc + w * v);
                let probability = 1.0 / (1.0 + (-z).exp());
                u32::from(probability >= *threshold)
            }
            Self::DecisionTree { nodes } => {
                let mut idx = 0;
                loop {
                    match &nodes[idx] {
                        TreeNode::Leaf { class } => return *class,
                        TreeNode::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            idx = if x[*feature] <= *threshold { *left } else { *right };
                        }
                    }
                }
            }
        }
    }

    /// Short estimator name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression { .. } => "logistic_regression",
            Self::DecisionTree { .. } => "decision_tree",
        }
    }
}
