//! Model artifact format
//!
//! An artifact is a JSON document describing how to encode input columns
//! into a numeric vector and the estimator evaluated on that vector:
//!
//! ```json
//! {
//!   "name": "flight-delay-logreg",
//!   "version": "1.0.0",
//!   "features": [
//!     {"column": "dep_delay", "kind": "numeric", "mean": 12.0, "scale": 40.0},
//!     {"column": "carrier", "kind": "categorical", "categories": ["AA", "UA"]}
//!   ],
//!   "estimator": {"type": "logistic_regression", "coefficients": [1.2, 0.1, -0.1], "intercept": -0.8}
//! }
//! ```

use crate::estimator::Estimator;
use crate::frame::{Cell, Frame};
use delaycast_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How one input column is encoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// Standardized to `(x - mean) / scale`
    Numeric {
        column: String,
        #[serde(default)]
        mean: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
    },

    /// One-hot over known categories; unknown values encode as all zeros
    Categorical {
        column: String,
        categories: Vec<String>,
    },
}

fn unit_scale() -> f64 {
    1.0
}

impl FeatureSpec {
    /// Input column this feature reads
    pub fn column(&self) -> &str {
        match self {
            Self::Numeric { column, .. } | Self::Categorical { column, .. } => column,
        }
    }

    /// Number of encoded columns this feature produces
    pub fn width(&self) -> usize {
        match self {
            Self::Numeric { .. } => 1,
            Self::Categorical { categories, .. } => categories.len(),
        }
    }

    fn encode(&self, cell: &Cell, out: &mut Vec<f64>) -> Result<()> {
        match (self, cell) {
            (Self::Numeric { mean, scale, .. }, Cell::Number(x)) => {
                out.push((x - mean) / scale);
                Ok(())
            }
            (Self::Categorical { categories, .. }, Cell::Text(value)) => {
                out.extend(categories.iter().map(|c| if c == value { 1.0 } else { 0.0 }));
                Ok(())
            }
            (Self::Numeric { column, .. }, other) => Err(Error::validation(format!(
                "column '{}' must be numeric, got {}",
                column,
                other.type_name()
            ))),
            (Self::Categorical { column, .. }, other) => Err(Error::validation(format!(
                "column '{}' must be text, got {}",
                column,
                other.type_name()
            ))),
        }
    }
}

/// A complete, serializable model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub features: Vec<FeatureSpec>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Check internal consistency of encoders and estimator
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(Error::decode("model declares no features"));
        }

        let mut seen = HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.column()) {
                return Err(Error::decode(format!(
                    "column '{}' is declared more than once",
                    feature.column()
                )));
            }
            match feature {
                FeatureSpec::Numeric { column, mean, scale } => {
                    if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                        return Err(Error::decode(format!(
                            "column '{}' has an invalid mean/scale",
                            column
                        )));
                    }
                }
                FeatureSpec::Categorical { column, categories } => {
                    if categories.is_empty() {
                        return Err(Error::decode(format!(
                            "column '{}' declares no categories",
                            column
                        )));
                    }
                }
            }
        }

        self.estimator.validate(self.encoded_width())
    }

    /// Width of the encoded feature vector
    pub fn encoded_width(&self) -> usize {
        self.features.iter().map(FeatureSpec::width).sum()
    }

    /// Input columns the model reads, in declaration order
    pub fn input_columns(&self) -> Vec<&str> {
        self.features.iter().map(FeatureSpec::column).collect()
    }

    /// Encode every frame row into feature vectors
    pub fn encode(&self, frame: &Frame) -> Result<Vec<Vec<f64>>> {
        let positions = self
            .features
            .iter()
            .map(|f| {
                frame.column_index(f.column()).ok_or_else(|| {
                    Error::validation(format!("missing column '{}' required by model", f.column()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        frame
            .rows()
            .map(|row| {
                let mut encoded = Vec::with_capacity(self.encoded_width());
                for (feature, &pos) in self.features.iter().zip(&positions) {
                    feature.encode(&row[pos], &mut encoded)?;
                }
                Ok(encoded)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::TreeNode;
    use serde_json::json;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            name: "test".into(),
            version: "0.1.0".into(),
            description: None,
            features: vec![
                FeatureSpec::Numeric {
                    column: "dep_delay".into(),
                    mean: 10.0,
                    scale: 5.0,
                },
                FeatureSpec::Categorical {
                    column: "carrier".into(),
                    categories: vec!["AA".into(), "UA".into()],
                },
            ],
            estimator: Estimator::DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { class: 0 },
                    TreeNode::Leaf { class: 1 },
                ],
            },
        }
    }

    #[test]
    fn encodes_numeric_and_one_hot() {
        let model = artifact();
        model.validate().unwrap();
        assert_eq!(model.encoded_width(), 3);

        let frame = Frame::from_record(&json!({"dep_delay": 20.0, "carrier": "UA", "extra": "x"})).unwrap();
        assert_eq!(model.encode(&frame).unwrap(), vec![vec![2.0, 0.0, 1.0]]);

        let unknown = Frame::from_record(&json!({"dep_delay": 10.0, "carrier": "ZZ"})).unwrap();
        assert_eq!(model.encode(&unknown).unwrap(), vec![vec![0.0, 0.0, 0.0]]);
    }

    #[test]
    fn missing_or_mistyped_columns_are_validation_errors() {
        let model = artifact();

        let missing = Frame::from_record(&json!({"carrier": "UA"})).unwrap();
        let err = model.encode(&missing).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("dep_delay"));

        let mistyped = Frame::from_record(&json!({"dep_delay": "late", "carrier": "UA"})).unwrap();
        assert!(model.encode(&mistyped).unwrap_err().is_client_error());
    }

    #[test]
    fn validation_rejects_bad_artifacts() {
        let mut duplicate = artifact();
        duplicate.features.push(FeatureSpec::Numeric {
            column: "dep_delay".into(),
            mean: 0.0,
            scale: 1.0,
        });
        assert!(duplicate.validate().is_err());

        let mut zero_scale = artifact();
        zero_scale.features[0] = FeatureSpec::Numeric {
            column: "dep_delay".into(),
            mean: 0.0,
            scale: 0.0,
        };
        assert!(zero_scale.validate().is_err());

        let mut empty = artifact();
        empty.features.clear();
        assert!(matches!(empty.validate(), Err(Error::Decode(_))));
    }
}
