//! Delaycast Model
//!
//! Everything needed to turn model bytes into something that predicts.
//!
//! - [`artifact`]: the JSON model artifact (feature encoders + estimator)
//! - [`frame`]: named-column tables fed to a model
//! - [`predictor`]: the `Predictor` capability every loaded model exposes
//! - [`codec`]: text-safe encoding of artifacts for the record store

pub mod artifact;
pub mod codec;
pub mod estimator;
pub mod frame;
pub mod predictor;

pub use artifact::{FeatureSpec, ModelArtifact};
pub use codec::{decode_artifact, decode_payload, encode_artifact, EncodedModel};
pub use estimator::{Estimator, TreeNode};
pub use frame::{Cell, Frame};
pub use predictor::{LoadedModel, Predictor};
