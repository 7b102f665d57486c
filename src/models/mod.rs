//! Classifier artifact loading and scoring.

pub mod loader;
pub mod scorer;

pub use loader::{LoadedModel, ModelLoader};
pub use scorer::{Classifier, FraudScorer, OnnxClassifier};
