//! Scholarship Application Fraud Screener
//!
//! Transforms an uploaded CSV of scholarship applications into a
//! model-ready feature matrix, scores each row with a pre-trained ONNX
//! classifier, and annotates the table with FRAUD / GENUINE labels.

pub mod config;
pub mod encoders;
pub mod error;
pub mod features;
pub mod models;
pub mod ocr;
pub mod report;
pub mod table;
pub mod types;

pub use config::AppConfig;
pub use encoders::{CategoryEncoder, EncoderSet};
pub use error::ScreenError;
pub use features::{FeatureMatrix, FeaturePipeline, FeatureVector, PipelineMode};
pub use models::{Classifier, FraudScorer, OnnxClassifier};
pub use report::ScreeningSummary;
pub use table::ApplicationTable;
pub use types::{ApplicationRecord, Prediction};
