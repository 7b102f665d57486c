//! Shared data types for application screening.

pub mod prediction;
pub mod record;

pub use prediction::Prediction;
pub use record::ApplicationRecord;
