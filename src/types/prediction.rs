//! Prediction labels attached to scored rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of scoring one application row.
///
/// The classifier emits `1` for fraud and `0` for genuine; there are no
/// other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prediction {
    Fraud,
    Genuine,
}

impl Prediction {
    /// Map a raw classifier label to a prediction. Any non-zero label
    /// counts as fraud.
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Prediction::Fraud
        } else {
            Prediction::Genuine
        }
    }

    /// Display string used in the appended `Prediction` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Fraud => "FRAUD",
            Prediction::Genuine => "GENUINE",
        }
    }

    pub fn is_fraud(&self) -> bool {
        matches!(self, Prediction::Fraud)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
