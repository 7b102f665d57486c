//! Per-run screening summary.

use crate::features::PipelineMode;
use crate::types::Prediction;
use std::time::Duration;
use tracing::info;

/// Counts and timing for one screened upload.
#[derive(Debug, Clone)]
pub struct ScreeningSummary {
    pub mode: PipelineMode,
    pub rows_scored: usize,
    pub fraud_count: usize,
    pub genuine_count: usize,
    pub elapsed: Duration,
}

impl ScreeningSummary {
    /// Summarize a completed run.
    pub fn from_predictions(
        mode: PipelineMode,
        predictions: &[Prediction],
        elapsed: Duration,
    ) -> Self {
        let fraud_count = predictions.iter().filter(|p| p.is_fraud()).count();
        Self {
            mode,
            rows_scored: predictions.len(),
            fraud_count,
            genuine_count: predictions.len() - fraud_count,
            elapsed,
        }
    }

    /// Fraction of rows flagged fraudulent.
    pub fn fraud_rate(&self) -> f64 {
        if self.rows_scored == 0 {
            0.0
        } else {
            self.fraud_count as f64 / self.rows_scored as f64
        }
    }

    /// Log the summary after a successful run.
    pub fn log(&self) {
        info!(
            mode = self.mode.as_str(),
            rows = self.rows_scored,
            fraud = self.fraud_count,
            genuine = self.genuine_count,
            fraud_rate = format!("{:.1}%", self.fraud_rate() * 100.0),
            elapsed_ms = self.elapsed.as_millis() as u64,
            "Screening complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let predictions = vec![
            Prediction::Fraud,
            Prediction::Genuine,
            Prediction::Genuine,
            Prediction::Fraud,
        ];
        let summary = ScreeningSummary::from_predictions(
            PipelineMode::Full,
            &predictions,
            Duration::from_millis(12),
        );

        assert_eq!(summary.rows_scored, 4);
        assert_eq!(summary.fraud_count, 2);
        assert_eq!(summary.genuine_count, 2);
        assert!((summary.fraud_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_run_has_zero_rate() {
        let summary =
            ScreeningSummary::from_predictions(PipelineMode::Raw, &[], Duration::ZERO);
        assert_eq!(summary.fraud_rate(), 0.0);
    }
}
