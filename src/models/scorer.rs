//! Fraud scoring over the trained classifier.
//!
//! The classifier is an opaque collaborator behind the `Classifier` trait:
//! feature rows in, one {0,1} label per row out, order preserved. The ONNX
//! implementation normalizes the output shapes scikit-learn exports produce
//! (label tensors, probability tensors, and ZipMap `seq(map)` outputs) to
//! labels using the configured decision threshold.

use crate::error::ScreenError;
use crate::features::FeatureMatrix;
use crate::models::loader::LoadedModel;
use crate::types::Prediction;
use anyhow::{Context, Result};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::RwLock;
use tracing::debug;

/// A pure row-labelling function: `1` means fraud.
pub trait Classifier {
    /// One label per input row, order-preserving.
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<u8>>;
}

/// Classifier backed by a loaded ONNX session.
pub struct OnnxClassifier {
    /// Session runs need a mutable handle; the lock keeps the public
    /// surface immutable.
    model: RwLock<LoadedModel>,
    /// Probability at or above which a row is labelled fraud.
    threshold: f64,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel, threshold: f64) -> Self {
        Self {
            model: RwLock::new(model),
            threshold,
        }
    }

    /// Run one feature row through the session and return the fraud
    /// probability (or a hard 0/1 for label-only exports).
    fn score_row(&self, features: &[f32]) -> Result<f64> {
        use ort::value::Tensor;

        let mut model = self
            .model
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let input_name = model.input_name.clone();
        let output_name = model.output_name.clone();

        let outputs = model.session.run(ort::inputs![&input_name => input_tensor])?;

        Self::extract_probability(&outputs, &output_name)
    }

    /// Extract the fraud probability from the session outputs.
    ///
    /// Tries the discovered output first, then falls back to scanning all
    /// outputs. Handles tensor outputs and the `seq(map(int64, float))`
    /// format ZipMap-wrapped scikit-learn exports emit.
    fn extract_probability(
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
    ) -> Result<f64> {
        if let Some(output) = outputs.get(output_name) {
            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return Ok(Self::fraud_prob_from_tensor(&shape, data));
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = Self::extract_from_sequence_map(output) {
                    return Ok(prob);
                }
            }
        }

        // Fallback: scan every output. A label tensor only counts when no
        // probability output exists at all.
        let mut label_fallback = None;
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
                    label_fallback = data.first().map(|&l| if l == 1 { 1.0 } else { 0.0 });
                }
                continue;
            }

            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return Ok(Self::fraud_prob_from_tensor(&shape, data));
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = Self::extract_from_sequence_map(&output) {
                    return Ok(prob);
                }
            }
        }

        label_fallback
            .ok_or_else(|| anyhow::anyhow!("No probability or label output in model outputs"))
    }

    /// Probability of class 1 from a `seq(map(int64, float))` output.
    fn extract_from_sequence_map(output: &ort::value::DynValue) -> Result<f64> {
        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>()?;

        if maps.is_empty() {
            return Err(anyhow::anyhow!("Empty sequence"));
        }

        // Batch size is 1 per run, so the first map is the row's class
        // probabilities.
        let kv_pairs = maps[0].try_extract_key_values::<i64, f32>()?;

        for (class_id, prob) in &kv_pairs {
            if *class_id == 1 {
                return Ok(*prob as f64);
            }
        }

        for (class_id, prob) in &kv_pairs {
            if *class_id == 0 {
                return Ok(1.0 - *prob as f64);
            }
        }

        Err(anyhow::anyhow!("No probability found in map"))
    }

    /// Fraud-class probability from tensor data of shape `[batch, classes]`,
    /// `[classes]`, or a single-value probability.
    fn fraud_prob_from_tensor(shape: &ort::value::Shape, data: &[f32]) -> f64 {
        let dims: Vec<i64> = shape.iter().copied().collect();

        if dims.len() == 2 {
            let num_classes = dims[1] as usize;
            if num_classes >= 2 {
                return data[1] as f64;
            } else if num_classes == 1 {
                return data[0] as f64;
            }
        } else if dims.len() == 1 {
            let num_classes = dims[0] as usize;
            if num_classes >= 2 {
                return data[1] as f64;
            } else if num_classes == 1 {
                return data[0] as f64;
            }
        }

        data.last().map(|&v| v as f64).unwrap_or(0.0)
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<u8>> {
        let mut labels = Vec::with_capacity(matrix.row_count());
        for (i, row) in matrix.rows().iter().enumerate() {
            let prob = self
                .score_row(row)
                .with_context(|| format!("inference failed on row {}", i + 1))?;
            let label = u8::from(prob >= self.threshold);
            debug!(row = i + 1, prob = prob, label = label, "Row scored");
            labels.push(label);
        }
        Ok(labels)
    }
}

/// Adapter from raw classifier labels to `Prediction` values.
pub struct FraudScorer {
    classifier: Box<dyn Classifier>,
}

impl FraudScorer {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Score a feature matrix: one prediction per input row, in input
    /// order, no side effects on the matrix.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<Prediction>> {
        let labels = self.classifier.predict(matrix)?;

        if labels.len() != matrix.row_count() {
            return Err(ScreenError::LabelCountMismatch {
                expected: matrix.row_count(),
                got: labels.len(),
            }
            .into());
        }

        Ok(labels.into_iter().map(Prediction::from_label).collect())
    }
}
