//! ONNX classifier artifact loader.

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX classifier with discovered I/O names.
pub struct LoadedModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature matrix
    pub input_name: String,
    /// Output name for class probabilities (or labels, if the export has
    /// no probability output)
    pub output_name: String,
}

/// Loader for the classifier artifact.
pub struct ModelLoader {
    /// Number of intra-op threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a loader with default settings (1 thread).
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a loader with the given intra-op thread count.
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit();
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the classifier from an ONNX file.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = self.onnx_threads, "Loading classifier model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::<()>::from)?
            .with_intra_threads(self.onnx_threads)
            .map_err(ort::Error::<()>::from)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "float_input".to_string());

        // scikit-learn exports name the probability output "output_probability";
        // plain classifiers often just say "output". Fall back to the last
        // output, which is the label for single-output models.
        let output_name = session
            .outputs()
            .iter()
            .find(|o| o.name().contains("prob") || o.name().contains("output"))
            .map(|o| o.name().to_string())
            .unwrap_or_else(|| {
                session
                    .outputs()
                    .last()
                    .map(|o| o.name().to_string())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        info!(
            input = %input_name,
            output = %output_name,
            "Classifier model loaded"
        );

        Ok(LoadedModel {
            session,
            input_name,
            output_name,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}
