//! Scholarship Fraud Screener - Main Entry Point
//!
//! Loads the trained classifier and category encoders, reads an
//! application CSV, scores every row, and emits the table with a
//! `Prediction` column appended. The whole run is atomic: on any pipeline
//! error no annotated output is written.

use anyhow::{bail, Context, Result};
use scholarship_screener::{
    config::AppConfig,
    features::FeaturePipeline,
    models::{loader::ModelLoader, FraudScorer, OnnxClassifier},
    ocr,
    report::ScreeningSummary,
    table::ApplicationTable,
    EncoderSet,
};
use std::io::Write;
use std::time::Instant;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scholarship_screener=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Scholarship Fraud Screener");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let Some(input_path) = args.get(1) else {
        bail!(
            "usage: {} <applications.csv> [annotated-output.csv] [ocr-text.txt]",
            args.first().map(String::as_str).unwrap_or("scholarship-screener")
        );
    };
    let output_path = args.get(2);
    let ocr_text_path = args.get(3);

    // Load configuration
    let config = AppConfig::load_or_default()?;
    info!(
        mode = ?config.scoring.mode,
        threshold = config.scoring.threshold,
        "Configuration loaded"
    );

    // Load artifacts once; they stay immutable for the rest of the run.
    let encoders = EncoderSet::load(&config.artifacts.encoders_path)
        .context("failed to load category encoders")?;

    let loader = ModelLoader::with_threads(config.artifacts.onnx_threads)?;
    let model = loader
        .load_model(&config.artifacts.model_path)
        .context("failed to load classifier model")?;
    let scorer = FraudScorer::new(Box::new(OnnxClassifier::new(
        model,
        config.scoring.threshold,
    )));

    // Read the upload
    let table = ApplicationTable::from_path(input_path)?;
    info!(
        rows = table.row_count(),
        columns = table.headers().len(),
        path = %input_path,
        "Application table loaded"
    );

    let mode = config.scoring.mode.resolve(&table);
    info!(mode = mode.as_str(), "Pipeline mode resolved");

    // Transform and score
    let start = Instant::now();
    let pipeline = FeaturePipeline::new();
    let matrix = pipeline
        .transform(&table, &encoders, mode)
        .context("feature transformation failed")?;
    let predictions = scorer.predict(&matrix).context("scoring failed")?;
    let elapsed = start.elapsed();

    // Annotate and emit only after the full batch scored cleanly.
    let labels: Vec<String> = predictions.iter().map(|p| p.to_string()).collect();
    let annotated = table.with_column("Prediction", &labels);

    match output_path {
        Some(path) => {
            annotated.write_csv_path(path)?;
            info!(path = %path, "Annotated table written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            annotated.write_csv(&mut handle)?;
            handle.flush().context("failed to flush stdout")?;
        }
    }

    // OCR side channel: report the extracted amount, never feed it into
    // scoring.
    if let Some(path) = ocr_text_path {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read OCR text from {path}"))?;
        match ocr::extract_income_amount(&text) {
            Some(amount) => info!(
                amount = amount,
                "Income amount extracted from document (display only, not used in scoring)"
            ),
            None => warn!("Could not detect an income amount in the document text"),
        }
    }

    ScreeningSummary::from_predictions(mode, &predictions, elapsed).log();

    Ok(())
}
