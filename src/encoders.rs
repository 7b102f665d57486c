//! Pre-built category encoders.
//!
//! The encoder artifact is a JSON object mapping each categorical column to
//! its ordered class list; a category's code is its position in that list
//! (the serialized form of a fitted label encoder's class array). Encoders
//! are loaded once per session and never change afterwards.

use crate::error::ScreenError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Bidirectional label ↔ code mapping for one categorical column.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    column: String,
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl CategoryEncoder {
    /// Build an encoder from an ordered class list.
    pub fn new(column: &str, classes: Vec<String>) -> Self {
        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code as i64))
            .collect();
        Self {
            column: column.to_string(),
            classes,
            codes,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Code for a category label. Unknown labels are a hard error, never a
    /// default code: a silent default would score unseen categories as
    /// whatever class happens to sit at that position.
    pub fn encode(&self, value: &str) -> Result<i64, ScreenError> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| ScreenError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// Label for a code, if the code is in range.
    pub fn label_for(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.classes.len()
    }
}

/// All per-column encoders for one scoring session.
#[derive(Debug, Clone)]
pub struct EncoderSet {
    encoders: HashMap<String, CategoryEncoder>,
}

impl EncoderSet {
    pub fn new(encoders: Vec<CategoryEncoder>) -> Self {
        Self {
            encoders: encoders
                .into_iter()
                .map(|e| (e.column().to_string(), e))
                .collect(),
        }
    }

    /// Load the encoder artifact from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open encoder artifact {}", path.display()))?;

        let classes_by_column: HashMap<String, Vec<String>> = serde_json::from_reader(file)
            .with_context(|| format!("failed to parse encoder artifact {}", path.display()))?;

        let encoders: Vec<CategoryEncoder> = classes_by_column
            .into_iter()
            .map(|(column, classes)| CategoryEncoder::new(&column, classes))
            .collect();

        info!(
            path = %path.display(),
            columns = encoders.len(),
            "Category encoders loaded"
        );

        Ok(Self::new(encoders))
    }

    /// Encoder for a column the pipeline must encode.
    pub fn for_column(&self, column: &str) -> Result<&CategoryEncoder, ScreenError> {
        self.encoders
            .get(column)
            .ok_or_else(|| ScreenError::MissingEncoder {
                column: column.to_string(),
            })
    }

    /// Encode one value of one column.
    pub fn encode(&self, column: &str, value: &str) -> Result<i64, ScreenError> {
        self.for_column(column)?.encode(value)
    }

    pub fn column_count(&self) -> usize {
        self.encoders.len()
    }
}
