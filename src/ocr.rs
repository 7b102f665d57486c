//! Income extraction from OCR text.
//!
//! The screener does not run OCR itself; it accepts text already extracted
//! from an income-certificate document and scans it for a currency amount.
//! The amount is reported to the user for manual comparison against the
//! uploaded table. It is deliberately not fed into scoring: whether it
//! should override `Actual_Income` or `Income_Certificate_Amount` is an
//! open question, so the seam stays display-only.

use once_cell::sync::Lazy;
use regex::Regex;

/// First run of 2 to 15 digits, optionally preceded by a currency marker.
/// Commas are stripped before matching, so "45,000" reads as one number.
static INCOME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:₹|Rs\.?)?\s*([0-9]{2,15})").expect("income pattern compiles"));

/// Scan OCR-extracted text for an income amount.
pub fn extract_income_amount(text: &str) -> Option<u64> {
    let cleaned = text.replace(',', "");
    INCOME_PATTERN
        .captures(&cleaned)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
