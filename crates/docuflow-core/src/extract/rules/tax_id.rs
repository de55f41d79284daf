//! Thai tax identification number (เลขประจำตัวผู้เสียภาษี) extraction and validation.

use regex::Regex;

use super::patterns::TAX_ID_PATTERN;
use super::{FieldExtractor, captures};

/// Labelled 13-digit tax IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxIdExtractor;

impl FieldExtractor for TaxIdExtractor {
    type Output = Vec<String>;

    fn patterns(&self) -> &[Regex] {
        std::slice::from_ref(&*TAX_ID_PATTERN)
    }

    /// All occurrences in order of appearance; duplicates are kept.
    fn extract(&self, text: &str) -> Vec<String> {
        captures(&TAX_ID_PATTERN, text)
    }
}

/// Extract tax IDs from text.
pub fn extract_tax_ids(text: &str) -> Vec<String> {
    TaxIdExtractor.extract(text)
}

/// Validate a 13-digit Thai tax ID using its mod-11 check digit.
///
/// Weights 13 down to 2 over the first 12 digits; the check digit is
/// `(11 - sum % 11) % 10`.
pub fn validate_tax_id(tax_id: &str) -> bool {
    let digits: Vec<u32> = tax_id
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    if digits.len() != 13 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .take(12)
        .zip((2..=13).rev())
        .map(|(d, w)| d * w)
        .sum();

    (11 - sum % 11) % 10 == digits[12]
}
