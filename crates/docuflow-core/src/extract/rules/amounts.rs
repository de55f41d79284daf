//! Amount extraction.
//!
//! Three tiers, most constrained first. Matches from every tier are kept, so
//! one figure can appear more than once (e.g. "500.00" from tiers 1 and 2).

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use super::patterns::AMOUNT_PATTERNS;
use super::{FieldExtractor, union_in_order};

/// Monetary amounts, not de-duplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountExtractor;

impl FieldExtractor for AmountExtractor {
    type Output = Vec<String>;

    fn patterns(&self) -> &[Regex] {
        &AMOUNT_PATTERNS
    }

    fn extract(&self, text: &str) -> Vec<String> {
        union_in_order(self.patterns(), text)
    }
}

/// Extract amounts from text.
pub fn extract_amounts(text: &str) -> Vec<String> {
    AmountExtractor.extract(text)
}

/// Parse an extracted amount such as "1,234.56".
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{00a0}'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
