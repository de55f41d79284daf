//! Phone number extraction.

use std::collections::BTreeSet;

use regex::Regex;

use super::patterns::PHONE_PATTERNS;
use super::{FieldExtractor, union_in_order};

/// Labelled and unlabelled phone numbers, de-duplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneExtractor;

impl FieldExtractor for PhoneExtractor {
    type Output = BTreeSet<String>;

    fn patterns(&self) -> &[Regex] {
        &PHONE_PATTERNS
    }

    fn extract(&self, text: &str) -> BTreeSet<String> {
        union_in_order(self.patterns(), text).into_iter().collect()
    }
}

/// Extract phone numbers from text.
pub fn extract_phone_numbers(text: &str) -> BTreeSet<String> {
    PhoneExtractor.extract(text)
}
