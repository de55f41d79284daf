//! Address extraction keyed on locality markers.

use regex::Regex;

use super::patterns::ADDRESS_PATTERNS;
use super::{FieldExtractor, union_in_order};

/// Address lines, not de-duplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressExtractor;

impl FieldExtractor for AddressExtractor {
    type Output = Vec<String>;

    fn patterns(&self) -> &[Regex] {
        &ADDRESS_PATTERNS
    }

    fn extract(&self, text: &str) -> Vec<String> {
        union_in_order(self.patterns(), text)
    }
}

/// Extract addresses from text.
pub fn extract_addresses(text: &str) -> Vec<String> {
    AddressExtractor.extract(text)
}
