//! Rule-based field extractors for Thai business documents.

pub mod addresses;
pub mod amounts;
pub mod company;
pub mod dates;
pub mod patterns;
pub mod phones;
pub mod tax_id;

pub use addresses::{AddressExtractor, extract_addresses};
pub use amounts::{AmountExtractor, extract_amounts, parse_amount};
pub use company::{CompanyNameExtractor, extract_company_name};
pub use dates::{DateExtractor, extract_dates};
pub use phones::{PhoneExtractor, extract_phone_numbers};
pub use tax_id::{TaxIdExtractor, extract_tax_ids, validate_tax_id};

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Candidate patterns, most specific first.
    fn patterns(&self) -> &[Regex];

    /// Extract the field from text. Never fails; absence is an empty value.
    fn extract(&self, text: &str) -> Self::Output;

    /// Group-1 captures of each pattern, one list per pattern.
    fn matches_by_pattern(&self, text: &str) -> Vec<Vec<String>> {
        self.patterns()
            .iter()
            .map(|pattern| captures(pattern, text))
            .collect()
    }
}

/// Group-1 captures of `pattern`, in order of appearance.
pub(crate) fn captures(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Captures of every pattern, concatenated in pattern order.
pub(crate) fn union_in_order(patterns: &[Regex], text: &str) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|pattern| captures(pattern, text))
        .collect()
}
