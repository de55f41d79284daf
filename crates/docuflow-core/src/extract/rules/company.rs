//! Company name extraction.

use regex::Regex;

use super::FieldExtractor;
use super::patterns::COMPANY_NAME_PATTERNS;

/// Company name following a legal-entity prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyNameExtractor;

impl FieldExtractor for CompanyNameExtractor {
    type Output = Option<String>;

    fn patterns(&self) -> &[Regex] {
        &COMPANY_NAME_PATTERNS
    }

    fn extract(&self, text: &str) -> Option<String> {
        // First pattern with any match wins, even if a later prefix occurs earlier.
        self.patterns().iter().find_map(|pattern| {
            pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|name| !name.is_empty())
        })
    }
}

/// Extract the company name from text.
pub fn extract_company_name(text: &str) -> Option<String> {
    CompanyNameExtractor.extract(text)
}
