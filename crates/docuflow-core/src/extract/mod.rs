//! Structured field extraction.

pub mod rules;

use crate::models::{DocumentResponse, StructuredFields};

use rules::{
    AddressExtractor, AmountExtractor, CompanyNameExtractor, DateExtractor, FieldExtractor,
    PhoneExtractor, TaxIdExtractor,
};

/// Runs every field extractor over a document's first page.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredExtractor;

impl StructuredExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all fields from text. Never fails.
    pub fn extract(&self, text: &str) -> StructuredFields {
        StructuredFields {
            company_name: CompanyNameExtractor.extract(text),
            tax_id: TaxIdExtractor.extract(text),
            phone_numbers: PhoneExtractor.extract(text),
            amounts: AmountExtractor.extract(text),
            dates: DateExtractor.extract(text),
            addresses: AddressExtractor.extract(text),
        }
    }

    /// Extract from the first page; all-empty when there are no pages.
    pub fn extract_from_response(&self, response: &DocumentResponse) -> StructuredFields {
        response
            .first_page()
            .map(|page| self.extract(&page.text))
            .unwrap_or_default()
    }
}
