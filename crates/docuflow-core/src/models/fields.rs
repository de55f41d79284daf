//! Structured fields extracted from document text.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::extract::rules::amounts::parse_amount;
use crate::extract::rules::tax_id::validate_tax_id;

/// Number of amounts shown by [`StructuredFields::display_rows`].
const DISPLAY_AMOUNTS: usize = 5;

/// Fields derived from the first page of a document.
///
/// Recomputed on every extraction; absent values are empty, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFields {
    /// Company name following a legal-entity prefix.
    pub company_name: Option<String>,

    /// 13-digit tax IDs in order of appearance, duplicates kept.
    pub tax_id: Vec<String>,

    /// Phone numbers, de-duplicated.
    pub phone_numbers: BTreeSet<String>,

    /// Amounts from every pattern tier, not de-duplicated.
    pub amounts: Vec<String>,

    /// Dates from every pattern, not de-duplicated.
    pub dates: Vec<String>,

    /// Address lines from every pattern, not de-duplicated.
    pub addresses: Vec<String>,
}

impl StructuredFields {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.tax_id.is_empty()
            && self.phone_numbers.is_empty()
            && self.amounts.is_empty()
            && self.dates.is_empty()
            && self.addresses.is_empty()
    }

    /// Largest parseable amount, a usable stand-in for the document total.
    pub fn largest_amount(&self) -> Option<Decimal> {
        self.amounts.iter().filter_map(|a| parse_amount(a)).max()
    }

    /// Labelled rows for the non-empty fields.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();

        if let Some(name) = &self.company_name {
            rows.push(("Company", name.clone()));
        }
        if !self.tax_id.is_empty() {
            let ids: Vec<String> = self
                .tax_id
                .iter()
                .map(|id| {
                    if validate_tax_id(id) {
                        id.clone()
                    } else {
                        format!("{id} (checksum mismatch)")
                    }
                })
                .collect();
            rows.push(("Tax ID", ids.join(", ")));
        }
        if !self.phone_numbers.is_empty() {
            let phones: Vec<&str> = self.phone_numbers.iter().map(String::as_str).collect();
            rows.push(("Phone", phones.join(", ")));
        }
        if !self.amounts.is_empty() {
            let shown: Vec<&str> = self
                .amounts
                .iter()
                .take(DISPLAY_AMOUNTS)
                .map(String::as_str)
                .collect();
            rows.push(("Amounts", shown.join(", ")));
        }
        if !self.dates.is_empty() {
            rows.push(("Dates", self.dates.join(", ")));
        }
        if !self.addresses.is_empty() {
            rows.push(("Addresses", self.addresses.join("\n")));
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_is_empty() {
        assert!(StructuredFields::default().is_empty());
        assert!(StructuredFields::default().display_rows().is_empty());
    }

    #[test]
    fn test_largest_amount() {
        let fields = StructuredFields {
            amounts: vec!["500.00".into(), "1,000.00".into(), "00".into()],
            ..Default::default()
        };
        assert_eq!(fields.largest_amount(), Some(Decimal::from_str("1000.00").unwrap()));
    }

    #[test]
    fn test_display_rows_flags_bad_tax_id_checksum() {
        let fields = StructuredFields {
            tax_id: vec!["1234567890121".into(), "1234567890123".into()],
            ..Default::default()
        };
        let rows = fields.display_rows();

        assert_eq!(
            rows,
            vec![(
                "Tax ID",
                "1234567890121, 1234567890123 (checksum mismatch)".to_string()
            )]
        );
        // The field itself is never filtered.
        assert_eq!(fields.tax_id.len(), 2);
    }

    #[test]
    fn test_display_rows_limits_amounts() {
        let fields = StructuredFields {
            company_name: Some("ตัวอย่าง จำกัด".into()),
            amounts: (1..=8).map(|i| format!("{i}.00")).collect(),
            ..Default::default()
        };
        let rows = fields.display_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ("Amounts", "1.00, 2.00, 3.00, 4.00, 5.00".to_string()));
    }
}
