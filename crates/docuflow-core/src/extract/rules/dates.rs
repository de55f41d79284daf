//! Date extraction (slash, dash, and Thai month-name forms).

use regex::Regex;

use super::patterns::DATE_PATTERNS;
use super::{FieldExtractor, union_in_order};

/// Dates as written in the document, not de-duplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateExtractor;

impl FieldExtractor for DateExtractor {
    type Output = Vec<String>;

    fn patterns(&self) -> &[Regex] {
        &DATE_PATTERNS
    }

    fn extract(&self, text: &str) -> Vec<String> {
        union_in_order(self.patterns(), text)
    }
}

/// Extract dates from text.
pub fn extract_dates(text: &str) -> Vec<String> {
    DateExtractor.extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_forms_in_pattern_order() {
        let text = "ลงวันที่ 5 มกราคม 2567 วันที่ 15/01/2567 ครบกำหนด 31-01-2567";

        assert_eq!(
            extract_dates(text),
            vec![
                "15/01/2567".to_string(),
                "31-01-2567".to_string(),
                "5 มกราคม 2567".to_string(),
            ]
        );
    }

    #[test]
    fn test_abbreviated_month() {
        assert_eq!(extract_dates("วันที่ 1 ธ.ค. 2566"), vec!["1 ธ.ค. 2566".to_string()]);
    }

    #[test]
    fn test_not_deduplicated() {
        let dates = extract_dates("01/02/2567 และ 01/02/2567");
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn test_phone_is_not_a_date() {
        assert!(extract_dates("โทร 02-123-4567").is_empty());
    }
}
