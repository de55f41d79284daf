//! Regex patterns for Thai business-document extraction.
//!
//! Every field has an ordered list of candidate patterns, most specific
//! first. Group 1 of each pattern is the extracted value.

use lazy_static::lazy_static;
use regex::Regex;

/// Thai labels that end a company name when lines have been collapsed.
///
/// Thai has no word boundaries, so a label only counts when a colon, a
/// period or a digit follows it ("โทร: 02", "ที่อยู่ 12"); names such as
/// "โทรคมนาคม" or "ที่อยู่อาศัย" stay intact.
const THAI_FIELD_LABELS: &str =
    r"(?:โทร|แฟกซ์|เลขประจำตัวผู้เสียภาษี|เลขที่ผู้เสียภาษี|ที่อยู่|อีเมล)(?:\s*[:.]|\s*\d)";

/// Latin labels, word-bounded so "Intel" is not cut at "tel".
const LATIN_FIELD_LABELS: &str = r"\b(?i:tel|fax|e-?mail|tax\s*id)\b";

/// Thai month names, full then abbreviated.
const THAI_MONTHS: &str = concat!(
    "มกราคม|กุมภาพันธ์|มีนาคม|เมษายน|พฤษภาคม|มิถุนายน|",
    "กรกฎาคม|สิงหาคม|กันยายน|ตุลาคม|พฤศจิกายน|ธันวาคม|",
    r"ม\.ค\.|ก\.พ\.|มี\.ค\.|เม\.ย\.|พ\.ค\.|มิ\.ย\.|",
    r"ก\.ค\.|ส\.ค\.|ก\.ย\.|ต\.ค\.|พ\.ย\.|ธ\.ค\."
);

fn company_pattern(prefix: &str) -> Regex {
    Regex::new(&format!(
        r"{prefix}\s+([^\n|]+?)(?:\s*{THAI_FIELD_LABELS}|\s*{LATIN_FIELD_LABELS}|\s*\||\n|$)"
    ))
    .unwrap()
}

lazy_static! {
    // Legal-entity prefixes: company limited, limited partnership (short and long form)
    pub static ref COMPANY_NAME_PATTERNS: Vec<Regex> = vec![
        company_pattern("บริษัท"),
        company_pattern(r"หจก\."),
        company_pattern("ห้างหุ้นส่วนจำกัด"),
    ];

    // 13-digit tax ID after its label
    pub static ref TAX_ID_PATTERN: Regex = Regex::new(
        r"เลขประจำตัวผู้เสียภาษี(?:อากร)?[:\s]*(\d{13})"
    ).unwrap();

    pub static ref PHONE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"โทร[:\s]*(\d{2}-\d{3}-\d{4})").unwrap(),
        Regex::new(r"โทร[:\s]*(\d{3}-\d{3}-\d{4})").unwrap(),
        Regex::new(r"Tel[:\s]*(\d{2}-\d{3}-\d{4})").unwrap(),
        Regex::new(r"(\d{2}-\d{3}-\d{4})").unwrap(),
    ];

    // Comma-grouped with decimals, plain with decimals, bare integer
    pub static ref AMOUNT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d{1,3}(?:,\d{3})*\.\d{2})").unwrap(),
        Regex::new(r"(\d+\.\d{2})").unwrap(),
        Regex::new(r"(\d{1,3}(?:,\d{3})*)").unwrap(),
    ];

    pub static ref DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d{1,2}/\d{1,2}/\d{4})").unwrap(),
        Regex::new(r"(\d{1,2}-\d{1,2}-\d{4})").unwrap(),
        Regex::new(&format!(r"(\d{{1,2}}\s+(?:{THAI_MONTHS})\s+\d{{4}})")).unwrap(),
    ];

    // Bangkok, road, sub-district + district
    pub static ref ADDRESS_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d+/\d+[^\n]*กรุงเทพ[^\n]*)").unwrap(),
        Regex::new(r"(\d+[^\n]*ถนน[^\n]*)").unwrap(),
        Regex::new(r"(\d+[^\n]*แขวง[^\n]*เขต[^\n]*)").unwrap(),
    ];
}
