//! Whitespace collapsing and canonical ordering of Thai combining marks.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

use super::{StageKind, TextTransform};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // NIKHAHIT + SARA AA typed in place of SARA AM, optionally around a tone mark.
    static ref DECOMPOSED_SARA_AM: Regex = Regex::new(
        r"([\u{0E48}-\u{0E4B}]?)\u{0E4D}([\u{0E48}-\u{0E4B}]?)\u{0E32}"
    ).unwrap();
}

/// Collapses whitespace, canonicalizes mark order, trims.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceCleanup;

impl TextTransform for WhitespaceCleanup {
    fn name(&self) -> &str {
        "whitespace_cleanup"
    }

    fn kind(&self) -> StageKind {
        StageKind::WhitespaceCleanup
    }

    fn apply(&self, text: &str) -> String {
        clean_text(text)
    }
}

/// Clean OCR text. Idempotent.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let composed = DECOMPOSED_SARA_AM.replace_all(&collapsed, "${1}${2}\u{0E33}");

    let normalized: String = composed.nfc().collect();
    let hoisted = hoist_above_vowels(&normalized);
    let canonical: String = hoisted.nfc().collect();

    canonical.trim().to_string()
}

/// SARA AI HAN-AKAT and the SARA I / II / UE / UEE above vowels.
fn is_above_vowel(c: char) -> bool {
    matches!(c, '\u{0E31}' | '\u{0E34}'..='\u{0E37}')
}

/// Move each above vowel in front of any combining marks that precede it,
/// so a tone mark typed before the vowel lands after it.
fn hoist_above_vowels(text: &str) -> String {
    let mut out: Vec<char> = Vec::with_capacity(text.len());

    for c in text.chars() {
        if is_above_vowel(c) {
            let mut at = out.len();
            while at > 0 && canonical_combining_class(out[at - 1]) != 0 {
                at -= 1;
            }
            out.insert(at, c);
        } else {
            out.push(c);
        }
    }

    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "บริษัท  ตัวอย่าง\n\nจำกัด",
        "\tโทร:\u{00a0}02-123-4567  ",
        "ก\u{0E48}\u{0E34}",
        "ก\u{0E48}\u{0E48}\u{0E34}\u{0E38}",
        "ก\u{0E48}\u{0E34}\u{0E48}\u{0E34}",
        "น\u{0E4D}\u{0E49}\u{0E32}",
        "น\u{0E49}\u{0E4D}\u{0E32}",
        "ก\u{0E48}\u{0E38}\u{0E34}",
        "cafe\u{0301} ๑๒๓",
        "Mixed English และ ไทย 1,000.00 บาท",
    ];

    #[test]
    fn test_collapses_whitespace_and_trims() {
        assert_eq!(clean_text("  a \n\t b\r\n  c  "), "a b c");
    }

    #[test]
    fn test_tone_before_above_vowel_is_reordered() {
        // KO KAI + MAI EK + SARA I -> KO KAI + SARA I + MAI EK
        assert_eq!(clean_text("ก\u{0E48}\u{0E34}"), "ก\u{0E34}\u{0E48}");
    }

    #[test]
    fn test_tone_before_below_vowel_is_reordered() {
        assert_eq!(clean_text("ก\u{0E48}\u{0E38}"), "ก\u{0E38}\u{0E48}");
    }

    #[test]
    fn test_decomposed_sara_am() {
        assert_eq!(clean_text("น\u{0E49}\u{0E4D}\u{0E32}"), "น\u{0E49}\u{0E33}");
        assert_eq!(clean_text("น\u{0E4D}\u{0E49}\u{0E32}"), "น\u{0E49}\u{0E33}");
        assert_eq!(clean_text("ท\u{0E4D}\u{0E32}"), "ทำ");
    }

    #[test]
    fn test_latin_composition() {
        assert_eq!(clean_text("cafe\u{0301}"), "caf\u{00e9}");
    }

    #[test]
    fn test_idempotent() {
        for sample in SAMPLES {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_digits_untouched() {
        assert_eq!(clean_text("๑๒๓ 456"), "๑๒๓ 456");
    }
}
