//! Thai digit normalization.

use super::{StageKind, TextTransform};

/// Maps Thai digits (U+0E50..U+0E59) to ASCII 0-9.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitNormalization;

impl TextTransform for DigitNormalization {
    fn name(&self) -> &str {
        "digit_normalization"
    }

    fn kind(&self) -> StageKind {
        StageKind::DigitNormalization
    }

    fn apply(&self, text: &str) -> String {
        normalize_digits(text)
    }
}

/// Replace each Thai digit with its ASCII digit; other characters are kept.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0E50}'..='\u{0E59}' => char::from(b'0' + (c as u32 - 0x0E50) as u8),
            _ => c,
        })
        .collect()
}
