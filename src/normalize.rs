use unicode_normalization::{is_nfc, UnicodeNormalization};

/// Canonical composition (NFC), so one visible character is one code point
/// before per-character transliteration runs.
pub fn normalize(text: &str) -> String {
    if is_nfc(text) {
        return text.to_string();
    }
    text.nfc().collect()
}
