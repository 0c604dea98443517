//! Text canonicalization for locale-insensitive word comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalizes a raw word for comparison and storage keys.
///
/// Lowercases, decomposes (NFD), drops combining marks and all whitespace
/// code points, then recomposes (NFC). Two spellings that differ only by
/// case, accents, or spacing normalize identically, so every comparison in
/// the engine happens on this single fixed form. The original spelling is
/// kept elsewhere for display.
///
/// Idempotent: `normalize(normalize(w)) == normalize(w)`.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !c.is_whitespace())
        .nfc()
        .collect()
}
