//! Text cleaning ahead of n-gram extraction.
//!
//! One pass lowercases, strips digits and punctuation, collapses
//! whitespace runs to a single ASCII space and trims the edges; the
//! result is NFC-normalized so visually identical inputs produce
//! identical n-grams. Cleaning is idempotent and zero-copy for input
//! that is already clean ASCII.

use crate::unicode::is_stripped;
use std::borrow::Cow;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// Cleans `text` for n-gram extraction.
///
/// The output contains only lowercase letters (and the odd symbol that
/// is neither numeric nor punctuation) separated by single spaces, with
/// no leading or trailing space.
pub fn clean(text: &str) -> Cow<'_, str> {
    if is_clean_ascii(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() {
                pending_space = true;
            }
            continue;
        }
        if is_stripped(c) {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.extend(c.to_lowercase());
    }
    match is_nfc_quick(out.chars()) {
        IsNormalized::Yes => Cow::Owned(out),
        _ => Cow::Owned(out.nfc().collect()),
    }
}

/// The words of a cleaned text.
pub(crate) fn words(cleaned: &str) -> impl Iterator<Item = &str> {
    cleaned.split(' ').filter(|w| !w.is_empty())
}

/// Repairs raw bytes into valid UTF-8, replacing invalid sequences with
/// U+FFFD rather than dropping them. Borrows when the input is already
/// valid.
pub fn sanitize_utf8(bytes: &[u8]) -> Cow<'_, str> {
    #[cfg(feature = "simd")]
    if let Ok(s) = simdutf8::basic::from_utf8(bytes) {
        return Cow::Borrowed(s);
    }
    #[cfg(not(feature = "simd"))]
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(s);
    }
    String::from_utf8_lossy(bytes)
}

/// Fast path: lowercase ASCII words separated by single spaces need no
/// work at all.
fn is_clean_ascii(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.first() == Some(&b' ') || bytes.last() == Some(&b' ') {
        return false;
    }
    let mut prev_space = false;
    for &b in bytes {
        match b {
            b'a'..=b'z' => prev_space = false,
            b' ' => {
                if prev_space {
                    return false;
                }
                prev_space = true;
            }
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips() {
        assert_eq!(clean("Hello, World! 123"), "hello world");
        assert_eq!(clean("¿Qué tal?"), "qué tal");
        assert_eq!(clean("Ψάρια και θάλασσα"), "ψάρια και θάλασσα");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(clean("  a \t\n b\u{00A0} c  "), "a b c");
        assert_eq!(clean("\t \r\n"), "");
    }

    #[test]
    fn punctuation_inside_words_does_not_split_them() {
        assert_eq!(clean("don't"), "dont");
        assert_eq!(clean("re-entry"), "reentry");
    }

    #[test]
    fn cleaning_is_idempotent() {
        for text in ["Hello, World!", "  Ärger  im 3. Stock  ", "互联网。逆天", ""] {
            let once = clean(text).into_owned();
            let twice = clean(&once).into_owned();
            assert_eq!(once, twice, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn clean_ascii_is_borrowed() {
        let text = "already clean text";
        assert!(matches!(clean(text), Cow::Borrowed(_)));
    }

    #[test]
    fn output_is_nfc() {
        // e + combining acute composes to é.
        assert_eq!(clean("Cafe\u{0301}"), "café");
    }

    #[test]
    fn words_skip_empty_segments() {
        let cleaned = clean("one two three");
        assert_eq!(words(&cleaned).collect::<Vec<_>>(), ["one", "two", "three"]);
        assert_eq!(words("").count(), 0);
    }

    #[test]
    fn sanitize_replaces_invalid_sequences() {
        assert_eq!(sanitize_utf8(b"ok"), "ok");
        let repaired = sanitize_utf8(&[b'a', 0xFF, b'b']);
        assert_eq!(repaired, "a\u{FFFD}b");
        assert!(matches!(sanitize_utf8("déjà".as_bytes()), Cow::Borrowed(_)));
    }
}
