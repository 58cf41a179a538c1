//! Language-agnostic Unicode character classification.
//!
//! Single source of truth for the character classes the text cleaner
//! strips before n-gram extraction. All predicates are cheap range
//! tests over code points and resolve to a handful of compares in the
//! cleaning loop.

/// ASCII punctuation (the four classic ranges).
#[inline(always)]
pub fn is_ascii_punct(c: char) -> bool {
    matches!(c as u32,
        0x0021..=0x002F | // !"#$%&'()*+,-./
        0x003A..=0x0040 | // : ; < = > ? @
        0x005B..=0x0060 | // [ \ ] ^ _ `
        0x007B..=0x007E   // { | } ~
    )
}

/// Punctuation across the scripts the detector supports.
///
/// Covers the Unicode punctuation categories well enough for n-gram
/// cleaning: ASCII, Latin-1 ornaments, General Punctuation, the
/// per-script marks that show up in real prose (danda, Arabic comma,
/// Armenian full stop), CJK punctuation, and the fullwidth forms.
#[inline(always)]
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return is_ascii_punct(c);
    }
    matches!(c as u32,
        0x00A1..=0x00BF | // Latin-1: ¡ § « » ¿ and friends
        0x055A..=0x055F | // Armenian punctuation
        0x0589..=0x058A | // Armenian full stop, hyphen
        0x05BE..=0x05C0 | // Hebrew maqaf, paseq
        0x05F3..=0x05F4 | // Hebrew geresh, gershayim
        0x060C..=0x061F | // Arabic comma, semicolon, question mark
        0x066A..=0x066D | // Arabic percent, decimal, star
        0x06D4..=0x06D4 | // Arabic full stop
        0x0964..=0x0965 | // Devanagari danda, double danda
        0x0E4F..=0x0E5B | // Thai fongman, angkhankhu, khomut
        0x10FB..=0x10FB | // Georgian paragraph separator
        0x2000..=0x206F | // General Punctuation (quotes, dashes, ellipsis)
        0x2E00..=0x2E7F | // Supplemental Punctuation
        0x3001..=0x303F | // CJK punctuation (ideographic comma, brackets)
        0x30FB..=0x30FB | // Katakana middle dot
        0xFE50..=0xFE6F | // Small form variants
        0xFF01..=0xFF0F | // Fullwidth ! " # $ % & ' ( ) * + , - . /
        0xFF1A..=0xFF20 | // Fullwidth : ; < = > ? @
        0xFF3B..=0xFF40 | // Fullwidth [ \ ] ^ _ `
        0xFF5B..=0xFF65   // Fullwidth { | } ~ and halfwidth CJK punct
    )
}

/// A code point the cleaner removes outright: digits (any Unicode
/// numeric) or punctuation.
#[inline(always)]
pub fn is_stripped(c: char) -> bool {
    c.is_numeric() || is_punctuation(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_punctuation_is_detected() {
        for c in ['!', ',', '.', ':', '?', '[', '`', '~'] {
            assert!(is_ascii_punct(c), "missed {c}");
        }
        assert!(!is_ascii_punct('a'));
        assert!(!is_ascii_punct(' '));
        assert!(!is_ascii_punct('5'));
    }

    #[test]
    fn script_punctuation_is_detected() {
        for c in ['¿', '«', '»', '،', '؟', '।', '。', '、', '！', '…', '–'] {
            assert!(is_punctuation(c), "missed U+{:04X}", c as u32);
        }
    }

    #[test]
    fn letters_survive() {
        for c in ['a', 'é', 'ß', 'я', 'م', 'あ', '漢', '한'] {
            assert!(!is_punctuation(c), "false positive for {c}");
            assert!(!is_stripped(c), "stripped letter {c}");
        }
    }

    #[test]
    fn digits_are_stripped() {
        for c in ['0', '9', '٣', '๕', '²'] {
            assert!(is_stripped(c), "kept digit {c}");
        }
    }
}
