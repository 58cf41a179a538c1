//! Writing-system classification.
//!
//! Each [`Script`] is a set of Unicode code-point ranges. The text-level
//! API counts alphabetic code points per script and derives the set of
//! *detected* scripts, which the detector uses to narrow its candidate
//! languages before any n-gram work.

use crate::language::Language;
use smallvec::SmallVec;

/// The writing systems the detector recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Script {
    Arabic,
    Armenian,
    Bengali,
    Cyrillic,
    Devanagari,
    Georgian,
    Greek,
    Gujarati,
    Gurmukhi,
    Han,
    Hangul,
    Hebrew,
    Hiragana,
    Katakana,
    Latin,
    Tamil,
    Telugu,
    Thai,
}

impl Script {
    pub const ALL: [Script; 18] = [
        Script::Arabic,
        Script::Armenian,
        Script::Bengali,
        Script::Cyrillic,
        Script::Devanagari,
        Script::Georgian,
        Script::Greek,
        Script::Gujarati,
        Script::Gurmukhi,
        Script::Han,
        Script::Hangul,
        Script::Hebrew,
        Script::Hiragana,
        Script::Katakana,
        Script::Latin,
        Script::Tamil,
        Script::Telugu,
        Script::Thai,
    ];

    /// Classifies a single code point, or `None` for code points outside
    /// every known script (symbols, emoji, unsupported scripts).
    #[inline]
    pub fn of(c: char) -> Option<Script> {
        let cp = c as u32;
        // Latin first: the overwhelmingly common case in mixed input.
        if matches!(cp,
            0x0041..=0x005A | // A-Z
            0x0061..=0x007A | // a-z
            0x00C0..=0x024F | // Latin-1 Supplement, Extended-A/B
            0x1E00..=0x1EFF | // Latin Extended Additional (Vietnamese)
            0x2C60..=0x2C7F | // Latin Extended-C
            0xA720..=0xA7FF   // Latin Extended-D
        ) {
            return Some(Script::Latin);
        }
        let script = match cp {
            0x0370..=0x03FF | 0x1F00..=0x1FFF => Script::Greek,
            0x0400..=0x052F | 0x1C80..=0x1C8F | 0x2DE0..=0x2DFF | 0xA640..=0xA69F => {
                Script::Cyrillic
            }
            0x0530..=0x058F | 0xFB13..=0xFB17 => Script::Armenian,
            0x0590..=0x05FF | 0xFB1D..=0xFB4F => Script::Hebrew,
            0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF | 0xFB50..=0xFDFF
            | 0xFE70..=0xFEFF => Script::Arabic,
            0x0900..=0x097F | 0xA8E0..=0xA8FF => Script::Devanagari,
            0x0980..=0x09FF => Script::Bengali,
            0x0A00..=0x0A7F => Script::Gurmukhi,
            0x0A80..=0x0AFF => Script::Gujarati,
            0x0B80..=0x0BFF => Script::Tamil,
            0x0C00..=0x0C7F => Script::Telugu,
            0x0E00..=0x0E7F => Script::Thai,
            0x10A0..=0x10FF | 0x1C90..=0x1CBF | 0x2D00..=0x2D2F => Script::Georgian,
            0x1100..=0x11FF | 0x3130..=0x318F | 0xA960..=0xA97F | 0xAC00..=0xD7FF => {
                Script::Hangul
            }
            0x3040..=0x309F => Script::Hiragana,
            0x30A0..=0x30FA | 0x30FC..=0x30FF | 0x31F0..=0x31FF => Script::Katakana,
            0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF | 0x20000..=0x2A6DF => {
                Script::Han
            }
            _ => return None,
        };
        Some(script)
    }

    /// The language this script identifies unambiguously, if any.
    ///
    /// Han is shared between Chinese and Japanese and therefore absent,
    /// as are Latin, Cyrillic, Arabic and Devanagari.
    pub fn single_language(self) -> Option<Language> {
        let language = match self {
            Script::Armenian => Language::Armenian,
            Script::Bengali => Language::Bengali,
            Script::Georgian => Language::Georgian,
            Script::Greek => Language::Greek,
            Script::Gujarati => Language::Gujarati,
            Script::Gurmukhi => Language::Punjabi,
            Script::Hangul => Language::Korean,
            Script::Hebrew => Language::Hebrew,
            Script::Hiragana => Language::Japanese,
            Script::Katakana => Language::Japanese,
            Script::Tamil => Language::Tamil,
            Script::Telugu => Language::Telugu,
            Script::Thai => Language::Thai,
            _ => return None,
        };
        Some(language)
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Per-script counts of the alphabetic code points of a text.
#[derive(Debug, Default, Clone)]
pub struct ScriptCounts {
    counts: [usize; Script::ALL.len()],
    total: usize,
}

impl ScriptCounts {
    pub fn of(text: &str) -> Self {
        let mut counts = ScriptCounts::default();
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            if let Some(script) = Script::of(c) {
                counts.counts[script.index()] += 1;
                counts.total += 1;
            }
        }
        counts
    }

    pub fn count(&self, script: Script) -> usize {
        self.counts[script.index()]
    }

    /// Total number of classified alphabetic code points.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Scripts that account for at least a fifth of the classified code
    /// points. An empty result means the text carries no script signal.
    pub fn detected(&self) -> SmallVec<[Script; 4]> {
        let threshold = (self.total / 5).max(1);
        Script::ALL
            .into_iter()
            .filter(|s| self.counts[s.index()] >= threshold)
            .collect()
    }
}

/// Restricts `configured` to the languages written in at least one
/// detected script of `text`. Falls back to the full configured set when
/// the restriction would leave nothing.
pub(crate) fn narrow_candidates(configured: &[Language], text: &str) -> Vec<Language> {
    let detected = ScriptCounts::of(text).detected();
    if detected.is_empty() {
        return configured.to_vec();
    }
    let narrowed: Vec<Language> = configured
        .iter()
        .copied()
        .filter(|lang| lang.scripts().iter().any(|s| detected.contains(s)))
        .collect();
    if narrowed.is_empty() {
        configured.to_vec()
    } else {
        narrowed
    }
}
