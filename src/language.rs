//! The closed set of detectable languages.
//!
//! One `define_languages!` table is the single source of truth: it
//! generates the enum, both ISO 639 code directions, and the script
//! sets. Variants are declared in tag order so the derived `Ord` is the
//! deterministic tie-break order used by the detector.

use crate::script::Script;
use phf::phf_map;

macro_rules! define_languages {
    ($($variant:ident => $iso1:literal, $iso3:literal, [$($script:ident),+]);+ $(;)?) => {
        /// A detectable natural language.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Language {
            $($variant,)+
        }

        /// Every supported language, in tag order.
        const ALL: &[Language] = &[$(Language::$variant,)+];

        static BY_ISO_639_1: phf::Map<&'static str, Language> = phf_map! {
            $($iso1 => Language::$variant,)+
        };

        static BY_ISO_639_3: phf::Map<&'static str, Language> = phf_map! {
            $($iso3 => Language::$variant,)+
        };

        impl Language {
            /// Number of supported languages.
            pub const COUNT: usize = ALL.len();

            /// All supported languages, in tag order.
            pub fn all() -> impl Iterator<Item = Language> {
                ALL.iter().copied()
            }

            /// The language tag, e.g. `"English"`.
            pub const fn tag(self) -> &'static str {
                match self { $(Language::$variant => stringify!($variant),)+ }
            }

            /// ISO 639-1 two-letter code.
            pub const fn iso_code_639_1(self) -> &'static str {
                match self { $(Language::$variant => $iso1,)+ }
            }

            /// ISO 639-3 three-letter code.
            pub const fn iso_code_639_3(self) -> &'static str {
                match self { $(Language::$variant => $iso3,)+ }
            }

            /// The writing systems this language is written in.
            pub fn scripts(self) -> &'static [Script] {
                match self { $(Language::$variant => &[$(Script::$script,)+],)+ }
            }
        }
    };
}

define_languages! {
    Afrikaans => "af", "afr", [Latin];
    Albanian => "sq", "sqi", [Latin];
    Arabic => "ar", "ara", [Arabic];
    Armenian => "hy", "hye", [Armenian];
    Azerbaijani => "az", "aze", [Latin];
    Basque => "eu", "eus", [Latin];
    Belarusian => "be", "bel", [Cyrillic];
    Bengali => "bn", "ben", [Bengali];
    Bokmal => "nb", "nob", [Latin];
    Bosnian => "bs", "bos", [Latin];
    Bulgarian => "bg", "bul", [Cyrillic];
    Catalan => "ca", "cat", [Latin];
    Chinese => "zh", "zho", [Han];
    Croatian => "hr", "hrv", [Latin];
    Czech => "cs", "ces", [Latin];
    Danish => "da", "dan", [Latin];
    Dutch => "nl", "nld", [Latin];
    English => "en", "eng", [Latin];
    Esperanto => "eo", "epo", [Latin];
    Estonian => "et", "est", [Latin];
    Finnish => "fi", "fin", [Latin];
    French => "fr", "fra", [Latin];
    Ganda => "lg", "lug", [Latin];
    Georgian => "ka", "kat", [Georgian];
    German => "de", "deu", [Latin];
    Greek => "el", "ell", [Greek];
    Gujarati => "gu", "guj", [Gujarati];
    Hebrew => "he", "heb", [Hebrew];
    Hindi => "hi", "hin", [Devanagari];
    Hungarian => "hu", "hun", [Latin];
    Icelandic => "is", "isl", [Latin];
    Indonesian => "id", "ind", [Latin];
    Irish => "ga", "gle", [Latin];
    Italian => "it", "ita", [Latin];
    Japanese => "ja", "jpn", [Hiragana, Katakana, Han];
    Kazakh => "kk", "kaz", [Cyrillic];
    Korean => "ko", "kor", [Hangul];
    Latin => "la", "lat", [Latin];
    Latvian => "lv", "lav", [Latin];
    Lithuanian => "lt", "lit", [Latin];
    Macedonian => "mk", "mkd", [Cyrillic];
    Malay => "ms", "msa", [Latin];
    Maori => "mi", "mri", [Latin];
    Marathi => "mr", "mar", [Devanagari];
    Mongolian => "mn", "mon", [Cyrillic];
    Nynorsk => "nn", "nno", [Latin];
    Persian => "fa", "fas", [Arabic];
    Polish => "pl", "pol", [Latin];
    Portuguese => "pt", "por", [Latin];
    Punjabi => "pa", "pan", [Gurmukhi];
    Romanian => "ro", "ron", [Latin];
    Russian => "ru", "rus", [Cyrillic];
    Serbian => "sr", "srp", [Cyrillic];
    Shona => "sn", "sna", [Latin];
    Slovak => "sk", "slk", [Latin];
    Slovene => "sl", "slv", [Latin];
    Somali => "so", "som", [Latin];
    Sotho => "st", "sot", [Latin];
    Spanish => "es", "spa", [Latin];
    Swahili => "sw", "swa", [Latin];
    Swedish => "sv", "swe", [Latin];
    Tagalog => "tl", "tgl", [Latin];
    Tamil => "ta", "tam", [Tamil];
    Telugu => "te", "tel", [Telugu];
    Thai => "th", "tha", [Thai];
    Tsonga => "ts", "tso", [Latin];
    Tswana => "tn", "tsn", [Latin];
    Turkish => "tr", "tur", [Latin];
    Ukrainian => "uk", "ukr", [Cyrillic];
    Urdu => "ur", "urd", [Arabic];
    Vietnamese => "vi", "vie", [Latin];
    Welsh => "cy", "cym", [Latin];
    Xhosa => "xh", "xho", [Latin];
    Yoruba => "yo", "yor", [Latin];
    Zulu => "zu", "zul", [Latin];
}

impl Language {
    /// All languages still in everyday spoken use (everything but Latin).
    pub fn all_spoken() -> impl Iterator<Item = Language> {
        Language::all().filter(|&l| l != Language::Latin)
    }

    /// All languages written in the given script.
    pub fn all_with_script(script: Script) -> impl Iterator<Item = Language> {
        Language::all().filter(move |l| l.scripts().contains(&script))
    }

    /// Looks a language up by its ISO 639-1 code, case-insensitively.
    pub fn from_iso_code_639_1(code: &str) -> Option<Language> {
        BY_ISO_639_1.get(code.to_ascii_lowercase().as_str()).copied()
    }

    /// Looks a language up by its ISO 639-3 code, case-insensitively.
    pub fn from_iso_code_639_3(code: &str) -> Option<Language> {
        BY_ISO_639_3.get(code.to_ascii_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Language {
    type Err = UnknownLanguage;

    /// Parses a language tag, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::all()
            .find(|l| l.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLanguage(s.to_owned()))
    }
}

/// Error returned when parsing an unrecognized language tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language tag `{0}`")]
pub struct UnknownLanguage(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventy_five_languages() {
        assert_eq!(Language::COUNT, 75);
        assert_eq!(Language::all().count(), 75);
        assert_eq!(Language::all_spoken().count(), 74);
    }

    #[test]
    fn iso_codes_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_iso_code_639_1(lang.iso_code_639_1()), Some(lang));
            assert_eq!(Language::from_iso_code_639_3(lang.iso_code_639_3()), Some(lang));
        }
    }

    #[test]
    fn iso_lookup_is_case_insensitive() {
        assert_eq!(Language::from_iso_code_639_1("EN"), Some(Language::English));
        assert_eq!(Language::from_iso_code_639_3("dEu"), Some(Language::German));
        assert_eq!(Language::from_iso_code_639_1("xx"), None);
    }

    #[test]
    fn tag_parsing_is_case_insensitive() {
        assert_eq!("german".parse::<Language>(), Ok(Language::German));
        assert_eq!("ENGLISH".parse::<Language>(), Ok(Language::English));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn ordering_follows_tag_names() {
        assert!(Language::Afrikaans < Language::Zulu);
        assert!(Language::English < Language::French);
        let mut tags: Vec<_> = Language::all().map(Language::tag).collect();
        tags.sort_unstable();
        assert_eq!(tags, Language::all().map(Language::tag).collect::<Vec<_>>());
    }

    #[test]
    fn script_sets_are_consistent() {
        for lang in Language::all() {
            assert!(!lang.scripts().is_empty(), "{lang} has no script");
        }
        assert_eq!(Language::all_with_script(Script::Devanagari).count(), 2);
        assert_eq!(Language::all_with_script(Script::Arabic).count(), 3);
        assert_eq!(Language::all_with_script(Script::Cyrillic).count(), 8);
        assert!(Language::all_with_script(Script::Latin).count() >= 49);
    }
}
