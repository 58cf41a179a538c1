//! Rule-based pre-filter.
//!
//! Cheap, mostly table-driven rules that run before any probability
//! model is consulted. Three rules, in order: a code point of a
//! single-language script resolves the text outright; characters that
//! occur only in a few languages narrow the candidate set; and a text
//! whose trigrams are all unique to exactly one candidate resolves to
//! that candidate.

use crate::language::Language;
use crate::model::{ModelKind, ModelLoadError};
use crate::ngram::ngrams;
use crate::registry::ModelRegistry;
use crate::script::Script;
use phf::phf_map;
use smallvec::SmallVec;
use tracing::trace;

/// Outcome of the pre-filter pass.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Prefiltered {
    /// The text is definitely this language; skip scoring.
    Resolved(Language),
    /// Scoring can restrict itself to these candidates.
    Narrowed(SmallVec<[Language; 8]>),
    /// The rules had nothing to say.
    Inconclusive,
}

/// Characters that occur in only a handful of the supported languages.
/// Values list every language of the character, supported-set wide; the
/// filter intersects them with the configured candidates.
static CHARS_TO_LANGUAGES: phf::Map<char, &'static [Language]> = phf_map! {
    'ß' => &[Language::German],
    'ą' => &[Language::Lithuanian, Language::Polish],
    'ę' => &[Language::Lithuanian, Language::Polish],
    'ł' => &[Language::Polish],
    'ő' => &[Language::Hungarian],
    'ű' => &[Language::Hungarian],
    'ě' => &[Language::Czech],
    'ř' => &[Language::Czech],
    'ů' => &[Language::Czech],
    'ľ' => &[Language::Slovak],
    'ĺ' => &[Language::Slovak],
    'ŕ' => &[Language::Slovak],
    'ı' => &[Language::Azerbaijani, Language::Turkish],
    'ğ' => &[Language::Azerbaijani, Language::Turkish],
    'ə' => &[Language::Azerbaijani],
    'ñ' => &[Language::Basque, Language::Spanish],
    'ã' => &[Language::Portuguese, Language::Vietnamese],
    'õ' => &[Language::Estonian, Language::Portuguese],
    'å' => &[Language::Bokmal, Language::Danish, Language::Nynorsk, Language::Swedish],
    'ø' => &[Language::Bokmal, Language::Danish, Language::Nynorsk],
    'ð' => &[Language::Icelandic],
    'þ' => &[Language::Icelandic],
    'ă' => &[Language::Romanian, Language::Vietnamese],
    'ș' => &[Language::Romanian],
    'ț' => &[Language::Romanian],
    'ė' => &[Language::Lithuanian],
    'į' => &[Language::Lithuanian],
    'ų' => &[Language::Lithuanian],
    'ģ' => &[Language::Latvian],
    'ķ' => &[Language::Latvian],
    'ļ' => &[Language::Latvian],
    'ņ' => &[Language::Latvian],
    'ŵ' => &[Language::Welsh],
    'ŷ' => &[Language::Welsh],
    'ơ' => &[Language::Vietnamese],
    'ư' => &[Language::Vietnamese],
    'ё' => &[Language::Russian],
    'ї' => &[Language::Ukrainian],
    'є' => &[Language::Ukrainian],
    'ґ' => &[Language::Ukrainian],
    'ў' => &[Language::Belarusian],
    'ќ' => &[Language::Macedonian],
    'ѓ' => &[Language::Macedonian],
    'қ' => &[Language::Kazakh],
    'ұ' => &[Language::Kazakh],
};

/// Runs the pre-filter over a cleaned text.
pub(crate) fn prefilter(
    cleaned: &str,
    words: &[&str],
    candidates: &[Language],
    registry: &ModelRegistry,
) -> Result<Prefiltered, ModelLoadError> {
    if let Some(language) = resolve_by_script(cleaned, candidates) {
        trace!(language = %language, "pre-filter resolved by single-language script");
        return Ok(Prefiltered::Resolved(language));
    }

    let narrowed = narrow_by_characters(cleaned, candidates);
    let effective: &[Language] = match &narrowed {
        Some(set) => set,
        None => candidates,
    };
    if effective.len() == 1 {
        trace!(language = %effective[0], "pre-filter resolved by characteristic characters");
        return Ok(Prefiltered::Resolved(effective[0]));
    }

    if let Some(language) = resolve_by_unique_trigrams(words, effective, registry)? {
        trace!(language = %language, "pre-filter resolved by unique trigrams");
        return Ok(Prefiltered::Resolved(language));
    }

    Ok(match narrowed {
        Some(set) => Prefiltered::Narrowed(set),
        None => Prefiltered::Inconclusive,
    })
}

/// A code point of a single-language script settles the text.
fn resolve_by_script(cleaned: &str, candidates: &[Language]) -> Option<Language> {
    for c in cleaned.chars().filter(|c| c.is_alphabetic()) {
        if let Some(language) = Script::of(c).and_then(Script::single_language) {
            if candidates.contains(&language) {
                return Some(language);
            }
        }
    }
    None
}

/// Intersects the language sets of every characteristic character in the
/// text. Returns `None` when no character matched or the intersection
/// would remove nothing.
fn narrow_by_characters(
    cleaned: &str,
    candidates: &[Language],
) -> Option<SmallVec<[Language; 8]>> {
    let mut narrowed: Option<SmallVec<[Language; 8]>> = None;
    for c in cleaned.chars() {
        let Some(languages) = CHARS_TO_LANGUAGES.get(&c) else {
            continue;
        };
        let next: SmallVec<[Language; 8]> = match &narrowed {
            None => languages
                .iter()
                .copied()
                .filter(|l| candidates.contains(l))
                .collect(),
            Some(current) => languages
                .iter()
                .copied()
                .filter(|l| current.contains(l))
                .collect(),
        };
        // A contradictory intersection means the rules don't apply
        // (loanwords, mixed text); keep the previous narrowing.
        if !next.is_empty() {
            narrowed = Some(next);
        }
    }
    narrowed.filter(|set| set.len() < candidates.len())
}

/// If every trigram of the text occurs in exactly one candidate's
/// unique-trigram set, that candidate wins.
fn resolve_by_unique_trigrams(
    words: &[&str],
    candidates: &[Language],
    registry: &ModelRegistry,
) -> Result<Option<Language>, ModelLoadError> {
    let trigrams: Vec<&str> = words.iter().flat_map(|w| ngrams(w, 3)).collect();
    if trigrams.is_empty() {
        return Ok(None);
    }
    let mut winner = None;
    for &language in candidates {
        let unique = registry.load_count(language, 3, ModelKind::Unique)?;
        if unique.is_empty() {
            continue;
        }
        if trigrams.iter().all(|g| unique.contains(g)) {
            if winner.is_some() {
                // Unique sets are disjoint by construction; two matches
                // mean the data is inconsistent, so stay out of it.
                return Ok(None);
            }
            winner = Some(language);
        }
    }
    Ok(winner)
}
