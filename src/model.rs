//! Immutable n-gram models.
//!
//! Two distinct kinds, not a hierarchy: probability models map n-grams
//! to log-probabilities and drive scoring; count models are plain
//! n-gram sets consulted by the pre-filter and by low-accuracy pruning.
//!
//! The serialized payload (after Brotli decompression) is JSON. For
//! probability models the `ngrams` object keys are reduced fractions
//! `"num/den"` and the values are space-separated n-grams sharing that
//! probability; the natural log is taken at parse time. Count models
//! carry `ngrams` as an array of space-separated n-gram groups.

use crate::language::Language;
use crate::ngram::{MAX_ORDER, MIN_ORDER};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to materialize a model from its persisted form.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot open model file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decompress model file `{path}`: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model payload in `{path}`: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// The two count-model flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// N-grams that occur in exactly one language's training corpus.
    Unique,
    /// The most frequent n-grams of a language's training corpus.
    MostCommon,
}

impl ModelKind {
    /// File-name stem, as in `unique_trigrams.json.br`.
    pub(crate) fn file_stem(self) -> &'static str {
        match self {
            ModelKind::Unique => "unique",
            ModelKind::MostCommon => "most_common",
        }
    }
}

/// Immutable map from n-gram to log-probability for one (language,
/// order) pair. All stored values are ≤ 0.
#[derive(Debug)]
pub struct NgramProbabilityModel {
    language: Language,
    order: usize,
    log_probabilities: HashMap<Box<str>, f64>,
}

impl NgramProbabilityModel {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.log_probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log_probabilities.is_empty()
    }

    /// The stored natural log-probability of `ngram`, or `None` when the
    /// training corpus never produced it.
    #[inline]
    pub fn log_probability(&self, ngram: &str) -> Option<f64> {
        self.log_probabilities.get(ngram).copied()
    }

    pub(crate) fn from_json(
        json: &str,
        language: Language,
        order: usize,
        path: &Path,
    ) -> Result<Self, ModelLoadError> {
        let payload: ProbabilityPayload = serde_json::from_str(json)
            .map_err(|e| parse_error(path, format!("invalid JSON: {e}")))?;
        check_language_tag(&payload.language, language, path)?;
        let mut log_probabilities = HashMap::new();
        for (fraction, ngrams) in &payload.ngrams {
            let log_probability = parse_fraction(fraction, path)?;
            for ngram in ngrams.split_whitespace() {
                check_order(ngram, order, path)?;
                log_probabilities.insert(Box::from(ngram), log_probability);
            }
        }
        Ok(Self {
            language,
            order,
            log_probabilities,
        })
    }
}

/// Immutable n-gram set for one (language, order, kind) triple.
#[derive(Debug)]
pub struct NgramCountModel {
    language: Language,
    order: usize,
    kind: ModelKind,
    ngrams: HashSet<Box<str>>,
}

impl NgramCountModel {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.ngrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }

    #[inline]
    pub fn contains(&self, ngram: &str) -> bool {
        self.ngrams.contains(ngram)
    }

    /// An empty stand-in for a count model whose file does not exist.
    pub(crate) fn empty(language: Language, order: usize, kind: ModelKind) -> Self {
        Self {
            language,
            order,
            kind,
            ngrams: HashSet::new(),
        }
    }

    pub(crate) fn from_json(
        json: &str,
        language: Language,
        order: usize,
        kind: ModelKind,
        path: &Path,
    ) -> Result<Self, ModelLoadError> {
        let payload: CountPayload = serde_json::from_str(json)
            .map_err(|e| parse_error(path, format!("invalid JSON: {e}")))?;
        check_language_tag(&payload.language, language, path)?;
        let mut ngrams = HashSet::new();
        for group in &payload.ngrams {
            for ngram in group.split_whitespace() {
                check_order(ngram, order, path)?;
                ngrams.insert(Box::from(ngram));
            }
        }
        Ok(Self {
            language,
            order,
            kind,
            ngrams,
        })
    }
}

#[derive(Deserialize)]
struct ProbabilityPayload {
    language: String,
    ngrams: HashMap<String, String>,
}

#[derive(Deserialize)]
struct CountPayload {
    language: String,
    ngrams: Vec<String>,
}

fn parse_error(path: &Path, reason: String) -> ModelLoadError {
    ModelLoadError::Parse {
        path: path.to_owned(),
        reason,
    }
}

fn check_language_tag(tag: &str, expected: Language, path: &Path) -> Result<(), ModelLoadError> {
    match tag.parse::<Language>() {
        Ok(found) if found == expected => Ok(()),
        Ok(found) => Err(parse_error(
            path,
            format!("payload is for {found}, expected {expected}"),
        )),
        Err(_) => Err(parse_error(path, format!("unknown language tag `{tag}`"))),
    }
}

fn check_order(ngram: &str, order: usize, path: &Path) -> Result<(), ModelLoadError> {
    let found = ngram.chars().count();
    if found != order || !(MIN_ORDER..=MAX_ORDER).contains(&found) {
        return Err(parse_error(
            path,
            format!("n-gram `{ngram}` has {found} code points, expected {order}"),
        ));
    }
    Ok(())
}

/// Parses a `"num/den"` fraction into its natural log. The fraction must
/// lie in (0, 1].
fn parse_fraction(fraction: &str, path: &Path) -> Result<f64, ModelLoadError> {
    let invalid = || parse_error(path, format!("invalid fraction `{fraction}`"));
    let (num, den) = fraction.split_once('/').ok_or_else(invalid)?;
    let num: u64 = num.trim().parse().map_err(|_| invalid())?;
    let den: u64 = den.trim().parse().map_err(|_| invalid())?;
    if num == 0 || den == 0 || num > den {
        return Err(invalid());
    }
    Ok((num as f64).ln() - (den as f64).ln())
}
