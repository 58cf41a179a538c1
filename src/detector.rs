//! The detection façade.
//!
//! A [`LanguageDetector`] is immutable after construction and safe to
//! share across threads. Detection runs the full pipeline: clean,
//! narrow candidates by script, pre-filter, score with back-off,
//! normalize, and apply the minimum-relative-distance gate.

use crate::aggregate::normalize;
use crate::builder::ConfigurationError;
use crate::cleaner::{clean, words};
use crate::language::Language;
use crate::model::{ModelLoadError, NgramProbabilityModel};
use crate::prefilter::{prefilter, Prefiltered};
use crate::registry::ModelRegistry;
use crate::scorer::raw_scores;
use crate::script::narrow_candidates;
use crate::segment;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

/// Any failure a detector operation can surface.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),
}

/// A contiguous single-language section of a mixed-language text.
/// Indices are byte offsets into the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionResult {
    pub(crate) language: Language,
    pub(crate) start_index: usize,
    pub(crate) end_index: usize,
    pub(crate) word_count: usize,
}

impl DetectionResult {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

/// Detects the natural language of input text.
pub struct LanguageDetector {
    languages: Vec<Language>,
    minimum_relative_distance: f64,
    low_accuracy: bool,
    registry: Arc<ModelRegistry>,
    pinned: Mutex<Vec<Arc<NgramProbabilityModel>>>,
}

impl LanguageDetector {
    pub(crate) fn new(
        languages: Vec<Language>,
        minimum_relative_distance: f64,
        low_accuracy: bool,
        registry: Arc<ModelRegistry>,
    ) -> Self {
        debug!(
            languages = languages.len(),
            minimum_relative_distance, low_accuracy, "language detector created"
        );
        Self {
            languages,
            minimum_relative_distance,
            low_accuracy,
            registry,
            pinned: Mutex::new(Vec::new()),
        }
    }

    /// The configured language set, in tag order.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// The most likely language of `text`, or `None` when the top two
    /// probabilities are tied or closer than the minimum relative
    /// distance. Empty text is always undetermined.
    pub fn detect_best(&self, text: &str) -> Result<Option<Language>, DetectorError> {
        let distribution = self.distribution(text)?;
        let Some(&(best, p1)) = distribution.first() else {
            return Ok(None);
        };
        let p2 = distribution.get(1).map_or(0.0, |&(_, p)| p);
        if p1 > p2 && (p1 - p2) >= self.minimum_relative_distance {
            Ok(Some(best))
        } else {
            Ok(None)
        }
    }

    /// [`detect_best`](Self::detect_best) over several texts. Fails as a
    /// whole on the first model-load error.
    pub fn detect_best_batch(
        &self,
        texts: &[&str],
    ) -> Result<Vec<Option<Language>>, DetectorError> {
        texts.iter().map(|text| self.detect_best(text)).collect()
    }

    /// The probability of every configured language for `text`, sorted
    /// by probability descending and language tag ascending within
    /// ties. Empty text yields an empty vector; text without words
    /// yields all zeros.
    pub fn confidence_values(
        &self,
        text: &str,
    ) -> Result<Vec<(Language, f64)>, DetectorError> {
        self.distribution(text)
    }

    /// [`confidence_values`](Self::confidence_values) over several texts.
    pub fn confidence_values_batch(
        &self,
        texts: &[&str],
    ) -> Result<Vec<Vec<(Language, f64)>>, DetectorError> {
        texts.iter().map(|text| self.confidence_values(text)).collect()
    }

    /// The probability that `text` is written in `language`; 0 for a
    /// language outside the configured set and for empty text.
    pub fn confidence(&self, text: &str, language: Language) -> Result<f64, DetectorError> {
        if !self.languages.contains(&language) {
            return Ok(0.0);
        }
        let distribution = self.distribution(text)?;
        Ok(distribution
            .iter()
            .find(|&&(l, _)| l == language)
            .map_or(0.0, |&(_, p)| p))
    }

    /// [`confidence`](Self::confidence) over several texts.
    pub fn confidence_batch(
        &self,
        texts: &[&str],
        language: Language,
    ) -> Result<Vec<f64>, DetectorError> {
        texts
            .iter()
            .map(|text| self.confidence(text, language))
            .collect()
    }

    /// Partitions a possibly mixed-language text into contiguous
    /// single-language spans. Experimental.
    pub fn detect_multiple(&self, text: &str) -> Result<Vec<DetectionResult>, DetectorError> {
        segment::detect_multiple(self, text)
    }

    /// Drops the handles pinned by preloading and evicts the model
    /// cache this detector is bound to. Later detections reload on
    /// demand.
    pub fn unload_models(&self) {
        self.pinned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.registry.clear();
    }

    /// Eagerly loads every probability model of the configured set and
    /// pins the handles so eviction elsewhere cannot drop them.
    pub(crate) fn preload(&self) -> Result<(), ModelLoadError> {
        let mut pinned = Vec::with_capacity(self.languages.len() * self.max_order());
        for &language in &self.languages {
            for order in 1..=self.max_order() {
                pinned.push(self.registry.load_probability(language, order)?);
            }
        }
        *self.pinned.lock().unwrap_or_else(PoisonError::into_inner) = pinned;
        Ok(())
    }

    fn max_order(&self) -> usize {
        if self.low_accuracy {
            3
        } else {
            5
        }
    }

    /// The full pipeline producing the sorted probability distribution.
    fn distribution(&self, text: &str) -> Result<Vec<(Language, f64)>, DetectorError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let cleaned = clean(text);
        let word_list: Vec<&str> = words(&cleaned).collect();
        let mut probabilities: Vec<(Language, f64)> =
            self.languages.iter().map(|&l| (l, 0.0)).collect();
        if word_list.is_empty() {
            return Ok(probabilities);
        }

        let candidates = narrow_candidates(&self.languages, &cleaned);
        let candidates =
            match prefilter(&cleaned, &word_list, &candidates, &self.registry)? {
                Prefiltered::Resolved(language) => {
                    assign(&mut probabilities, &[(language, 1.0)]);
                    sort_distribution(&mut probabilities);
                    return Ok(probabilities);
                }
                Prefiltered::Narrowed(set) => set.into_vec(),
                Prefiltered::Inconclusive => candidates,
            };

        if let [only] = candidates.as_slice() {
            assign(&mut probabilities, &[(*only, 1.0)]);
            sort_distribution(&mut probabilities);
            return Ok(probabilities);
        }

        let raw = raw_scores(&word_list, &candidates, self.low_accuracy, &self.registry)?;
        let distribution = normalize(&raw);
        assign(&mut probabilities, &distribution);
        sort_distribution(&mut probabilities);
        Ok(probabilities)
    }
}

fn assign(probabilities: &mut [(Language, f64)], values: &[(Language, f64)]) {
    for &(language, p) in values {
        if let Some(entry) = probabilities.iter_mut().find(|(l, _)| *l == language) {
            entry.1 = p;
        }
    }
}

fn sort_distribution(distribution: &mut [(Language, f64)]) {
    distribution.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}
