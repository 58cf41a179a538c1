//! Configuration and construction of [`LanguageDetector`] instances.
//!
//! Constructors record raw input; all validation happens in
//! [`build`](LanguageDetectorBuilder::build) so misconfiguration
//! surfaces as one typed error instead of a panic.

use crate::detector::{DetectorError, LanguageDetector};
use crate::language::Language;
use crate::registry::{self, ModelRegistry};
use crate::script::Script;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Invalid detector configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("the language set must not be empty")]
    EmptyLanguageSet,
    #[error("unknown ISO 639 code `{0}`")]
    UnknownIsoCode(String),
    #[error("minimum relative distance must lie in [0.0, 0.99], got {0}")]
    DistanceOutOfRange(f64),
}

/// Configures and creates a [`LanguageDetector`].
#[derive(Debug, Clone)]
pub struct LanguageDetectorBuilder {
    languages: Vec<Language>,
    unknown_iso_codes: Vec<String>,
    minimum_relative_distance: f64,
    preload: bool,
    low_accuracy: bool,
    model_directory: Option<PathBuf>,
}

impl LanguageDetectorBuilder {
    fn with_languages(languages: Vec<Language>) -> Self {
        Self {
            languages,
            unknown_iso_codes: Vec::new(),
            minimum_relative_distance: 0.0,
            preload: false,
            low_accuracy: false,
            model_directory: None,
        }
    }

    /// All seventy-five built-in languages.
    pub fn from_all_languages() -> Self {
        Self::with_languages(Language::all().collect())
    }

    /// All built-in spoken languages (excludes Latin).
    pub fn from_all_spoken_languages() -> Self {
        Self::with_languages(Language::all_spoken().collect())
    }

    /// All built-in languages written in the Arabic script.
    pub fn from_all_languages_with_arabic_script() -> Self {
        Self::with_languages(Language::all_with_script(Script::Arabic).collect())
    }

    /// All built-in languages written in the Cyrillic script.
    pub fn from_all_languages_with_cyrillic_script() -> Self {
        Self::with_languages(Language::all_with_script(Script::Cyrillic).collect())
    }

    /// All built-in languages written in the Devanagari script.
    pub fn from_all_languages_with_devanagari_script() -> Self {
        Self::with_languages(Language::all_with_script(Script::Devanagari).collect())
    }

    /// All built-in languages written in the Latin script.
    pub fn from_all_languages_with_latin_script() -> Self {
        Self::with_languages(Language::all_with_script(Script::Latin).collect())
    }

    /// All built-in languages except the given ones.
    pub fn from_all_languages_without(languages: &[Language]) -> Self {
        Self::with_languages(
            Language::all()
                .filter(|l| !languages.contains(l))
                .collect(),
        )
    }

    /// Exactly the given languages.
    pub fn from_languages(languages: &[Language]) -> Self {
        Self::with_languages(languages.to_vec())
    }

    /// The languages behind the given ISO 639-1 codes. Unknown codes
    /// are reported by [`build`](Self::build).
    pub fn from_iso_codes_639_1(codes: &[&str]) -> Self {
        let mut builder = Self::with_languages(Vec::new());
        for code in codes {
            match Language::from_iso_code_639_1(code) {
                Some(language) => builder.languages.push(language),
                None => builder.unknown_iso_codes.push((*code).to_owned()),
            }
        }
        builder
    }

    /// The languages behind the given ISO 639-3 codes. Unknown codes
    /// are reported by [`build`](Self::build).
    pub fn from_iso_codes_639_3(codes: &[&str]) -> Self {
        let mut builder = Self::with_languages(Vec::new());
        for code in codes {
            match Language::from_iso_code_639_3(code) {
                Some(language) => builder.languages.push(language),
                None => builder.unknown_iso_codes.push((*code).to_owned()),
            }
        }
        builder
    }

    /// Sets the gap the top probability must keep over the runner-up
    /// for a non-undetermined result. Valid range: 0.0 to 0.99.
    pub fn with_minimum_relative_distance(mut self, distance: f64) -> Self {
        self.minimum_relative_distance = distance;
        self
    }

    /// Loads every probability model of the configured set eagerly at
    /// build time instead of on first use.
    pub fn with_preloaded_language_models(mut self) -> Self {
        self.preload = true;
        self
    }

    /// Trades accuracy for speed and memory: detection relies on
    /// trigrams alone.
    pub fn with_low_accuracy_mode(mut self) -> Self {
        self.low_accuracy = true;
        self
    }

    /// Binds the detector to its own model registry rooted at the given
    /// directory instead of the shared process-wide one.
    pub fn with_model_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.model_directory = Some(directory.into());
        self
    }

    /// Validates the configuration and creates the detector.
    pub fn build(self) -> Result<LanguageDetector, DetectorError> {
        if let Some(code) = self.unknown_iso_codes.into_iter().next() {
            return Err(ConfigurationError::UnknownIsoCode(code).into());
        }
        if !(0.0..=0.99).contains(&self.minimum_relative_distance) {
            return Err(
                ConfigurationError::DistanceOutOfRange(self.minimum_relative_distance).into(),
            );
        }
        let mut languages = self.languages;
        languages.sort_unstable();
        languages.dedup();
        if languages.is_empty() {
            return Err(ConfigurationError::EmptyLanguageSet.into());
        }
        let registry = match self.model_directory {
            Some(directory) => Arc::new(ModelRegistry::new(directory)),
            None => registry::shared(),
        };
        let detector = LanguageDetector::new(
            languages,
            self.minimum_relative_distance,
            self.low_accuracy,
            registry,
        );
        if self.preload {
            detector.preload()?;
        }
        Ok(detector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration_error(result: Result<LanguageDetector, DetectorError>) -> ConfigurationError {
        match result {
            Err(DetectorError::Configuration(e)) => e,
            Err(other) => panic!("expected configuration error, got {other}"),
            Ok(_) => panic!("expected configuration error, got a detector"),
        }
    }

    #[test]
    fn empty_language_set_is_rejected() {
        let err = configuration_error(LanguageDetectorBuilder::from_languages(&[]).build());
        assert_eq!(err, ConfigurationError::EmptyLanguageSet);
    }

    #[test]
    fn excluding_everything_is_rejected() {
        let all: Vec<Language> = Language::all().collect();
        let err =
            configuration_error(LanguageDetectorBuilder::from_all_languages_without(&all).build());
        assert_eq!(err, ConfigurationError::EmptyLanguageSet);
    }

    #[test]
    fn distance_outside_range_is_rejected() {
        for distance in [1.0, -0.1, f64::NAN] {
            let err = configuration_error(
                LanguageDetectorBuilder::from_all_languages()
                    .with_minimum_relative_distance(distance)
                    .build(),
            );
            assert!(matches!(err, ConfigurationError::DistanceOutOfRange(_)));
        }
    }

    #[test]
    fn unknown_iso_code_is_rejected() {
        let err = configuration_error(
            LanguageDetectorBuilder::from_iso_codes_639_1(&["en", "xx"]).build(),
        );
        assert_eq!(err, ConfigurationError::UnknownIsoCode("xx".to_owned()));
    }

    #[test]
    fn iso_code_constructors_resolve_languages() {
        let detector = LanguageDetectorBuilder::from_iso_codes_639_1(&["EN", "de"])
            .build()
            .unwrap();
        assert_eq!(detector.languages(), &[Language::English, Language::German]);
        let detector = LanguageDetectorBuilder::from_iso_codes_639_3(&["fra", "ZHO"])
            .build()
            .unwrap();
        assert_eq!(detector.languages(), &[Language::Chinese, Language::French]);
    }

    #[test]
    fn languages_are_sorted_and_deduplicated() {
        let detector = LanguageDetectorBuilder::from_languages(&[
            Language::German,
            Language::English,
            Language::German,
        ])
        .build()
        .unwrap();
        assert_eq!(detector.languages(), &[Language::English, Language::German]);
    }

    #[test]
    fn script_constructors_pick_script_sets() {
        let detector = LanguageDetectorBuilder::from_all_languages_with_devanagari_script()
            .build()
            .unwrap();
        assert_eq!(detector.languages(), &[Language::Hindi, Language::Marathi]);
    }
}
