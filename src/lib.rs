#![forbid(unsafe_code)]

//! # glossa — statistical natural language detection
//!
//! Identifies the language of arbitrary input text among seventy-five
//! supported languages, reporting either a single best guess or a full
//! probability distribution. Detection layers a script classifier and a
//! rule-based pre-filter over a character n-gram engine: overlapping
//! n-grams of orders 1–5 are scored against per-language pretrained
//! models with lower-order back-off, and the scores are normalized into
//! a confidence distribution guarded by a relative-distance gate.
//!
//! ```no_run
//! use glossa::{Language, LanguageDetectorBuilder};
//!
//! let detector = LanguageDetectorBuilder::from_languages(&[
//!     Language::English,
//!     Language::French,
//!     Language::German,
//! ])
//! .build()?;
//!
//! assert_eq!(
//!     detector.detect_best("languages are awesome")?,
//!     Some(Language::English)
//! );
//! # Ok::<(), glossa::DetectorError>(())
//! ```
//!
//! Models are loaded lazily into a process-wide, thread-safe registry
//! and shared by every detector instance; detectors themselves are
//! immutable and cheap to share across threads.

pub mod builder;
pub mod cleaner;
pub mod detector;
pub mod language;
pub mod model;
pub mod registry;
pub mod script;
pub mod testing;

pub use builder::{ConfigurationError, LanguageDetectorBuilder};
pub use cleaner::{clean, sanitize_utf8};
pub use detector::{DetectionResult, DetectorError, LanguageDetector};
pub use language::{Language, UnknownLanguage};
pub use model::{ModelKind, ModelLoadError, NgramCountModel, NgramProbabilityModel};
pub use registry::ModelRegistry;
pub use script::{Script, ScriptCounts};

// Internal only
mod aggregate;
mod ngram;
mod prefilter;
mod scorer;
mod segment;
mod unicode;
