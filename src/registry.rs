//! Process-wide cache of loaded n-gram models.
//!
//! Lookups take a shared lock; insertion takes the exclusive lock; the
//! slow part (file I/O, Brotli decompression, JSON parsing) happens
//! outside both. An in-flight set keyed the same way as the cache
//! coalesces concurrent loads: the first caller performs the I/O,
//! later callers for the same key block on a condvar and pick up the
//! inserted handle. A failed load is never cached, so the next call
//! retries.

use crate::language::Language;
use crate::model::{ModelKind, ModelLoadError, NgramCountModel, NgramProbabilityModel};
use crate::ngram::{order_name, MAX_ORDER, MIN_ORDER};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, LazyLock, Mutex, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    Probability(Language, usize),
    Count(Language, usize, ModelKind),
}

/// Shared, thread-safe store of decompressed n-gram models.
///
/// Handles are `Arc`s: many detectors share the same model object, and
/// for any key at most one object is materialized per registry.
pub struct ModelRegistry {
    root: PathBuf,
    probabilities: RwLock<HashMap<(Language, usize), Arc<NgramProbabilityModel>>>,
    counts: RwLock<HashMap<(Language, usize, ModelKind), Arc<NgramCountModel>>>,
    in_flight: Mutex<HashSet<CacheKey>>,
    load_done: Condvar,
}

/// The registry shared by every detector not bound to its own model
/// directory. Rooted at `./models`, overridable through the
/// `GLOSSA_MODEL_DIR` environment variable.
pub(crate) fn shared() -> Arc<ModelRegistry> {
    static SHARED: LazyLock<Arc<ModelRegistry>> = LazyLock::new(|| {
        let root = std::env::var_os("GLOSSA_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("models"));
        Arc::new(ModelRegistry::new(root))
    });
    SHARED.clone()
}

impl ModelRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            probabilities: RwLock::new(HashMap::new()),
            counts: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            load_done: Condvar::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads (or returns the cached) probability model for one
    /// (language, order) pair.
    pub fn load_probability(
        &self,
        language: Language,
        order: usize,
    ) -> Result<Arc<NgramProbabilityModel>, ModelLoadError> {
        assert!(
            (MIN_ORDER..=MAX_ORDER).contains(&order),
            "n-gram order out of range: {order}"
        );
        let key = CacheKey::Probability(language, order);
        loop {
            if let Some(model) = read_lock(&self.probabilities).get(&(language, order)) {
                return Ok(model.clone());
            }
            if !self.claim(key) {
                continue;
            }
            // We own the load for this key now; double-check the cache
            // in case a load finished between the miss and the claim.
            if let Some(model) = read_lock(&self.probabilities).get(&(language, order)) {
                let model = model.clone();
                self.release(key);
                return Ok(model);
            }
            let loaded = self.read_probability(language, order);
            let result = loaded.map(|model| {
                let mut cache = write_lock(&self.probabilities);
                cache
                    .entry((language, order))
                    .or_insert_with(|| Arc::new(model))
                    .clone()
            });
            self.release(key);
            return result;
        }
    }

    /// Loads (or returns the cached) count model for one (language,
    /// order, kind) triple. A missing file yields an empty model;
    /// a present but unreadable or malformed file is an error.
    pub fn load_count(
        &self,
        language: Language,
        order: usize,
        kind: ModelKind,
    ) -> Result<Arc<NgramCountModel>, ModelLoadError> {
        assert!(
            (MIN_ORDER..=MAX_ORDER).contains(&order),
            "n-gram order out of range: {order}"
        );
        let key = CacheKey::Count(language, order, kind);
        loop {
            if let Some(model) = read_lock(&self.counts).get(&(language, order, kind)) {
                return Ok(model.clone());
            }
            if !self.claim(key) {
                continue;
            }
            if let Some(model) = read_lock(&self.counts).get(&(language, order, kind)) {
                let model = model.clone();
                self.release(key);
                return Ok(model);
            }
            let loaded = self.read_count(language, order, kind);
            let result = loaded.map(|model| {
                let mut cache = write_lock(&self.counts);
                cache
                    .entry((language, order, kind))
                    .or_insert_with(|| Arc::new(model))
                    .clone()
            });
            self.release(key);
            return result;
        }
    }

    /// Evicts every cached model. In-flight loads complete normally and
    /// reinsert their result.
    pub fn clear(&self) {
        write_lock(&self.probabilities).clear();
        write_lock(&self.counts).clear();
        debug!("model registry cleared");
    }

    /// Number of resident models, probability and count together.
    pub fn len(&self) -> usize {
        read_lock(&self.probabilities).len() + read_lock(&self.counts).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claims the load for `key`. Returns false after having waited for
    /// another thread's load of the same key; the caller re-checks the
    /// cache in that case.
    fn claim(&self, key: CacheKey) -> bool {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.insert(key) {
            return true;
        }
        let guard = self
            .load_done
            .wait_while(in_flight, |set| set.contains(&key))
            .unwrap_or_else(PoisonError::into_inner);
        drop(guard);
        false
    }

    fn release(&self, key: CacheKey) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.remove(&key);
        drop(in_flight);
        self.load_done.notify_all();
    }

    fn read_probability(
        &self,
        language: Language,
        order: usize,
    ) -> Result<NgramProbabilityModel, ModelLoadError> {
        let path = self.model_path(language, order, None);
        debug!(language = %language, order, path = %path.display(), "loading probability model");
        let json = read_payload(&path)?;
        NgramProbabilityModel::from_json(&json, language, order, &path)
    }

    fn read_count(
        &self,
        language: Language,
        order: usize,
        kind: ModelKind,
    ) -> Result<NgramCountModel, ModelLoadError> {
        let path = self.model_path(language, order, Some(kind));
        match File::open(&path) {
            Ok(file) => {
                debug!(language = %language, order, path = %path.display(), "loading count model");
                let json = decompress(file, &path)?;
                NgramCountModel::from_json(&json, language, order, kind, &path)
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Ok(NgramCountModel::empty(language, order, kind))
            }
            Err(source) => Err(ModelLoadError::Io { path, source }),
        }
    }

    fn model_path(&self, language: Language, order: usize, kind: Option<ModelKind>) -> PathBuf {
        let file = match kind {
            None => format!("{}s.json.br", order_name(order)),
            Some(kind) => format!("{}_{}s.json.br", kind.file_stem(), order_name(order)),
        };
        self.root
            .join(language.iso_code_639_1())
            .join("models")
            .join(file)
    }
}

fn read_payload(path: &Path) -> Result<String, ModelLoadError> {
    let file = File::open(path).map_err(|source| ModelLoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    decompress(file, path)
}

fn decompress(file: File, path: &Path) -> Result<String, ModelLoadError> {
    let mut json = String::new();
    brotli::Decompressor::new(BufReader::new(file), 4096)
        .read_to_string(&mut json)
        .map_err(|source| ModelLoadError::Decompress {
            path: path.to_owned(),
            source,
        })?;
    Ok(json)
}

// Model maps are immutable after insertion; a panic while holding the
// lock cannot leave them inconsistent, so poisoning is ignored.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_paths_follow_the_resource_template() {
        let registry = ModelRegistry::new("models");
        assert_eq!(
            registry.model_path(Language::English, 3, None),
            PathBuf::from("models/en/models/trigrams.json.br")
        );
        assert_eq!(
            registry.model_path(Language::German, 1, Some(ModelKind::Unique)),
            PathBuf::from("models/de/models/unique_unigrams.json.br")
        );
        assert_eq!(
            registry.model_path(Language::French, 5, Some(ModelKind::MostCommon)),
            PathBuf::from("models/fr/models/most_common_fivegrams.json.br")
        );
    }

    #[test]
    fn missing_probability_model_is_an_io_error() {
        let registry = ModelRegistry::new("/nonexistent");
        let err = registry.load_probability(Language::English, 3).unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
    }

    #[test]
    fn missing_count_model_is_empty() {
        let registry = ModelRegistry::new("/nonexistent");
        let model = registry
            .load_count(Language::English, 3, ModelKind::Unique)
            .unwrap();
        assert!(model.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_order_is_a_bug() {
        let registry = ModelRegistry::new("models");
        let _ = registry.load_probability(Language::English, 6);
    }
}
