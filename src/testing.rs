//! Support for building model fixtures.
//!
//! Counts n-grams in a small corpus and writes the same Brotli-compressed
//! JSON resources the loader consumes, so tests and benches can exercise
//! the full pipeline against a temporary model directory instead of the
//! shipped models.

use crate::cleaner::{clean, words};
use crate::language::Language;
use crate::model::ModelKind;
use crate::ngram::{ngrams, order_name, MAX_ORDER, MIN_ORDER};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes probability models of every order (1–5) for `language`,
/// estimated from `corpus`, under `root` in the persisted layout.
pub fn write_probability_models(
    root: &Path,
    language: Language,
    corpus: &str,
) -> std::io::Result<()> {
    let cleaned = clean(corpus);
    let word_list: Vec<&str> = words(&cleaned).collect();
    for order in MIN_ORDER..=MAX_ORDER {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for word in &word_list {
            for gram in ngrams(word, order) {
                *counts.entry(gram.to_owned()).or_insert(0) += 1;
            }
        }
        let total: u64 = counts.values().sum();
        // Group n-grams sharing a probability under one reduced-fraction key.
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (gram, count) in counts {
            let divisor = gcd(count, total);
            let key = format!("{}/{}", count / divisor, total / divisor);
            groups.entry(key).or_default().push(gram);
        }
        let ngram_groups: BTreeMap<String, String> = groups
            .into_iter()
            .map(|(key, grams)| (key, grams.join(" ")))
            .collect();
        let payload = json!({
            "language": language.tag(),
            "ngrams": ngram_groups,
        });
        let path = model_file(root, language, &format!("{}s.json.br", order_name(order)));
        write_compressed(&path, payload.to_string().as_bytes())?;
    }
    Ok(())
}

/// Writes one count model (unique or most-common n-grams of one order)
/// for `language` under `root`.
pub fn write_count_model(
    root: &Path,
    language: Language,
    order: usize,
    kind: ModelKind,
    ngram_list: &[&str],
) -> std::io::Result<()> {
    let payload = json!({
        "language": language.tag(),
        "ngrams": [ngram_list.join(" ")],
    });
    let file = format!("{}_{}s.json.br", kind.file_stem(), order_name(order));
    let path = model_file(root, language, &file);
    write_compressed(&path, payload.to_string().as_bytes())
}

fn model_file(root: &Path, language: Language, file: &str) -> PathBuf {
    root.join(language.iso_code_639_1()).join("models").join(file)
}

fn write_compressed(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut writer = brotli::CompressorWriter::new(file, 4096, 5, 22);
    writer.write_all(payload)?;
    writer.flush()
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}
