//! Heuristic multi-language segmentation (experimental).
//!
//! Greedy word-window classification: the detector runs over a short
//! sliding window anchored at each word; a span boundary opens where
//! the window's gated best language changes, and windows that fail the
//! confidence gate inherit the current span's language. Indices refer
//! to the original input's bytes.

use crate::detector::{DetectionResult, DetectorError, LanguageDetector};
use crate::language::Language;

const WINDOW_WORDS: usize = 3;

pub(crate) fn detect_multiple(
    detector: &LanguageDetector,
    text: &str,
) -> Result<Vec<DetectionResult>, DetectorError> {
    let spans_of_words = word_spans(text);
    if spans_of_words.is_empty() {
        return Ok(Vec::new());
    }

    let mut labels: Vec<Option<Language>> = Vec::with_capacity(spans_of_words.len());
    for i in 0..spans_of_words.len() {
        let last = (i + WINDOW_WORDS).min(spans_of_words.len()) - 1;
        let window = &text[spans_of_words[i].0..spans_of_words[last].1];
        labels.push(detector.detect_best(window)?);
    }

    // Seed with the first gated label; a text where no window passes
    // the gate falls back to the global best, or yields nothing at all.
    let seed = match labels.iter().flatten().next().copied() {
        Some(language) => language,
        None => match detector.detect_best(text)? {
            Some(language) => language,
            None => return Ok(Vec::new()),
        },
    };

    let mut results = Vec::new();
    let mut current = seed;
    let mut span_start = 0;
    for (i, label) in labels.iter().enumerate().skip(1) {
        let label = label.unwrap_or(current);
        if label != current {
            results.push(make_result(current, &spans_of_words[span_start..i]));
            current = label;
            span_start = i;
        }
    }
    results.push(make_result(current, &spans_of_words[span_start..]));
    Ok(results)
}

/// Byte ranges of the whitespace-delimited words of the original text.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

fn make_result(language: Language, words: &[(usize, usize)]) -> DetectionResult {
    DetectionResult {
        language,
        start_index: words[0].0,
        end_index: words[words.len() - 1].1,
        word_count: words.len(),
    }
}
