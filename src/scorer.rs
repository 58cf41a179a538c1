//! Log-probability scoring with lower-order back-off.
//!
//! For every candidate language the scorer averages the looked-up
//! log-probabilities per n-gram order and sums the averages across
//! orders. A miss at order n falls back to the left prefix of order
//! n − 1; a miss at order 1 contributes 0 so a single unknown character
//! cannot wipe out a language.

use crate::language::Language;
use crate::model::{ModelKind, ModelLoadError, NgramProbabilityModel};
use crate::ngram::{ngrams, NgramRef};
use crate::registry::ModelRegistry;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;

const HIGH_ACCURACY_ORDERS: &[usize] = &[1, 2, 3, 4, 5];
const LOW_ACCURACY_ORDERS: &[usize] = &[3];

/// Occurrence tally of the n-grams of one order across all words.
/// Ordered so score summation is deterministic down to the last bit.
struct OrderTally<'a> {
    order: usize,
    counts: BTreeMap<&'a str, usize>,
    total: usize,
}

fn tally<'a>(words: &[&'a str], order: usize) -> OrderTally<'a> {
    let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
    let mut total = 0;
    for word in words {
        for gram in ngrams(word, order) {
            *counts.entry(gram).or_insert(0) += 1;
            total += 1;
        }
    }
    OrderTally {
        order,
        counts,
        total,
    }
}

/// Computes the raw log-score of every candidate.
///
/// In low-accuracy mode only trigrams are extracted and candidates
/// whose most-common-trigram set is known and disjoint from the text
/// are pruned first.
pub(crate) fn raw_scores(
    words: &[&str],
    candidates: &[Language],
    low_accuracy: bool,
    registry: &ModelRegistry,
) -> Result<Vec<(Language, f64)>, ModelLoadError> {
    let orders = if low_accuracy {
        LOW_ACCURACY_ORDERS
    } else {
        HIGH_ACCURACY_ORDERS
    };
    let tallies: Vec<OrderTally> = orders.iter().map(|&n| tally(words, n)).collect();

    let mut scored: SmallVec<[Language; 8]> = candidates.iter().copied().collect();
    if low_accuracy {
        if let Some(trigrams) = tallies.iter().find(|t| t.order == 3) {
            prune_by_most_common(&mut scored, trigrams, registry)?;
        }
    }

    let max_order = orders.iter().copied().max().unwrap_or(0);
    let mut result = Vec::with_capacity(scored.len());
    for &language in &scored {
        let mut models: SmallVec<[Arc<NgramProbabilityModel>; 5]> = SmallVec::new();
        for order in 1..=max_order {
            models.push(registry.load_probability(language, order)?);
        }
        let mut raw = 0.0;
        for tally in &tallies {
            if tally.total == 0 {
                continue;
            }
            let mut sum = 0.0;
            for (&gram, &count) in &tally.counts {
                sum += lookup(&models, gram) * count as f64;
            }
            raw += sum / tally.total as f64;
        }
        result.push((language, raw));
    }
    Ok(result)
}

/// Back-off lookup: the stored log-probability of the longest known
/// left prefix, or 0 when even the unigram is unknown.
fn lookup(models: &[Arc<NgramProbabilityModel>], gram: &str) -> f64 {
    for ngram in NgramRef::new(gram).lower_order_chain() {
        if let Some(log_probability) = models[ngram.order() - 1].log_probability(ngram.value()) {
            return log_probability;
        }
    }
    0.0
}

/// Drops candidates whose most-common-trigram set is present and shares
/// no trigram with the text. Pruning everything means the sets carry no
/// signal for this text, so it is discarded.
fn prune_by_most_common(
    candidates: &mut SmallVec<[Language; 8]>,
    trigrams: &OrderTally,
    registry: &ModelRegistry,
) -> Result<(), ModelLoadError> {
    if trigrams.total == 0 {
        return Ok(());
    }
    let mut kept: SmallVec<[Language; 8]> = SmallVec::new();
    for &language in candidates.iter() {
        let most_common = registry.load_count(language, 3, ModelKind::MostCommon)?;
        if most_common.is_empty() || trigrams.counts.keys().any(|g| most_common.contains(g)) {
            kept.push(language);
        }
    }
    if !kept.is_empty() {
        *candidates = kept;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_multiplicities() {
        let t = tally(&["aba", "ba"], 2);
        assert_eq!(t.total, 3);
        assert_eq!(t.counts["ab"], 1);
        assert_eq!(t.counts["ba"], 2);
    }

    #[test]
    fn tally_of_short_words_is_empty() {
        let t = tally(&["ab"], 3);
        assert_eq!(t.total, 0);
        assert!(t.counts.is_empty());
    }
}
