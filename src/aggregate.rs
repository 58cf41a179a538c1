//! Raw log-score to probability conversion.

use crate::language::Language;

/// Normalizes raw log-scores into a probability distribution.
///
/// Subtracts the maximum before exponentiating so long inputs with very
/// negative scores cannot underflow to an all-zero distribution.
pub(crate) fn normalize(raw: &[(Language, f64)]) -> Vec<(Language, f64)> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw.iter().map(|&(_, s)| s).fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = raw.iter().map(|&(_, s)| (s - max).exp()).collect();
    let sum: f64 = weights.iter().sum();
    raw.iter()
        .zip(weights)
        .map(|(&(language, _), w)| (language, w / sum))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_sum_to_one() {
        let raw = [
            (Language::English, -12.5),
            (Language::French, -14.0),
            (Language::German, -13.1),
        ];
        let dist = normalize(&raw);
        let sum: f64 = dist.iter().map(|&(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn higher_raw_score_means_higher_probability() {
        let raw = [(Language::English, -10.0), (Language::German, -20.0)];
        let dist = normalize(&raw);
        let english = dist.iter().find(|&&(l, _)| l == Language::English).unwrap().1;
        let german = dist.iter().find(|&&(l, _)| l == Language::German).unwrap().1;
        assert!(english > german);
    }

    #[test]
    fn extreme_scores_do_not_underflow() {
        let raw = [(Language::English, -8000.0), (Language::German, -8010.0)];
        let dist = normalize(&raw);
        assert!(dist.iter().all(|&(_, p)| p.is_finite()));
        let sum: f64 = dist.iter().map(|&(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_entry_is_certain() {
        let dist = normalize(&[(Language::English, -42.0)]);
        assert_eq!(dist, vec![(Language::English, 1.0)]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn equal_scores_split_evenly() {
        let raw = [(Language::English, -5.0), (Language::German, -5.0)];
        let dist = normalize(&raw);
        assert!((dist[0].1 - 0.5).abs() < 1e-12);
        assert!((dist[1].1 - 0.5).abs() < 1e-12);
    }
}
