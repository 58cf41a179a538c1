#[cfg(test)]
mod prop_tests {
    use super::fixtures::detector_for;
    use crate::cleaner::clean;
    use crate::Language;
    use proptest::prelude::*;

    fn trio() -> crate::LanguageDetector {
        detector_for(&[Language::English, Language::French, Language::German])
    }

    proptest! {
        // Confidence values cover every configured language, sum to one
        // whenever evidence exists, and are sorted by probability
        // descending with ties broken by tag order.
        #[test]
        fn confidence_values_are_a_sorted_distribution(text in "[a-zA-Z ]{0,60}") {
            let detector = trio();
            let values = detector.confidence_values(&text).unwrap();
            if text.is_empty() {
                prop_assert!(values.is_empty());
                return Ok(());
            }
            prop_assert_eq!(values.len(), 3);
            let sum: f64 = values.iter().map(|&(_, p)| p).sum();
            let has_words = !clean(&text).is_empty();
            if has_words {
                prop_assert!((sum - 1.0).abs() < 1e-9, "sum {}", sum);
            } else {
                prop_assert_eq!(sum, 0.0);
            }
            for pair in values.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
                if pair[0].1 == pair[1].1 {
                    prop_assert!(pair[0].0 < pair[1].0, "tie not broken by tag order");
                }
            }
        }

        // A best-language answer is exactly the argmax and respects the
        // distance gate.
        #[test]
        fn detect_best_agrees_with_the_distribution(text in "[a-zA-Z ]{0,60}") {
            let detector = trio();
            let best = detector.detect_best(&text).unwrap();
            let values = detector.confidence_values(&text).unwrap();
            match best {
                Some(language) => {
                    prop_assert_eq!(values[0].0, language);
                    let p2 = values.get(1).map_or(0.0, |&(_, p)| p);
                    prop_assert!(values[0].1 > p2);
                }
                None => {
                    if let (Some(first), Some(second)) = (values.first(), values.get(1)) {
                        prop_assert!(first.1 <= second.1 || first.1 == 0.0);
                    }
                }
            }
        }

        // The single-language query equals the distribution entry.
        #[test]
        fn confidence_matches_distribution(text in "[a-zA-Z àéèöü]{0,40}") {
            let detector = trio();
            let values = detector.confidence_values(&text).unwrap();
            for &(language, p) in &values {
                prop_assert_eq!(detector.confidence(&text, language).unwrap(), p);
            }
        }

        // Cleaning is idempotent, so detecting cleaned text changes
        // nothing.
        #[test]
        fn detection_is_stable_under_cleaning(text in "\\PC{0,80}") {
            let detector = trio();
            let cleaned = clean(&text).into_owned();
            prop_assert_eq!(
                detector.detect_best(&cleaned).unwrap(),
                detector.detect_best(&text).unwrap()
            );
        }

        // Text written entirely in a single-language script resolves to
        // that language, configured models or not.
        #[test]
        fn single_language_script_always_wins(text in "[\\u{AC00}-\\u{D7AF}]{1,20}") {
            let detector = detector_for(&[Language::English, Language::Korean]);
            prop_assert_eq!(detector.detect_best(&text).unwrap(), Some(Language::Korean));
        }

        // Cleaning invariants feeding the pipeline.
        #[test]
        fn cleaning_is_idempotent(text in "\\PC{0,200}") {
            let once = clean(&text).into_owned();
            let twice = clean(&once).into_owned();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn cleaned_text_has_no_digits_or_double_spaces(text in "\\PC{0,200}") {
            let cleaned = clean(&text);
            prop_assert!(!cleaned.contains("  "));
            prop_assert!(!cleaned.starts_with(' ') && !cleaned.ends_with(' '));
            prop_assert!(cleaned.chars().all(|c| !c.is_numeric()));
            prop_assert!(cleaned.chars().all(|c| !c.is_ascii_uppercase()));
        }
    }
}
