use crate::scoring::normalize::normalize;

/// Positional word-by-word accuracy of `typed` against `reference`, as a
/// whole percentage point in [0, 100].
///
/// Both texts are normalized and split into words; position i counts as
/// correct when the words are exactly equal. The denominator is the
/// reference word count, so a perfectly typed prefix of a longer reference
/// scores proportionally low rather than 100.
///
/// Known limitation: a single early omission misaligns every later position.
pub fn score(reference: &str, typed: &str) -> f64 {
    if typed.trim().is_empty() {
        return 0.0;
    }

    let reference = normalize(reference);
    let typed = normalize(typed);

    let ref_words: Vec<&str> = reference.split(' ').filter(|w| !w.is_empty()).collect();
    if ref_words.is_empty() {
        // Empty reference: defined as 0, not a division error.
        return 0.0;
    }
    let typed_words: Vec<&str> = typed.split(' ').filter(|w| !w.is_empty()).collect();

    let correct = ref_words
        .iter()
        .zip(typed_words.iter())
        .filter(|(r, t)| r == t)
        .count();

    (correct as f64 / ref_words.len() as f64 * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_100() {
        assert_eq!(score("the cat sat", "the cat sat"), 100.0);
    }

    #[test]
    fn one_wrong_word_out_of_three() {
        assert_eq!(score("the cat sat", "the dog sat"), 67.0);
    }

    #[test]
    fn empty_typed_is_zero() {
        assert_eq!(score("anything at all", ""), 0.0);
        assert_eq!(score("anything at all", "   \n\t "), 0.0);
    }

    #[test]
    fn empty_reference_is_zero() {
        assert_eq!(score("", "typed something"), 0.0);
        assert_eq!(score("?!.", "typed something"), 0.0);
    }

    #[test]
    fn prefix_scores_against_full_reference() {
        // Two of four reference words typed correctly.
        assert_eq!(score("one two three four", "one two"), 50.0);
    }

    #[test]
    fn extra_typed_words_do_not_add_credit() {
        assert_eq!(score("one two", "one two three four"), 100.0);
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        assert_eq!(score("Hello, world!", "hello world"), 100.0);
    }

    #[test]
    fn early_omission_misaligns_later_words() {
        // Documented positional behavior: dropping "quick" shifts everything.
        assert_eq!(score("the quick brown fox", "the brown fox"), 25.0);
    }

    #[test]
    fn bounded_for_arbitrary_inputs() {
        let cases = [
            ("", ""),
            ("a", "b"),
            ("a b c", "a b c d e f"),
            ("lots of words in here", "x"),
        ];
        for (r, t) in cases {
            let s = score(r, t);
            assert!((0.0..=100.0).contains(&s), "score({r:?}, {t:?}) = {s}");
        }
    }
}
