/// Canonical form used for word-by-word comparison: lower-cased, punctuation
/// dropped, any whitespace run (newlines included) collapsed to a single
/// space, leading/trailing space trimmed.
///
/// Total over all inputs and idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            // Leading whitespace never materializes.
            if !out.is_empty() {
                pending_space = true;
            }
        } else if ch.is_alphanumeric() {
            // Lowercasing can expand into a letter plus combining marks
            // (e.g. U+0130); only the alphanumeric parts survive.
            for lower in ch.to_lowercase().filter(|c| c.is_alphanumeric()) {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(lower);
            }
        }
        // Everything else is punctuation/symbols: dropped.
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Hello, World!"), "hello world");
    }

    #[test]
    fn collapses_whitespace_and_newlines() {
        assert_eq!(normalize("a\n\nb\t c   d"), "a b c d");
    }

    #[test]
    fn trims_leading_and_trailing_space() {
        assert_eq!(normalize("  spaced out  "), "spaced out");
    }

    #[test]
    fn empty_and_punctuation_only_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!... --- ;;"), "");
    }

    #[test]
    fn punctuation_inside_words_is_dropped() {
        assert_eq!(normalize("don't stop"), "dont stop");
    }

    #[test]
    fn dangling_punctuation_leaves_no_double_space() {
        assert_eq!(normalize("a - b"), "a b");
        assert_eq!(normalize("a ... "), "a");
    }

    #[test]
    fn expanding_lowercase_keeps_only_alphanumerics() {
        // U+0130 lowercases to 'i' plus a combining dot above.
        assert_eq!(normalize("\u{130}"), "i");
        assert_eq!(normalize("\u{130}stanbul"), "istanbul");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "",
            "Hello, World!",
            "  A\nB\tC  ",
            "already normalized",
            "MIXED case With 123 numbers!!!",
            "\u{130} \u{130}stanbul",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
