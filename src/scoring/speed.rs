/// Words per minute under the 5-characters-per-word convention, reported to
/// one decimal place. The character count is the untrimmed typed text.
pub fn words_per_minute(typed: &str, elapsed_secs: u64) -> f64 {
    if typed.is_empty() || elapsed_secs == 0 {
        return 0.0;
    }
    let word_equivalents = typed.chars().count() as f64 / 5.0;
    let wpm = word_equivalents / elapsed_secs as f64 * 60.0;
    (wpm * 10.0).round() / 10.0
}
