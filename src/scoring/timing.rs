pub const VERY_FAST: &str = "very fast/consistent";
pub const MOSTLY_CONSISTENT: &str = "mostly consistent, slight pauses";
pub const SLOW: &str = "slow, noticeable pauses";

/// Qualitative consistency label from total elapsed time. These are coarse
/// duration buckets; no per-keystroke timestamps are retained, so this is
/// not a variance measurement. Boundary values fall into the lower bucket.
pub fn classify(elapsed_secs: u64) -> &'static str {
    if elapsed_secs <= 10 {
        VERY_FAST
    } else if elapsed_secs <= 30 {
        MOSTLY_CONSISTENT
    } else {
        SLOW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries_go_low() {
        assert!(classify(10).starts_with("very fast"));
        assert!(classify(11).starts_with("mostly consistent"));
        assert!(classify(30).starts_with("mostly consistent"));
        assert!(classify(31).starts_with("slow"));
    }

    #[test]
    fn zero_is_very_fast() {
        assert_eq!(classify(0), VERY_FAST);
    }

    #[test]
    fn large_values_are_slow() {
        assert_eq!(classify(3600), SLOW);
    }
}
