use crate::entities::SimilarityScorer;

/// Strict matcher: 0.0 if the needle's words appear consecutively in the
/// haystack (ignoring case), 1.0 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactToken;

impl SimilarityScorer for ExactToken {
    fn score(&self, needle: &str, haystack: &str) -> f64 {
        let needle = needle.to_lowercase();
        let haystack = haystack.to_lowercase();
        let needle: Vec<&str> = needle.split_whitespace().collect();
        let haystack: Vec<&str> = haystack.split_whitespace().collect();
        if needle.is_empty() || haystack.len() < needle.len() {
            return 1.0;
        }
        if haystack.windows(needle.len()).any(|w| w == needle.as_slice()) {
            0.0
        } else {
            1.0
        }
    }
}
