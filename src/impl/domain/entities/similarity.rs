/// Approximate string matcher used to pick a client out of free-form speech.
///
/// Scores range from 0.0 (exact) to 1.0 (no resemblance). Implementations
/// must be deterministic.
pub trait SimilarityScorer: Send + Sync {
    /// How well `needle` (a client's name or route number) occurs somewhere
    /// in `haystack` (the normalized utterance).
    fn score(&self, needle: &str, haystack: &str) -> f64;
}
