use crate::entities::SimilarityScorer;

/// Slides a window of as many words as the needle has over the haystack and
/// keeps the best normalized Levenshtein distance. "juan perez" scores 0.0
/// in "cliente juan perez 5 panes"; "3" scores 1.0 against "20".
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEditDistance;

impl SimilarityScorer for TokenEditDistance {
    fn score(&self, needle: &str, haystack: &str) -> f64 {
        let needle = needle.to_lowercase();
        let needle_tokens: Vec<&str> = needle.split_whitespace().collect();
        if needle_tokens.is_empty() {
            return 1.0;
        }
        let needle = needle_tokens.join(" ");

        let haystack = haystack.to_lowercase();
        let haystack_tokens: Vec<&str> = haystack
            .split(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':'))
            .filter(|t| !t.is_empty())
            .collect();
        if haystack_tokens.len() < needle_tokens.len() {
            return normalized_distance(&needle, &haystack_tokens.join(" "));
        }

        haystack_tokens
            .windows(needle_tokens.len())
            .map(|w| normalized_distance(&needle, &w.join(" ")))
            .fold(1.0, f64::min)
    }
}

fn normalized_distance(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    (levenshtein(a, b) as f64 / longest as f64).min(1.0)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("peña", "pena"), 1);
    }

    #[test]
    fn exact_word_window_scores_zero() {
        let s = TokenEditDistance;
        assert_eq!(s.score("Juan Perez", "cliente juan perez 5 panes"), 0.0);
        assert_eq!(s.score("3", "cliente 3 5 panes"), 0.0);
    }

    #[test]
    fn numbers_only_match_whole_tokens() {
        let s = TokenEditDistance;
        assert_eq!(s.score("3", "pago 20 soles"), 1.0);
        assert!(s.score("12", "pago 2") >= 0.5);
    }

    #[test]
    fn tolerates_small_misspellings() {
        let s = TokenEditDistance;
        let score = s.score("Rosario", "rosaria 2 kekes");
        assert!(score > 0.0 && score < 0.4, "score {score}");
    }

    #[test]
    fn empty_needle_never_matches() {
        assert_eq!(TokenEditDistance.score("  ", "anything"), 1.0);
    }
}
