use std::sync::LazyLock;

use regex::{Captures, Regex};

const NUMBER_WORDS: &[(&str, &str)] = &[
    ("un", "1"),
    ("una", "1"),
    ("uno", "1"),
    ("dos", "2"),
    ("tres", "3"),
    ("cuatro", "4"),
    ("cinco", "5"),
    ("seis", "6"),
    ("siete", "7"),
    ("ocho", "8"),
    ("nueve", "9"),
    ("diez", "10"),
    ("once", "11"),
    ("doce", "12"),
    ("trece", "13"),
    ("catorce", "14"),
    ("quince", "15"),
    ("dieciseis", "16"),
    ("dieciséis", "16"),
    ("diecisiete", "17"),
    ("dieciocho", "18"),
    ("diecinueve", "19"),
    ("veinte", "20"),
];

static NUMBER_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Longest alternatives first so "una" is not cut short by "un".
    let mut words: Vec<&str> = NUMBER_WORDS.iter().map(|(w, _)| *w).collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|")))
        .expect("number word pattern is a fixed literal alternation")
});

/// Replaces spoken Spanish cardinals (un..veinte) with digits, whole words
/// only, ignoring case. Text without number words comes back unchanged.
pub fn normalize_number_words(text: &str) -> String {
    NUMBER_WORD_RE
        .replace_all(text, |caps: &Captures| {
            let word = caps[0].to_lowercase();
            NUMBER_WORDS
                .iter()
                .find(|(w, _)| *w == word)
                .map_or_else(|| caps[0].to_string(), |(_, digits)| digits.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_whole_words_only() {
        assert_eq!(
            normalize_number_words("cinco panes y una docena"),
            "5 panes y 1 docena"
        );
        // "dosis" and "unas" are not number words.
        assert_eq!(normalize_number_words("dosis unas"), "dosis unas");
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(normalize_number_words("Veinte SOLES"), "20 SOLES");
        assert_eq!(normalize_number_words("Dieciséis keke"), "16 keke");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize_number_words("cliente tres, diez panes, pago 15.50");
        assert_eq!(once, "cliente 3, 10 panes, pago 15.50");
        assert_eq!(normalize_number_words(&once), once);
        assert_eq!(normalize_number_words("12 panes 3"), "12 panes 3");
    }
}
