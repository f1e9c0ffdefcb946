//! Text normalization shared by skill detection, title matching, and TF-IDF.
//!
//! Token characters are alphanumerics plus `+`, `#` and `.` so that `c++`, `c#`
//! and `node.js` survive as single tokens. Everything else separates tokens.
//! Aliases and documents go through the same tokenizer, so `ci/cd` in a vocabulary
//! and `CI/CD` in a posting both become `ci cd`.

use std::collections::BTreeMap;

/// English stop words, sorted for binary search.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "etc", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
    "if", "in", "into", "is", "it", "its", "itself", "just", "may", "me", "more", "most",
    "must", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "shall",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "us", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "within",
    "would", "you", "your", "yours", "yourself", "yourselves",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Lower-cases and splits `text` into tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|raw| raw.trim_end_matches('.'))
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .map(String::from)
        .collect()
}

/// Lower-cased, punctuation-stripped, whitespace-joined form of `text`.
pub fn normalize_body(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Tokens of `text` that are not stop words.
pub fn significant_words(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .collect()
}

/// The `limit` most frequent alphabetic non-stop words longer than two letters. Ties go
/// to the word seen first.
pub fn top_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (position, word) in significant_words(text).into_iter().enumerate() {
        if word.chars().count() > 2 && word.chars().all(char::is_alphabetic) {
            counts.entry(word).or_insert((0, position)).0 += 1;
        }
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    ranked.into_iter().take(limit).map(|(word, _, _)| word).collect()
}

/// "senior backend engineer" → "Senior Backend Engineer", keeping common acronyms.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| match word {
            "ml" => "ML".to_string(),
            "ai" => "AI".to_string(),
            "qa" => "QA".to_string(),
            "ui" => "UI".to_string(),
            "ux" => "UX".to_string(),
            "ios" => "iOS".to_string(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_keywords_rank_by_frequency() {
        let keywords = top_keywords(
            "Kafka pipelines. We run Kafka and Spark; kafka on k8s, spark jobs, C++ too.",
            3,
        );
        assert_eq!(keywords, vec!["kafka", "spark", "pipelines"]);
    }

    #[test]
    fn test_top_keywords_skip_short_and_non_alphabetic_words() {
        assert!(top_keywords("go c++ k8s the and", 10).is_empty());
    }

    #[test]
    fn test_stop_words_are_sorted() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS);
    }

    #[test]
    fn test_tokenize_keeps_language_punctuation() {
        assert_eq!(
            tokenize("C++, C# and Node.js."),
            vec!["c++", "c#", "and", "node.js"]
        );
    }

    #[test]
    fn test_tokenize_splits_slashes_and_hyphens() {
        assert_eq!(tokenize("CI/CD full-stack"), vec!["ci", "cd", "full", "stack"]);
    }

    #[test]
    fn test_tokenize_drops_punctuation_only_runs() {
        assert_eq!(tokenize("--- ... + # !!"), Vec::<String>::new());
    }

    #[test]
    fn test_leading_dot_survives() {
        assert_eq!(tokenize(".NET"), vec![".net"]);
    }

    #[test]
    fn test_normalize_body_collapses_whitespace() {
        assert_eq!(
            normalize_body("  Senior\tEngineer!\n\nRust  "),
            "senior engineer rust"
        );
    }

    #[test]
    fn test_normalize_body_of_punctuation_is_empty() {
        assert!(normalize_body("!!! ??? ...").is_empty());
    }

    #[test]
    fn test_significant_words_drop_stop_words() {
        assert_eq!(
            significant_words("Head of the Data Team"),
            vec!["head", "data", "team"]
        );
    }

    #[test]
    fn test_title_case_handles_acronyms() {
        assert_eq!(title_case("senior ml engineer"), "Senior ML Engineer");
        assert_eq!(title_case("ios developer"), "iOS Developer");
    }
}
