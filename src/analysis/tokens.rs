// Tokenization shared by the readability and density analyzers.
//
// Words are maximal runs of ASCII letters, digits and apostrophes. Sentence
// boundaries are approximated by runs of `.`, `!` and `?`. Both rules feed
// the Flesch–Kincaid denominators, so they must stay exactly as written.

use std::sync::LazyLock;

use regex_lite::Regex;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9']+").expect("word pattern compiles"));

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern compiles"));

/// All word tokens in `text`, case preserved, in document order.
pub fn words(text: &str) -> Vec<&str> {
    WORD_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Word tokens of the lowercased text.
pub fn lowercase_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Sentence fragments between terminators, skipping blank ones.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .filter(|fragment| !fragment.trim().is_empty())
        .collect()
}
