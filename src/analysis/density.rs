// Keyword density: how often a phrase starts within a body of text.
//
// Both the body and the keyword are lowercased and tokenized the same way.
// A window the length of the keyword slides over every body position; each
// exact word-for-word match counts once. No stemming, no partial words.

use thiserror::Error;

use super::readability::round2;
use super::tokens;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DensityError {
    /// The keyword tokenized to zero words, so every window would match.
    #[error("keyword phrase contains no words")]
    EmptyKeyword,
}

/// Fraction of body words at which `keyword` starts.
///
/// Returns 0.0 for a body with no words, whatever the keyword. An empty
/// keyword against a non-empty body is rejected.
pub fn keyword_density(text: &str, keyword: &str) -> Result<f64, DensityError> {
    let body = tokens::lowercase_words(text);
    if body.is_empty() {
        return Ok(0.0);
    }

    let phrase = tokens::lowercase_words(keyword);
    if phrase.is_empty() {
        return Err(DensityError::EmptyKeyword);
    }

    Ok(phrase_occurrences(&body, &phrase) as f64 / body.len() as f64)
}

/// Keyword density as a percentage rounded to two decimals.
pub fn density_percent(text: &str, keyword: &str) -> Result<f64, DensityError> {
    keyword_density(text, keyword).map(|d| round2(d * 100.0))
}

/// Count window positions in `body` equal to `phrase`.
pub fn phrase_occurrences(body: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > body.len() {
        return 0;
    }
    body.windows(phrase.len())
        .filter(|window| *window == phrase)
        .count()
}
