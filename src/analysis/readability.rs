// Flesch–Kincaid grade level.
//
//   grade = 0.39 * (words / sentences) + 11.8 * (syllables / words) - 15.59
//
// Sentence and word counts come from `tokens`; syllables from the vowel-run
// heuristic in `syllables`.

use serde::Serialize;

use super::syllables::estimate_syllables;
use super::tokens;

/// Raw counts behind a readability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStats {
    pub sentences: usize,
    pub words: usize,
    pub syllables: u32,
}

impl TextStats {
    /// Count sentences, words and syllables in `text`.
    pub fn from_text(text: &str) -> Self {
        let words = tokens::words(text);
        Self {
            sentences: tokens::sentences(text).len(),
            words: words.len(),
            syllables: words.iter().map(|w| estimate_syllables(w)).sum(),
        }
    }

    /// Grade level for these counts, rounded to two decimals.
    ///
    /// Returns 0.0 when there are no sentences or no words.
    pub fn grade(&self) -> f64 {
        if self.sentences == 0 || self.words == 0 {
            return 0.0;
        }
        let words_per_sentence = self.words as f64 / self.sentences as f64;
        let syllables_per_word = self.syllables as f64 / self.words as f64;
        round2(0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59)
    }
}

/// Estimate the Flesch–Kincaid grade level of `text`.
pub fn flesch_kincaid_grade(text: &str) -> f64 {
    TextStats::from_text(text).grade()
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
