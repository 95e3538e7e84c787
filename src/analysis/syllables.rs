// Heuristic syllable counting.
//
// Counts the start of every run of vowels (a, e, i, o, u, y), then drops one
// for a trailing silent "e". Crude, but it only has to be stable: the
// readability grade is a trend signal, not a dictionary lookup.

/// Estimate the number of syllables in a single word.
///
/// Always returns at least 1. Callers pass non-empty tokens.
pub fn estimate_syllables(word: &str) -> u32 {
    let word = word.to_lowercase();

    let mut syllables = 0u32;
    let mut prev_was_vowel = false;
    for ch in word.chars() {
        let is_vowel = matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_was_vowel {
            syllables += 1;
        }
        prev_was_vowel = is_vowel;
    }

    if word.ends_with('e') && syllables > 1 {
        syllables -= 1;
    }

    syllables.max(1)
}
