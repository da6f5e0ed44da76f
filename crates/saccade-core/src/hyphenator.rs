//! Long-word splitting along syllable-like boundaries.
//!
//! Words longer than the chunk threshold get broken into display-sized
//! fragments so each still fits the foveal window. Syllables come from a
//! vowel-to-consonant transition heuristic, not true syllabification.

use crate::orp::strip_trailing_punctuation;

pub const MAX_CHUNK_LENGTH_DEFAULT: usize = 13;
/// Upper bound on a fragment's character count, barring an oversized syllable.
pub const TARGET_FRAGMENT_LEN: usize = 8;

const VOWELS: &str = "aeiouyAEIOUY";

/// Whether a word (trailing punctuation stripped) exceeds the threshold.
pub fn needs_hyphenation(word: &str, max_length: usize) -> bool {
    strip_trailing_punctuation(word).chars().count() > max_length
}

/// Splits an over-long word into display fragments.
///
/// Every fragment but the last carries a `-` continuation mark; the original
/// trailing punctuation run moves to the last fragment. Words at or under the
/// threshold (punctuation excluded) come back unchanged as a single element.
pub fn hyphenate(word: &str, max_length: usize) -> Vec<String> {
    if word.chars().count() <= max_length {
        return vec![word.to_string()];
    }

    let stem = strip_trailing_punctuation(word);
    let punctuation = &word[stem.len()..];

    // Punctuation alone does not force a split.
    if stem.chars().count() <= max_length {
        return vec![word.to_string()];
    }

    let syllables = split_syllables(stem);
    let fragments = group_syllables(stem, &syllables, TARGET_FRAGMENT_LEN);

    let last = fragments.len() - 1;
    fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| {
            if i == last {
                format!("{fragment}{punctuation}")
            } else {
                format!("{fragment}-")
            }
        })
        .collect()
}

/// Splits a word into syllable-like units.
///
/// A unit ends at a vowel-to-consonant transition once it has accumulated at
/// least two characters; words of three characters or fewer stay whole.
pub fn split_syllables(word: &str) -> Vec<&str> {
    if word.chars().count() <= 3 {
        return vec![word];
    }

    let mut units = Vec::new();
    let mut start = 0usize;
    let mut unit_chars = 0usize;
    let mut prev_was_vowel = false;

    for (idx, c) in word.char_indices() {
        let is_vowel = VOWELS.contains(c);
        if prev_was_vowel && !is_vowel && unit_chars >= 2 {
            units.push(&word[start..idx]);
            start = idx;
            unit_chars = 1;
        } else {
            unit_chars += 1;
        }
        prev_was_vowel = is_vowel;
    }

    if start < word.len() {
        units.push(&word[start..]);
    }

    units
}

/// Greedily packs consecutive syllables into fragments of at most `target`
/// characters. A fragment is closed only when the next syllable would
/// overflow it and it already holds something, so a single oversized
/// syllable still becomes its own fragment.
fn group_syllables<'a>(stem: &'a str, syllables: &[&str], target: usize) -> Vec<&'a str> {
    let mut fragments = Vec::new();
    let mut frag_start = 0usize;
    let mut frag_chars = 0usize;
    let mut cursor = 0usize;

    for syllable in syllables {
        let syllable_chars = syllable.chars().count();
        if frag_chars + syllable_chars > target && frag_chars > 0 {
            fragments.push(&stem[frag_start..cursor]);
            frag_start = cursor;
            frag_chars = 0;
        }
        cursor += syllable.len();
        frag_chars += syllable_chars;
    }

    if frag_start < stem.len() {
        fragments.push(&stem[frag_start..]);
    }

    fragments
}
