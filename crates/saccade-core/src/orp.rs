//! Focal-point (Optimal Recognition Point) calculation.
//!
//! The ORP is the character a reader's eye should fixate on, roughly 35% into
//! the word and biased toward the beginning. Indices count characters, not
//! bytes, so multi-byte words behave the same as ASCII ones.

pub const ORP_OFFSET_DEFAULT: f64 = 0.35;

/// Punctuation that may trail a word without being part of it.
pub(crate) fn is_trailing_punctuation(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '"' | ')' | '}' | ']' | '>'
    )
}

/// Returns the word without its trailing punctuation run.
pub fn strip_trailing_punctuation(word: &str) -> &str {
    word.trim_end_matches(is_trailing_punctuation)
}

/// Focal character index for a word.
///
/// Trailing punctuation is stripped for the length measurement only; the
/// returned index still addresses the original string. Words of stripped
/// length 3 or less focus the first character; longer words focus
/// `floor(len * offset)` clamped into `[1, len - 1]`.
pub fn orp_index(word: &str, offset: f64) -> usize {
    let stripped_len = strip_trailing_punctuation(word).chars().count();

    if stripped_len <= 3 {
        return 0;
    }

    let position = (stripped_len as f64 * offset).floor() as usize;
    position.clamp(1, stripped_len - 1)
}

/// Splits a word into `(before, focal, after)` around a focal index.
///
/// An out-of-range index is clamped to the last character, so the focal part
/// is never empty for a non-empty word.
pub fn split_at_orp(word: &str, index: usize) -> (&str, &str, &str) {
    let char_count = word.chars().count();
    if char_count == 0 {
        return ("", "", "");
    }

    let index = index.min(char_count - 1);
    let Some((start, focal)) = word.char_indices().nth(index) else {
        return (word, "", "");
    };
    let end = start + focal.len_utf8();

    (&word[..start], &word[start..end], &word[end..])
}
