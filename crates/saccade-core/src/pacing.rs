//! Per-word display duration calculation.
//!
//! Duration starts from the base per-word interval at the target WPM, then
//! optionally compounds a length multiplier (short words flash by, long words
//! linger) with a punctuation multiplier (clause and sentence pauses).

pub const MS_PER_MINUTE: u32 = 60_000;

/// Words with fewer letters than this get the short-word multiplier.
pub const SHORT_WORD_THRESHOLD: usize = 4;
/// Words with more letters than this get the long-word multiplier.
pub const LONG_WORD_THRESHOLD: usize = 12;

pub const SHORT_WORD_MULTIPLIER: f64 = 0.8;
pub const LONG_WORD_MULTIPLIER: f64 = 1.4;
/// Micro-pause after `,` `;` `:`.
pub const CLAUSE_PAUSE_MULTIPLIER: f64 = 2.0;
/// Cognitive wrap-up pause after `.` `!` `?`.
pub const SENTENCE_END_MULTIPLIER: f64 = 3.0;

/// Outcome of pacing one display unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PacingResult {
    pub duration_ms: u32,
    pub multiplier: f64,
    pub is_punctuation: bool,
}

/// Display duration for one word at `base_wpm`.
///
/// Pure and total: a zero WPM is absorbed rather than dividing by zero, and
/// range validation is the tokenizer's concern. The punctuation check only
/// applies when dynamic pacing is on, and the two multipliers compound.
pub fn word_duration(
    word: &str,
    base_wpm: u16,
    dynamic_pacing: bool,
    check_punctuation: bool,
) -> PacingResult {
    let base_interval = f64::from(MS_PER_MINUTE) / f64::from(base_wpm.max(1));

    let mut multiplier = 1.0;
    let mut is_punctuation = false;

    if dynamic_pacing {
        let letters = letter_only_length(word);
        if letters < SHORT_WORD_THRESHOLD {
            multiplier = SHORT_WORD_MULTIPLIER;
        } else if letters > LONG_WORD_THRESHOLD {
            multiplier = LONG_WORD_MULTIPLIER;
        }

        if check_punctuation {
            let pause = punctuation_multiplier(word);
            if pause > 1.0 {
                multiplier *= pause;
                is_punctuation = true;
            }
        }
    }

    PacingResult {
        duration_ms: (base_interval * multiplier).round() as u32,
        multiplier,
        is_punctuation,
    }
}

/// Letter count ignoring digits and punctuation.
pub fn letter_only_length(word: &str) -> usize {
    word.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

/// Pause multiplier for the word's last character, 1.0 when none applies.
pub fn punctuation_multiplier(word: &str) -> f64 {
    match word.chars().last() {
        Some('.' | '!' | '?') => SENTENCE_END_MULTIPLIER,
        Some(',' | ';' | ':') => CLAUSE_PAUSE_MULTIPLIER,
        _ => 1.0,
    }
}

/// Milliseconds per word at a given WPM.
pub fn wpm_to_ms(wpm: u16) -> f64 {
    f64::from(MS_PER_MINUTE) / f64::from(wpm.max(1))
}

/// WPM equivalent of a per-word interval.
pub fn ms_to_wpm(ms: f64) -> f64 {
    f64::from(MS_PER_MINUTE) / ms.max(1.0)
}
