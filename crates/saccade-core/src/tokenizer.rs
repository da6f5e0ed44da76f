//! Text to token-stream conversion.
//!
//! All semantic work happens here, once per text: whitespace normalization,
//! word splitting, sentence/paragraph boundary tracking, hyphenation of
//! over-long words, and per-token focal point and duration. Playback later
//! touches nothing but the numbers baked into each [`Token`].

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{EngineError, Result},
    hyphenator, orp, pacing,
    settings::{ReaderSettings, WPM_MAX, WPM_MIN},
};

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("static regex"));
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("static regex"));

/// Identifier of one token, unique and sequential within a tokenization run.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TokenId(pub u64);

/// Shared identifier of all fragments split from one over-long word.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HyphenGroupId(pub u64);

/// One pre-computed display unit: a whole word or a hyphenated fragment.
///
/// Immutable once created. `base_duration_ms` is the duration at the speed
/// the stream was tokenized at; live speed changes scale it during playback
/// instead of re-tokenizing.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub id: TokenId,
    /// Exact string to display, including trailing punctuation or a
    /// continuation mark.
    pub raw: String,
    /// Char index of the fixation character within `raw`.
    pub focal_index: usize,
    pub base_duration_ms: u32,
    /// Pacing multiplier that produced `base_duration_ms`.
    pub multiplier: f64,
    /// Whether this unit ends in a pacing-relevant punctuation mark.
    pub is_punctuation: bool,
    /// Set on every fragment of one hyphenated source word.
    pub hyphen_group: Option<HyphenGroupId>,
    /// Index into the original word sequence; shared by all fragments of a
    /// hyphenated word.
    pub source_index: usize,
    pub sentence_index: usize,
    pub paragraph_index: usize,
}

impl Token {
    pub fn is_hyphenated(&self) -> bool {
        self.hyphen_group.is_some()
    }
}

/// Inclusive word-index range of one sentence, plus its reconstructed text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentenceBoundary {
    pub start_index: usize,
    pub end_index: usize,
    pub text: String,
}

/// Inclusive word-index range of one paragraph and the sentence slots it owns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParagraphBoundary {
    pub start_index: usize,
    pub end_index: usize,
    /// Range into [`ContextMap::sentences`].
    pub sentences: core::ops::Range<usize>,
}

/// Sentence and paragraph boundaries over the original word sequence.
///
/// Ranges are contiguous, non-overlapping, and jointly cover every word index
/// exactly once; every sentence belongs to exactly one paragraph.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContextMap {
    pub sentences: Vec<SentenceBoundary>,
    pub paragraphs: Vec<ParagraphBoundary>,
}

impl ContextMap {
    /// Sentence index containing a word index, 0 on a miss.
    pub fn sentence_index_for(&self, word_index: usize) -> usize {
        self.sentences
            .iter()
            .position(|s| word_index >= s.start_index && word_index <= s.end_index)
            .unwrap_or(0)
    }

    /// Paragraph index containing a word index, 0 on a miss.
    pub fn paragraph_index_for(&self, word_index: usize) -> usize {
        self.paragraphs
            .iter()
            .position(|p| word_index >= p.start_index && word_index <= p.end_index)
            .unwrap_or(0)
    }

    /// Sentences belonging to one paragraph.
    pub fn paragraph_sentences(&self, paragraph_index: usize) -> &[SentenceBoundary] {
        self.paragraphs
            .get(paragraph_index)
            .map(|p| &self.sentences[p.sentences.clone()])
            .unwrap_or(&[])
    }

    /// Full text of one paragraph, rebuilt from its sentences.
    pub fn paragraph_text(&self, paragraph_index: usize) -> Option<String> {
        let paragraph = self.paragraphs.get(paragraph_index)?;
        let sentences = &self.sentences[paragraph.sentences.clone()];
        let mut text = String::new();
        for sentence in sentences {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&sentence.text);
        }
        Some(text)
    }
}

/// Everything `tokenize` produces for one text.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenizedText {
    pub tokens: Vec<Token>,
    pub context: ContextMap,
    pub total_duration_ms: u64,
    /// Count of source words, before hyphenation.
    pub word_count: usize,
    /// Speed the durations were computed at; playback rescales against it.
    pub tokenization_wpm: u16,
}

/// Converts raw text into a fully pre-computed token stream.
///
/// Fails fast with no partial output: empty or whitespace-only text is
/// [`EngineError::EmptyInput`], a speed outside `[WPM_MIN, WPM_MAX]` is
/// [`EngineError::InvalidWpm`]. Deterministic for fixed inputs, so it is safe
/// to re-run on every text load.
pub fn tokenize(text: &str, settings: &ReaderSettings) -> Result<TokenizedText> {
    if text.trim().is_empty() {
        return Err(EngineError::EmptyInput);
    }
    if !(WPM_MIN..=WPM_MAX).contains(&settings.base_wpm) {
        return Err(EngineError::InvalidWpm {
            wpm: settings.base_wpm,
        });
    }

    let normalized = normalize_whitespace(text);
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let context = build_context_map(&normalized);

    let mut tokens = Vec::with_capacity(words.len());
    let mut next_token_id = 0u64;
    let mut next_group_id = 0u64;

    // Boundary ranges are monotonic, so a pointer walk replaces per-word
    // scans of the context map.
    let mut sentence_cursor = 0usize;
    let mut paragraph_cursor = 0usize;

    for (source_index, word) in words.iter().enumerate() {
        while sentence_cursor + 1 < context.sentences.len()
            && source_index > context.sentences[sentence_cursor].end_index
        {
            sentence_cursor += 1;
        }
        while paragraph_cursor + 1 < context.paragraphs.len()
            && source_index > context.paragraphs[paragraph_cursor].end_index
        {
            paragraph_cursor += 1;
        }

        let place = TokenPlace {
            source_index,
            sentence_index: sentence_cursor,
            paragraph_index: paragraph_cursor,
        };

        if hyphenator::needs_hyphenation(word, settings.max_chunk_length) {
            let fragments = hyphenator::hyphenate(word, settings.max_chunk_length);
            let group = HyphenGroupId(next_group_id);
            next_group_id += 1;

            let last = fragments.len() - 1;
            for (i, fragment) in fragments.into_iter().enumerate() {
                // Intermediate fragments end in a continuation mark, never in
                // pacing-relevant punctuation.
                let check_punctuation = i == last;
                tokens.push(make_token(
                    fragment,
                    settings,
                    &mut next_token_id,
                    place,
                    Some(group),
                    check_punctuation,
                ));
            }
        } else {
            tokens.push(make_token(
                (*word).to_string(),
                settings,
                &mut next_token_id,
                place,
                None,
                true,
            ));
        }
    }

    let total_duration_ms = tokens.iter().map(|t| u64::from(t.base_duration_ms)).sum();

    debug!(
        "tokenized {} words into {} tokens, {}ms total at {} wpm",
        words.len(),
        tokens.len(),
        total_duration_ms,
        settings.base_wpm
    );

    Ok(TokenizedText {
        tokens,
        context,
        total_duration_ms,
        word_count: words.len(),
        tokenization_wpm: settings.base_wpm,
    })
}

#[derive(Clone, Copy)]
struct TokenPlace {
    source_index: usize,
    sentence_index: usize,
    paragraph_index: usize,
}

fn make_token(
    raw: String,
    settings: &ReaderSettings,
    next_id: &mut u64,
    place: TokenPlace,
    hyphen_group: Option<HyphenGroupId>,
    check_punctuation: bool,
) -> Token {
    let focal_index = orp::orp_index(&raw, settings.orp_offset);
    let pacing = pacing::word_duration(
        &raw,
        settings.base_wpm,
        settings.dynamic_pacing,
        check_punctuation,
    );

    let id = TokenId(*next_id);
    *next_id += 1;

    Token {
        id,
        raw,
        focal_index,
        base_duration_ms: pacing.duration_ms,
        multiplier: pacing.multiplier,
        is_punctuation: pacing.is_punctuation,
        hyphen_group,
        source_index: place.source_index,
        sentence_index: place.sentence_index,
        paragraph_index: place.paragraph_index,
    }
}

/// Unifies line endings, converts tabs to spaces, collapses space runs, and
/// trims the ends. Newlines survive so paragraph breaks stay detectable.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', " ");
    SPACE_RUNS.replace_all(&unified, " ").trim().to_string()
}

/// Splits a paragraph into sentences after sentence-ending punctuation that
/// is followed by whitespace. A punctuation heuristic, not real segmentation:
/// abbreviations will mis-split, which the coverage invariant tolerates.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(boundary, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        pieces.push(&paragraph[start..boundary]);
        while chars.peek().is_some_and(|&(_, ws)| ws.is_whitespace()) {
            chars.next();
        }
        start = chars.peek().map_or(paragraph.len(), |&(i, _)| i);
    }

    if start < paragraph.len() {
        pieces.push(&paragraph[start..]);
    }

    pieces
}

fn build_context_map(normalized: &str) -> ContextMap {
    let mut sentences = Vec::new();
    let mut paragraphs = Vec::new();
    let mut word_index = 0usize;

    for paragraph_text in PARAGRAPH_BREAK.split(normalized) {
        if paragraph_text.trim().is_empty() {
            continue;
        }

        let paragraph_start = word_index;
        let first_sentence_slot = sentences.len();

        for sentence_text in split_sentences(paragraph_text) {
            let trimmed = sentence_text.trim();
            let word_count = trimmed.split_whitespace().count();
            if word_count == 0 {
                continue;
            }

            sentences.push(SentenceBoundary {
                start_index: word_index,
                end_index: word_index + word_count - 1,
                text: trimmed.to_string(),
            });
            word_index += word_count;
        }

        if sentences.len() > first_sentence_slot {
            paragraphs.push(ParagraphBoundary {
                start_index: paragraph_start,
                end_index: word_index - 1,
                sentences: first_sentence_slot..sentences.len(),
            });
        }
    }

    ContextMap {
        sentences,
        paragraphs,
    }
}
