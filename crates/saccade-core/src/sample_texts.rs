//! Built-in demo passages for the player and the tests.

/// Named sample texts, each exercising a different engine path.
pub const SAMPLE_TEXTS: [(&str, &str); 5] = [
    (
        "short",
        "The quick brown fox jumps over the lazy dog near the riverbank at dawn.",
    ),
    (
        "punctuation",
        "Wait, really? The numbers told a different story: first, output rose; \
second, defects fell by half! Remarkable.",
    ),
    (
        "long-words",
        "Reliable electroencephalography instrumentation demands uncompromising \
interdisciplinary standardization across incomprehensibilities of vocabulary.",
    ),
    (
        "paragraph",
        "Rapid serial visual presentation shows one word at a time at a fixed \
point, so the eyes never travel across a line. Removing eye movement is what \
makes high reading speeds reachable.\n\nComprehension still limits how fast a \
reader can go. Pacing that slows on long words and pauses at punctuation keeps \
the stream readable well past ordinary speeds.",
    ),
    (
        "technical",
        "The scheduler drains the queue in O(n log n) using a binary heap. \
Push the source vertex first, then extract the minimum and relax its edges \
until nothing remains. Non-negative weights keep the distances final.",
    ),
];

/// Looks up a sample text by name.
pub fn sample_by_name(name: &str) -> Option<&'static str> {
    SAMPLE_TEXTS
        .iter()
        .find(|(sample_name, _)| *sample_name == name)
        .map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{settings::ReaderSettings, tokenizer::tokenize};

    #[test]
    fn lookup_finds_every_sample() {
        for (name, text) in SAMPLE_TEXTS {
            assert_eq!(sample_by_name(name), Some(text));
        }
        assert_eq!(sample_by_name("missing"), None);
    }

    #[test]
    fn every_sample_tokenizes() {
        let settings = ReaderSettings::default();
        for (name, text) in SAMPLE_TEXTS {
            let result = tokenize(text, &settings).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(result.word_count > 0, "{name}");
        }
    }

    #[test]
    fn long_words_sample_actually_hyphenates() {
        let result = tokenize(
            sample_by_name("long-words").unwrap(),
            &ReaderSettings::default(),
        )
        .unwrap();
        assert!(result.tokens.iter().any(|t| t.is_hyphenated()));
    }

    #[test]
    fn paragraph_sample_has_two_paragraphs() {
        let result = tokenize(
            sample_by_name("paragraph").unwrap(),
            &ReaderSettings::default(),
        )
        .unwrap();
        assert_eq!(result.context.paragraphs.len(), 2);
    }
}
