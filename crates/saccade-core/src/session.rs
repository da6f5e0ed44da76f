//! Reading-session facade over tokenization and playback.
//!
//! Owns the live speed, the current token stream, and its context map, and
//! adds the session bookkeeping a reader UI wants: progress, words read, and
//! a time-remaining estimate at the live speed.

use std::time::Duration;

use crate::{
    error::Result,
    playback::{Playback, PlaybackObserver, PlaybackPhase, PlaybackStatus, SharedWpm},
    settings::ReaderSettings,
    tokenizer::{self, ContextMap, Token},
};

pub struct ReaderSession<O: PlaybackObserver> {
    settings: ReaderSettings,
    wpm: SharedWpm,
    playback: Playback<SharedWpm, O>,
    context: ContextMap,
    source_text: String,
    word_count: usize,
    total_duration_ms: u64,
}

impl<O: PlaybackObserver> ReaderSession<O> {
    /// Session with no text loaded yet.
    pub fn new(settings: ReaderSettings, observer: O) -> Self {
        let wpm = SharedWpm::new(settings.base_wpm);
        Self {
            settings,
            playback: Playback::new(wpm.clone(), observer),
            wpm,
            context: ContextMap::default(),
            source_text: String::new(),
            word_count: 0,
            total_duration_ms: 0,
        }
    }

    /// Tokenizes `text` at the session's current speed and swaps it in.
    ///
    /// A tokenization failure leaves the previous stream untouched.
    pub fn load_text(&mut self, text: &str) -> Result<()> {
        let settings = ReaderSettings {
            base_wpm: self.wpm.get(),
            ..self.settings
        };
        let result = tokenizer::tokenize(text, &settings)?;

        self.context = result.context;
        self.word_count = result.word_count;
        self.total_duration_ms = result.total_duration_ms;
        self.source_text = text.to_string();
        self.playback
            .update_tokens(result.tokens, result.tokenization_wpm);
        Ok(())
    }

    /// Starts or resumes playback. After a completed run this restarts from
    /// the top instead of staying parked at the end.
    pub fn play(&mut self) {
        if self.playback.phase() == PlaybackPhase::Completed {
            self.playback.reset();
        }
        self.playback.start();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn reset(&mut self) {
        self.playback.reset();
    }

    pub fn seek_to(&mut self, index: usize) {
        self.playback.seek_to(index);
    }

    pub fn seek_to_sentence_start(&mut self) {
        self.playback.seek_to_sentence_start();
    }

    pub fn tick(&mut self, now_ms: u64) {
        self.playback.tick(now_ms);
    }

    /// Sets the live reading speed, clamped into the supported range.
    /// Never re-tokenizes; playback rescales on its next tick.
    pub fn set_wpm(&mut self, wpm: u16) {
        self.wpm.set(ReaderSettings::clamp_wpm(wpm));
    }

    pub fn current_wpm(&self) -> u16 {
        self.wpm.get()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.playback.status()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.status().is_playing
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.playback.phase()
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.playback.current_token()
    }

    pub fn context(&self) -> &ContextMap {
        &self.context
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn token_count(&self) -> usize {
        self.playback.len()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    /// Fraction of the stream consumed, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.playback.is_empty() {
            return 0.0;
        }
        self.playback.current_index() as f64 / self.playback.len() as f64
    }

    /// Tokens shown so far, counting the one currently up.
    pub fn words_read(&self) -> usize {
        if self.playback.is_empty() {
            return 0;
        }
        (self.playback.current_index() + 1).min(self.playback.len())
    }

    pub fn tokens_remaining(&self) -> usize {
        self.playback.len() - self.playback.current_index().min(self.playback.len())
    }

    /// Estimated reading time left at the live speed.
    pub fn estimated_remaining(&self) -> Duration {
        let words_left = self.tokens_remaining() as f64;
        let wpm = f64::from(self.wpm.get().max(1));
        Duration::from_secs_f64(words_left * 60.0 / wpm)
    }

    /// Full text of the paragraph the current token belongs to, for context
    /// overlays and scrubbing.
    pub fn paragraph_text(&self) -> Option<String> {
        let token = self.playback.current_token()?;
        self.context.paragraph_text(token.paragraph_index)
    }

    pub fn observer(&self) -> &O {
        self.playback.observer()
    }

    pub fn observer_mut(&mut self) -> &mut O {
        self.playback.observer_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{WPM_MAX, WPM_MIN};

    fn session() -> ReaderSession<()> {
        ReaderSession::new(
            ReaderSettings {
                base_wpm: 600,
                ..ReaderSettings::default()
            },
            (),
        )
    }

    #[test]
    fn load_text_populates_the_session() {
        let mut session = session();
        session.load_text("Hello world. Another sentence here.").unwrap();

        assert_eq!(session.word_count(), 5);
        assert_eq!(session.token_count(), 5);
        assert_eq!(session.context().sentences.len(), 2);
        assert_eq!(session.source_text(), "Hello world. Another sentence here.");
        assert!(!session.is_playing());
    }

    #[test]
    fn failed_load_keeps_the_previous_stream() {
        let mut session = session();
        session.load_text("Hello world.").unwrap();
        assert!(session.load_text("   ").is_err());

        assert_eq!(session.token_count(), 2);
        assert_eq!(session.source_text(), "Hello world.");
    }

    #[test]
    fn play_after_completion_restarts_from_the_top() {
        let mut session = session();
        session.load_text("one two").unwrap();
        session.play();
        session.tick(0);
        session.tick(10_000);
        assert_eq!(session.phase(), PlaybackPhase::Completed);

        session.play();
        assert!(session.is_playing());
        assert_eq!(session.status().current_index, 0);
    }

    #[test]
    fn set_wpm_clamps_into_the_supported_range() {
        let mut session = session();
        session.set_wpm(10);
        assert_eq!(session.current_wpm(), WPM_MIN);
        session.set_wpm(9_999);
        assert_eq!(session.current_wpm(), WPM_MAX);
        session.set_wpm(450);
        assert_eq!(session.current_wpm(), 450);
    }

    #[test]
    fn progress_and_stats_track_the_cursor() {
        let mut session = session();
        session.load_text("one two three four").unwrap();
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.words_read(), 1);
        assert_eq!(session.tokens_remaining(), 4);

        session.seek_to(2);
        assert_eq!(session.progress(), 0.5);
        assert_eq!(session.words_read(), 3);
        assert_eq!(session.tokens_remaining(), 2);
    }

    #[test]
    fn estimated_remaining_follows_the_live_speed() {
        let mut session = session();
        session.load_text("one two three four five six").unwrap();

        // 6 tokens at 600 wpm: 0.6s left.
        assert_eq!(session.estimated_remaining(), Duration::from_secs_f64(0.6));

        session.set_wpm(300);
        assert_eq!(session.estimated_remaining(), Duration::from_secs_f64(1.2));
    }

    #[test]
    fn paragraph_text_follows_the_current_token() {
        let mut session = session();
        session
            .load_text("First paragraph here.\n\nSecond paragraph there.")
            .unwrap();

        assert_eq!(
            session.paragraph_text().as_deref(),
            Some("First paragraph here.")
        );
        session.seek_to(3);
        assert_eq!(
            session.paragraph_text().as_deref(),
            Some("Second paragraph there.")
        );
    }

    #[test]
    fn empty_session_absorbs_controls() {
        let mut session = session();
        session.play();
        session.tick(100);
        session.seek_to(3);
        assert!(!session.is_playing());
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.words_read(), 0);
    }

    #[test]
    fn live_speed_change_does_not_retokenize() {
        let mut session = session();
        session.load_text("Hello world.").unwrap();
        let before: Vec<u32> = (0..session.token_count())
            .map(|i| {
                session.seek_to(i);
                session.current_token().unwrap().base_duration_ms
            })
            .collect();

        session.set_wpm(300);
        let after: Vec<u32> = (0..session.token_count())
            .map(|i| {
                session.seek_to(i);
                session.current_token().unwrap().base_duration_ms
            })
            .collect();

        assert_eq!(before, after);
    }
}
