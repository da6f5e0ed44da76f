//! Drift-corrected playback over a pre-computed token stream.
//!
//! An external tick source feeds timestamps into [`Playback::tick`]; elapsed
//! time lands in an accumulator and tokens are consumed whole from it, with
//! the remainder carried forward so variable frame rates never accumulate
//! drift. The live speed is read fresh on every tick, which is what lets the
//! user change WPM mid-playback without re-tokenizing.

use std::{cell::Cell, rc::Rc};

use log::warn;

use crate::tokenizer::Token;

/// Inter-tick gap above which a frame drop is logged. Playback continues
/// with the real delta either way.
pub const FRAME_DROP_THRESHOLD_MS: u64 = 100;

/// Live reading-speed getter, consulted once per tick.
pub trait SpeedSource {
    fn current_wpm(&self) -> u16;
}

/// A fixed speed.
impl SpeedSource for u16 {
    fn current_wpm(&self) -> u16 {
        *self
    }
}

/// Shared, adjustable speed for single-threaded playback. Clones observe
/// each other's updates.
#[derive(Clone, Debug, Default)]
pub struct SharedWpm(Rc<Cell<u16>>);

impl SharedWpm {
    pub fn new(wpm: u16) -> Self {
        Self(Rc::new(Cell::new(wpm)))
    }

    pub fn get(&self) -> u16 {
        self.0.get()
    }

    pub fn set(&self, wpm: u16) {
        self.0.set(wpm);
    }
}

impl SpeedSource for SharedWpm {
    fn current_wpm(&self) -> u16 {
        self.0.get()
    }
}

/// Notification channels out of the controller.
pub trait PlaybackObserver {
    /// The displayed token changed to `index`.
    fn token_changed(&mut self, index: usize);
    /// The stream was exhausted. Fires once per run.
    fn completed(&mut self);
}

/// Null observer.
impl PlaybackObserver for () {
    fn token_changed(&mut self, _index: usize) {}
    fn completed(&mut self) {}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackPhase {
    Stopped,
    Playing,
    Paused,
    Completed,
}

/// Snapshot of the externally visible loop state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub current_index: usize,
}

/// The timing-loop controller.
///
/// Owns its collaborators and all mutable loop state; every operation is
/// synchronous and none fails. Out-of-range seeks clamp and empty streams
/// absorb operations as no-ops, so the state can never become inconsistent.
/// A tick arriving after `pause` or `reset` is ignored by the phase guard.
pub struct Playback<S: SpeedSource, O: PlaybackObserver> {
    tokens: Vec<Token>,
    phase: PlaybackPhase,
    current_index: usize,
    accumulator_ms: f64,
    last_tick_ms: Option<u64>,
    tokenization_wpm: u16,
    speed: S,
    observer: O,
}

impl<S: SpeedSource, O: PlaybackObserver> Playback<S, O> {
    /// Controller with an empty stream; `update_tokens` loads one.
    pub fn new(speed: S, observer: O) -> Self {
        Self {
            tokens: Vec::new(),
            phase: PlaybackPhase::Stopped,
            current_index: 0,
            accumulator_ms: 0.0,
            last_tick_ms: None,
            tokenization_wpm: 1,
            speed,
            observer,
        }
    }

    pub fn with_tokens(tokens: Vec<Token>, tokenization_wpm: u16, speed: S, observer: O) -> Self {
        let mut playback = Self::new(speed, observer);
        playback.tokens = tokens;
        playback.tokenization_wpm = tokenization_wpm.max(1);
        playback
    }

    /// `Stopped | Paused -> Playing`. No-op when already playing, completed,
    /// or the stream is empty. Starting at index 0 announces that token
    /// before the first tick.
    pub fn start(&mut self) {
        match self.phase {
            PlaybackPhase::Playing | PlaybackPhase::Completed => return,
            PlaybackPhase::Stopped | PlaybackPhase::Paused => {}
        }
        if self.tokens.is_empty() {
            return;
        }

        self.phase = PlaybackPhase::Playing;
        self.last_tick_ms = None;
        if self.current_index == 0 {
            self.observer.token_changed(0);
        }
    }

    /// `Playing -> Paused`; accumulator and index are preserved exactly.
    pub fn pause(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            self.phase = PlaybackPhase::Paused;
        }
    }

    /// Any state back to `Stopped` at index 0 with an empty accumulator.
    pub fn reset(&mut self) {
        self.phase = PlaybackPhase::Stopped;
        self.current_index = 0;
        self.accumulator_ms = 0.0;
        self.last_tick_ms = None;
    }

    /// Moves the cursor to `index`, clamped into the stream.
    ///
    /// Announces the new index exactly once; resumes playing only if it was
    /// playing before, otherwise the controller rests `Paused` cued at the
    /// new position. No-op on an empty stream.
    pub fn seek_to(&mut self, index: usize) {
        if self.tokens.is_empty() {
            return;
        }

        let was_playing = self.phase == PlaybackPhase::Playing;
        self.current_index = index.min(self.tokens.len() - 1);
        self.accumulator_ms = 0.0;
        self.last_tick_ms = None;
        self.phase = if was_playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        };
        self.observer.token_changed(self.current_index);
    }

    /// Seeks to the first token of the current token's sentence.
    pub fn seek_to_sentence_start(&mut self) {
        let Some(current) = self.tokens.get(self.current_index) else {
            return;
        };
        let sentence = current.sentence_index;
        if let Some(start) = self
            .tokens
            .iter()
            .position(|t| t.sentence_index == sentence)
        {
            self.seek_to(start);
        }
    }

    /// Atomically replaces the stream and rewinds to the top.
    ///
    /// Resumes playback (announcing index 0) if it was playing and the new
    /// stream is non-empty; an empty stream cancels playback instead.
    pub fn update_tokens(&mut self, tokens: Vec<Token>, tokenization_wpm: u16) {
        let was_playing = self.phase == PlaybackPhase::Playing;

        self.tokens = tokens;
        self.tokenization_wpm = tokenization_wpm.max(1);
        self.phase = PlaybackPhase::Stopped;
        self.current_index = 0;
        self.accumulator_ms = 0.0;
        self.last_tick_ms = None;

        if was_playing && !self.tokens.is_empty() {
            self.start();
        }
    }

    /// Advances playback to `now_ms`.
    ///
    /// The first tick after a (re)start only records the time origin. After
    /// that, elapsed time accrues into the accumulator and tokens are
    /// consumed from it at their currently effective duration, subtracting
    /// rather than resetting so leftover time carries into the next token.
    /// Running past the last token completes the run.
    pub fn tick(&mut self, now_ms: u64) {
        if self.phase != PlaybackPhase::Playing {
            return;
        }

        let Some(prev) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            return;
        };
        self.last_tick_ms = Some(now_ms);

        let delta = now_ms.saturating_sub(prev);
        if delta > FRAME_DROP_THRESHOLD_MS {
            warn!("frame drop: {delta}ms between ticks");
        }
        self.accumulator_ms += delta as f64;

        // Durations were computed at tokenization_wpm; scale them to the
        // live speed instead of ever touching the tokens.
        let live_wpm = self.speed.current_wpm().max(1);
        let scale = f64::from(self.tokenization_wpm) / f64::from(live_wpm);

        loop {
            let Some(token) = self.tokens.get(self.current_index) else {
                self.complete();
                return;
            };

            let effective = f64::from(token.base_duration_ms) * scale;
            if self.accumulator_ms < effective {
                return;
            }

            self.accumulator_ms -= effective;
            self.current_index += 1;

            if self.current_index < self.tokens.len() {
                self.observer.token_changed(self.current_index);
            } else {
                self.complete();
                return;
            }
        }
    }

    fn complete(&mut self) {
        self.phase = PlaybackPhase::Completed;
        self.observer.completed();
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_playing: self.phase == PlaybackPhase::Playing,
            current_index: self.current_index,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current_index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokenization_wpm(&self) -> u16 {
        self.tokenization_wpm
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{HyphenGroupId, TokenId};

    #[derive(Debug, Default)]
    struct Recorder {
        changes: Vec<usize>,
        completions: usize,
    }

    impl PlaybackObserver for Recorder {
        fn token_changed(&mut self, index: usize) {
            self.changes.push(index);
        }

        fn completed(&mut self) {
            self.completions += 1;
        }
    }

    fn token(id: u64, duration_ms: u32, sentence_index: usize) -> Token {
        Token {
            id: TokenId(id),
            raw: format!("word{id}"),
            focal_index: 1,
            base_duration_ms: duration_ms,
            multiplier: 1.0,
            is_punctuation: false,
            hyphen_group: None,
            source_index: id as usize,
            sentence_index,
            paragraph_index: 0,
        }
    }

    fn stream(durations: &[u32]) -> Vec<Token> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| token(i as u64, d, 0))
            .collect()
    }

    fn playback(durations: &[u32]) -> Playback<u16, Recorder> {
        Playback::with_tokens(stream(durations), 600, 600, Recorder::default())
    }

    #[test]
    fn start_announces_index_zero_before_the_first_tick() {
        let mut playback = playback(&[100, 100]);
        playback.start();
        assert_eq!(playback.observer().changes, [0]);
        assert!(playback.status().is_playing);
    }

    #[test]
    fn start_on_an_empty_stream_is_a_no_op() {
        let mut playback = Playback::new(600u16, Recorder::default());
        playback.start();
        assert_eq!(playback.phase(), PlaybackPhase::Stopped);
        assert!(playback.observer().changes.is_empty());
    }

    #[test]
    fn first_tick_establishes_the_origin_without_advancing() {
        let mut playback = playback(&[100, 100]);
        playback.start();
        playback.tick(5_000);
        assert_eq!(playback.current_index(), 0);
        // A later tick measures from the origin, not from zero.
        playback.tick(5_100);
        assert_eq!(playback.current_index(), 1);
    }

    #[test]
    fn tokens_advance_as_their_durations_elapse() {
        let mut playback = playback(&[100, 200, 100]);
        playback.start();
        playback.tick(0);
        playback.tick(100);
        assert_eq!(playback.current_index(), 1);
        playback.tick(250);
        assert_eq!(playback.current_index(), 1);
        playback.tick(300);
        assert_eq!(playback.current_index(), 2);
        assert_eq!(playback.observer().changes, [0, 1, 2]);
    }

    #[test]
    fn leftover_time_carries_into_the_next_token() {
        let mut playback = playback(&[100, 100, 100]);
        playback.start();
        playback.tick(0);
        // 130ms elapsed: one token consumed, 30ms remains banked.
        playback.tick(130);
        assert_eq!(playback.current_index(), 1);
        // 70 more brings the bank to 100: the next token flips exactly here.
        playback.tick(200);
        assert_eq!(playback.current_index(), 2);
    }

    #[test]
    fn one_large_gap_consumes_several_tokens() {
        let mut playback = playback(&[100, 100, 100, 100]);
        playback.start();
        playback.tick(0);
        playback.tick(350);
        assert_eq!(playback.current_index(), 3);
        assert_eq!(playback.observer().changes, [0, 1, 2, 3]);
        assert_eq!(playback.observer().completions, 0);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut playback = playback(&[100, 100]);
        playback.start();
        playback.tick(0);
        playback.tick(500);
        assert_eq!(playback.phase(), PlaybackPhase::Completed);
        assert_eq!(playback.observer().completions, 1);

        // Stale or extra ticks change nothing.
        playback.tick(600);
        playback.start();
        assert_eq!(playback.observer().completions, 1);
        assert_eq!(playback.phase(), PlaybackPhase::Completed);
    }

    #[test]
    fn pause_preserves_partial_progress() {
        let mut playback = playback(&[100, 100]);
        playback.start();
        playback.tick(0);
        playback.tick(60);
        playback.pause();
        assert_eq!(playback.phase(), PlaybackPhase::Paused);

        // A tick into a paused controller must not act.
        playback.tick(10_000);
        assert_eq!(playback.current_index(), 0);

        // Resume: the banked 60ms still counts, so 40ms finishes the token.
        playback.start();
        playback.tick(20_000);
        playback.tick(20_040);
        assert_eq!(playback.current_index(), 1);
    }

    #[test]
    fn live_speed_change_rescales_without_losing_progress() {
        let speed = SharedWpm::new(600);
        let mut playback =
            Playback::with_tokens(stream(&[100, 100]), 600, speed.clone(), Recorder::default());
        playback.start();
        playback.tick(0);
        playback.tick(50);
        assert_eq!(playback.current_index(), 0);

        // Halving the speed doubles the effective duration: 150ms banked
        // of 200ms needed, so the first token is still up.
        speed.set(300);
        playback.tick(150);
        assert_eq!(playback.current_index(), 0);
        playback.tick(200);
        assert_eq!(playback.current_index(), 1);
    }

    #[test]
    fn frame_drop_uses_the_real_delta() {
        let mut playback = playback(&[100, 100, 100]);
        playback.start();
        playback.tick(0);
        // Well past the drop threshold: logged, never skipped.
        playback.tick(250);
        assert_eq!(playback.current_index(), 2);
    }

    #[test]
    fn seek_clamps_to_the_last_token() {
        let mut playback = playback(&[100, 100, 100]);
        playback.seek_to(99);
        assert_eq!(playback.current_index(), 2);
        assert_eq!(playback.phase(), PlaybackPhase::Paused);
        assert_eq!(playback.observer().changes, [2]);
    }

    #[test]
    fn seek_to_zero_while_playing_announces_once_and_keeps_playing() {
        let mut playback = playback(&[100, 100, 100]);
        playback.start();
        playback.tick(0);
        playback.tick(100);
        playback.observer_mut().changes.clear();

        playback.seek_to(0);
        assert_eq!(playback.observer().changes, [0]);
        assert!(playback.status().is_playing);
        assert_eq!(playback.observer().completions, 0);

        // The seek re-arms the origin; the next tick does not advance.
        playback.tick(1_000);
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn seek_on_an_empty_stream_is_absorbed() {
        let mut playback = Playback::new(600u16, Recorder::default());
        playback.seek_to(5);
        assert_eq!(playback.phase(), PlaybackPhase::Stopped);
        assert!(playback.observer().changes.is_empty());
    }

    #[test]
    fn seek_to_sentence_start_finds_the_first_token_of_the_sentence() {
        let tokens = vec![
            token(0, 100, 0),
            token(1, 100, 0),
            token(2, 100, 1),
            token(3, 100, 1),
            token(4, 100, 1),
        ];
        let mut playback = Playback::with_tokens(tokens, 600, 600u16, Recorder::default());
        playback.seek_to(4);
        playback.observer_mut().changes.clear();

        playback.seek_to_sentence_start();
        assert_eq!(playback.current_index(), 2);
        assert_eq!(playback.observer().changes, [2]);
    }

    #[test]
    fn reset_returns_to_stopped_at_zero() {
        let mut playback = playback(&[100, 100]);
        playback.start();
        playback.tick(0);
        playback.tick(130);
        playback.reset();

        assert_eq!(playback.phase(), PlaybackPhase::Stopped);
        assert_eq!(playback.current_index(), 0);

        // Nothing fires until started again.
        playback.observer_mut().changes.clear();
        playback.tick(1_000);
        assert!(playback.observer().changes.is_empty());
    }

    #[test]
    fn update_tokens_resumes_a_playing_stream_from_the_top() {
        let mut playback = playback(&[100, 100]);
        playback.start();
        playback.tick(0);
        playback.tick(100);
        playback.observer_mut().changes.clear();

        playback.update_tokens(stream(&[50, 50, 50]), 400);
        assert!(playback.status().is_playing);
        assert_eq!(playback.current_index(), 0);
        assert_eq!(playback.tokenization_wpm(), 400);
        assert_eq!(playback.observer().changes, [0]);
    }

    #[test]
    fn update_tokens_with_an_empty_stream_cancels_playback() {
        let mut playback = playback(&[100, 100]);
        playback.start();
        playback.update_tokens(Vec::new(), 400);
        assert_eq!(playback.phase(), PlaybackPhase::Stopped);
        assert!(!playback.status().is_playing);
    }

    #[test]
    fn drift_stays_bounded_over_irregular_ticks() {
        // 10 tokens of 100ms each; deltas deliberately never divide evenly.
        let durations = [100u32; 10];
        let mut playback = playback(&durations);
        playback.start();

        let mut now = 0u64;
        playback.tick(now);
        let mut reached_at = Vec::new();
        let mut last_index = 0usize;
        for delta in [33u64, 17, 48, 61, 29, 77, 13, 53, 41, 37, 67, 23, 59, 31,
            71, 19, 43, 83, 11, 47, 97, 29, 61, 37, 53]
        {
            now += delta;
            playback.tick(now);
            let index = playback.current_index();
            while last_index < index {
                last_index += 1;
                reached_at.push((last_index, now));
            }
        }

        // Token k is due at exactly k * 100ms; it must be reached within one
        // tick of its due time, never cumulatively later.
        let max_delta = 97u64;
        for (k, at) in reached_at {
            let due = k as u64 * 100;
            assert!(at >= due, "token {k} reached early at {at}");
            assert!(at - due < max_delta, "token {k} drifted: {at} vs {due}");
        }
    }

    #[test]
    fn hyphen_groups_play_through_like_any_tokens() {
        let mut tokens = stream(&[100, 100]);
        let group = Some(HyphenGroupId(7));
        for t in &mut tokens {
            t.hyphen_group = group;
            t.source_index = 0;
        }
        let mut playback = Playback::with_tokens(tokens, 600, 600u16, Recorder::default());
        playback.start();
        playback.tick(0);
        playback.tick(200);
        assert_eq!(playback.phase(), PlaybackPhase::Completed);
    }
}
