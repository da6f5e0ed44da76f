//! RSVP reading engine: tokenization and drift-corrected playback.
//!
//! Text goes through [`tokenize`] exactly once; everything semantic (focal
//! points, pacing, hyphenation, sentence/paragraph boundaries) is pre-computed
//! into an immutable token stream. [`Playback`] then drives a cursor over that
//! stream with a tick-fed accumulator, so the per-tick path is arithmetic on
//! pre-computed numbers only.

pub mod error;
pub mod hyphenator;
pub mod orp;
pub mod pacing;
pub mod playback;
pub mod sample_texts;
pub mod session;
pub mod settings;
pub mod tokenizer;

pub use error::{EngineError, Result};
pub use playback::{
    Playback, PlaybackObserver, PlaybackPhase, PlaybackStatus, SharedWpm, SpeedSource,
};
pub use session::ReaderSession;
pub use settings::ReaderSettings;
pub use tokenizer::{ContextMap, Token, TokenizedText, tokenize};
