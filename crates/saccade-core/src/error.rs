//! Engine error taxonomy.

use thiserror::Error;

use crate::settings::{WPM_MAX, WPM_MIN};

/// Unified result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures surfaced by tokenization.
///
/// Playback operations never produce errors: out-of-range seeks are clamped
/// and empty streams are absorbed as no-ops, so loop state cannot become
/// inconsistent. Both variants here are recoverable; the caller re-prompts
/// or clamps and tries again.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EngineError {
    #[error("text contains no readable words")]
    EmptyInput,
    #[error("wpm must be between {min}-{max}, got {wpm}", min = WPM_MIN, max = WPM_MAX)]
    InvalidWpm { wpm: u16 },
}
