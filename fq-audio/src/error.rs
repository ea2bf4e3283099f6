//! Error types for fq-audio
//!
//! Device-facing errors. The playback controller catches all of these and
//! degrades to "this sound did not play"; they never reach game logic.

use thiserror::Error;

/// Main error type for the audio controller
#[derive(Error, Debug)]
pub enum Error {
    /// Playback device failure (volume/seek/rate rejected, device lost)
    #[error("Audio device error: {0}")]
    Device(String),

    /// Device refused to begin playback (autoplay policy, codec failure)
    #[error("Playback start rejected: {0}")]
    StartRejected(String),

    /// Configuration loading errors
    #[error(transparent)]
    Config(#[from] fq_common::Error),
}

/// Convenience Result type using fq-audio Error
pub type Result<T> = std::result::Result<T, Error>;
