//! Event types for the audio notification stream
//!
//! The playback controller publishes these to subscribers (game logic, UI)
//! so outcomes of fire-and-forget requests can be observed after the fact.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audio controller notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// Sound effect started playing
    SoundStarted {
        playback_id: Uuid,
        source: String,
        priority: bool,
        duration_ms: Option<u64>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Sound effect reached its natural end
    SoundCompleted {
        playback_id: Uuid,
        source: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Sound effect was cut short (superseded, stopped, backgrounded)
    SoundStopped {
        playback_id: Uuid,
        source: String,
        reason: StopReason,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Device refused or aborted playback
    SoundFailed {
        source: String,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Request arrived while a priority sound was audible
    SoundBlocked {
        source: String,
        /// True if deferred to the priority queue, false if dropped
        queued: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Background music track started (or failed to start, see `playing`)
    BackgroundMusicStarted {
        source: String,
        volume: f32,
        playing: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Background music track stopped
    BackgroundMusicStopped {
        source: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Applied background music volume changed
    BackgroundVolumeChanged {
        volume: f32,
        ducked: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Controller torn down, every slot emptied
    ControllerReset {
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Why a sound effect stopped before its natural end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Replaced by a newer priority sound
    PrioritySuperseded,
    /// Stopped because a newer sound requested `stop_previous`
    PreviousSuperseded,
    /// Same handle was started again
    Restarted,
    /// Application moved to the background
    Backgrounded,
    /// Explicit stop request from the caller
    Requested,
    /// Controller cleanup
    Cleanup,
}

impl AudioEvent {
    /// Event type name as used in the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            AudioEvent::SoundStarted { .. } => "SoundStarted",
            AudioEvent::SoundCompleted { .. } => "SoundCompleted",
            AudioEvent::SoundStopped { .. } => "SoundStopped",
            AudioEvent::SoundFailed { .. } => "SoundFailed",
            AudioEvent::SoundBlocked { .. } => "SoundBlocked",
            AudioEvent::BackgroundMusicStarted { .. } => "BackgroundMusicStarted",
            AudioEvent::BackgroundMusicStopped { .. } => "BackgroundMusicStopped",
            AudioEvent::BackgroundVolumeChanged { .. } => "BackgroundVolumeChanged",
            AudioEvent::ControllerReset { .. } => "ControllerReset",
        }
    }
}
