//! Read-only snapshots returned by controller queries

use serde::Serialize;

/// Last observed playback metadata
///
/// Reflects whichever sound most recently reported a lifecycle event.
/// Informational only; control decisions re-query the devices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioMetadata {
    /// Total duration in seconds, if known
    pub duration: Option<f64>,
    /// Position in seconds
    pub current_time: f64,
    pub is_playing: bool,
}

impl Default for AudioMetadata {
    fn default() -> Self {
        Self {
            duration: None,
            current_time: 0.0,
            is_playing: false,
        }
    }
}

/// Background music snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackgroundMusicState {
    pub is_playing: bool,
    /// Volume currently applied to the device
    pub volume: f32,
    /// Un-ducked volume requested by the caller
    pub original_volume: f32,
    pub enable_ducking: bool,
}

impl Default for BackgroundMusicState {
    fn default() -> Self {
        Self {
            is_playing: false,
            volume: 1.0,
            original_volume: 1.0,
            enable_ducking: true,
        }
    }
}
