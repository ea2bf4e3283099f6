//! Background music slot and ducking math

use crate::playable::SoundHandle;
use crate::state::BackgroundMusicState;

/// Gain applied to background music while a priority sound is audible
pub const DUCK_RATIO: f32 = 0.2;

/// The single tracked background track
pub struct BackgroundMusic {
    pub handle: Option<SoundHandle>,
    /// Volume last applied to the device
    pub current_volume: f32,
    pub is_playing: bool,
    /// Un-ducked volume
    pub original_volume: f32,
    pub ducking_enabled: bool,
    /// True while `current_volume` is the ducked level
    pub ducked: bool,
}

impl BackgroundMusic {
    pub fn new() -> Self {
        let defaults = BackgroundMusicState::default();
        Self {
            handle: None,
            current_volume: defaults.volume,
            is_playing: defaults.is_playing,
            original_volume: defaults.original_volume,
            ducking_enabled: defaults.enable_ducking,
            ducked: false,
        }
    }

    /// Whether the bed should be ducked given current priority-audio state
    pub fn should_duck(&self, priority_audible: bool) -> bool {
        self.ducking_enabled && priority_audible
    }

    /// Volume the bed should have given current priority-audio state
    pub fn target_volume(&self, priority_audible: bool) -> f32 {
        ducked_volume(self.original_volume, self.should_duck(priority_audible))
    }

    pub fn snapshot(&self) -> BackgroundMusicState {
        BackgroundMusicState {
            is_playing: self.is_playing,
            volume: self.current_volume,
            original_volume: self.original_volume,
            enable_ducking: self.ducking_enabled,
        }
    }
}

impl Default for BackgroundMusic {
    fn default() -> Self {
        Self::new()
    }
}

/// `original` when not ducked, `original * DUCK_RATIO` when ducked
pub fn ducked_volume(original: f32, ducked: bool) -> f32 {
    if ducked {
        original * DUCK_RATIO
    } else {
        original
    }
}
