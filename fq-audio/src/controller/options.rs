//! Per-request playback options

use crate::playable::Preload;
use std::fmt;

/// Callback run when a sound reaches its natural end
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Options for a single `play` request
///
/// Defaults: stop the previous sound, full volume, no loop, not priority.
pub struct PlayOptions {
    /// Stop the previously started non-priority sound first
    pub stop_previous: bool,
    /// Linear volume, clamped to 0.0-1.0
    pub volume: f32,
    pub looping: bool,
    /// Preempt other sounds and duck background music
    pub priority: bool,
    /// Play even while a priority sound is audible
    pub ignore_priority: bool,
    /// Defer instead of dropping when blocked by a priority sound
    pub queue_if_blocked: bool,
    pub playback_rate: Option<f32>,
    /// Overrides the configured preload policy
    pub preload: Option<Preload>,
    pub on_complete: Option<CompletionCallback>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            stop_previous: true,
            volume: 1.0,
            looping: false,
            priority: false,
            ignore_priority: false,
            queue_if_blocked: false,
            playback_rate: None,
            preload: None,
            on_complete: None,
        }
    }
}

impl PlayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a priority request
    pub fn priority() -> Self {
        Self::default().with_priority(true)
    }

    pub fn with_priority(mut self, priority: bool) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_stop_previous(mut self, stop_previous: bool) -> Self {
        self.stop_previous = stop_previous;
        self
    }

    pub fn with_ignore_priority(mut self, ignore_priority: bool) -> Self {
        self.ignore_priority = ignore_priority;
        self
    }

    pub fn with_queue_if_blocked(mut self, queue_if_blocked: bool) -> Self {
        self.queue_if_blocked = queue_if_blocked;
        self
    }

    pub fn with_playback_rate(mut self, rate: f32) -> Self {
        self.playback_rate = Some(rate);
        self
    }

    pub fn with_preload(mut self, preload: Preload) -> Self {
        self.preload = Some(preload);
        self
    }

    pub fn on_complete(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for PlayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayOptions")
            .field("stop_previous", &self.stop_previous)
            .field("volume", &self.volume)
            .field("looping", &self.looping)
            .field("priority", &self.priority)
            .field("ignore_priority", &self.ignore_priority)
            .field("queue_if_blocked", &self.queue_if_blocked)
            .field("playback_rate", &self.playback_rate)
            .field("preload", &self.preload)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Clamp a requested volume to 0.0-1.0; non-finite input yields `None`
pub(crate) fn sanitize_volume(volume: f32) -> Option<f32> {
    volume.is_finite().then(|| volume.clamp(0.0, 1.0))
}
