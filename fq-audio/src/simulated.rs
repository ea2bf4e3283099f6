//! In-memory playback device
//!
//! `SimulatedSound` behaves like a media element with a virtual clock that
//! only moves when told to (`advance`, `finish`). Used by the test suite and
//! by hosts that run the game headless.

use crate::playable::{DeviceEvent, DeviceEventSender, PlaybackId, Playable, Preload};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct SimState {
    duration: Option<f64>,
    position: f64,
    paused: bool,
    volume: f32,
    looping: bool,
    rate: f32,
    preload: Option<Preload>,
    start_failure: Option<String>,
    start_count: usize,
    stop_count: usize,
}

/// Simulated sound resource with a manually driven clock
#[derive(Debug)]
pub struct SimulatedSound {
    source: String,
    state: Mutex<SimState>,
    listener: Mutex<Option<(PlaybackId, DeviceEventSender)>>,
}

impl SimulatedSound {
    /// Create a paused sound at position 0
    pub fn new(source: impl Into<String>, duration: Option<f64>) -> Self {
        Self {
            source: source.into(),
            state: Mutex::new(SimState {
                duration,
                position: 0.0,
                paused: true,
                volume: 1.0,
                looping: false,
                rate: 1.0,
                preload: None,
                start_failure: None,
                start_count: 0,
                stop_count: 0,
            }),
            listener: Mutex::new(None),
        }
    }

    /// Make every subsequent `start` fail with `reason`
    pub fn with_start_failure(self, reason: impl Into<String>) -> Self {
        self.set_start_failure(Some(reason.into()));
        self
    }

    /// Set or clear the injected start failure
    pub fn set_start_failure(&self, reason: Option<String>) {
        self.state().start_failure = reason;
    }

    /// Change the reported duration
    pub fn set_duration(&self, duration: Option<f64>) {
        self.state().duration = duration;
    }

    /// Mark as playing without emitting any event
    pub fn force_playing(&self) {
        self.state().paused = false;
    }

    /// Move the clock forward by `secs` of playback
    ///
    /// Emits `TimeUpdate`, plus `Ended` when a non-looping sound reaches its
    /// duration. No-op while paused.
    pub fn advance(&self, secs: f64) {
        let ended = {
            let mut state = self.state();
            if state.paused {
                return;
            }
            state.position += secs * f64::from(state.rate);
            match state.duration {
                Some(duration) if state.position >= duration => {
                    if state.looping && duration > 0.0 {
                        state.position %= duration;
                        false
                    } else {
                        state.position = duration;
                        state.paused = true;
                        true
                    }
                }
                _ => false,
            }
        };

        self.emit(|playback_id| DeviceEvent::TimeUpdate { playback_id });
        if ended {
            self.emit(|playback_id| DeviceEvent::Ended { playback_id });
        }
    }

    /// Play through to the natural end, ignoring the loop flag
    pub fn finish(&self) {
        {
            let mut state = self.state();
            if state.paused {
                return;
            }
            if let Some(duration) = state.duration {
                state.position = duration;
            }
            state.paused = true;
        }
        self.emit(|playback_id| DeviceEvent::TimeUpdate { playback_id });
        self.emit(|playback_id| DeviceEvent::Ended { playback_id });
    }

    /// Report a device error for the current playback
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.state().paused = true;
        self.emit(|playback_id| DeviceEvent::Error {
            playback_id,
            message: message.clone(),
        });
    }

    /// Last volume applied by the controller
    pub fn volume(&self) -> f32 {
        self.state().volume
    }

    pub fn is_looping(&self) -> bool {
        self.state().looping
    }

    pub fn playback_rate(&self) -> f32 {
        self.state().rate
    }

    pub fn preload(&self) -> Option<Preload> {
        self.state().preload
    }

    /// Number of successful starts
    pub fn start_count(&self) -> usize {
        self.state().start_count
    }

    /// Number of `stop` calls
    pub fn stop_count(&self) -> usize {
        self.state().stop_count
    }

    pub fn is_playing(&self) -> bool {
        !self.state().paused
    }

    /// Playback id of the attached listener, if any
    pub fn listener_id(&self) -> Option<PlaybackId> {
        self.listener().as_ref().map(|(id, _)| *id)
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listener(&self) -> MutexGuard<'_, Option<(PlaybackId, DeviceEventSender)>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, make: impl FnOnce(PlaybackId) -> DeviceEvent) {
        let target = self.listener().clone();
        if let Some((playback_id, sink)) = target {
            // Receiver gone means the controller was dropped
            let _ = sink.send(make(playback_id));
        }
    }
}

#[async_trait]
impl Playable for SimulatedSound {
    fn source(&self) -> &str {
        &self.source
    }

    async fn start(&self) -> Result<()> {
        {
            let mut state = self.state();
            if let Some(reason) = &state.start_failure {
                return Err(Error::StartRejected(reason.clone()));
            }
            if let Some(duration) = state.duration {
                if state.position >= duration {
                    state.position = 0.0;
                }
            }
            state.paused = false;
            state.start_count += 1;
        }
        self.emit(|playback_id| DeviceEvent::Started { playback_id });
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        let was_playing = {
            let mut state = self.state();
            !std::mem::replace(&mut state.paused, true)
        };
        if was_playing {
            self.emit(|playback_id| DeviceEvent::Paused { playback_id });
        }
        Ok(())
    }

    fn set_position(&self, secs: f64) -> Result<()> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(Error::Device(format!("invalid position {}", secs)));
        }
        self.state().position = secs;
        Ok(())
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        self.state().volume = volume;
        Ok(())
    }

    fn set_loop(&self, looping: bool) -> Result<()> {
        self.state().looping = looping;
        Ok(())
    }

    fn set_playback_rate(&self, rate: f32) -> Result<()> {
        self.state().rate = rate;
        Ok(())
    }

    fn set_preload(&self, preload: Preload) -> Result<()> {
        self.state().preload = Some(preload);
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.state().duration
    }

    fn position(&self) -> f64 {
        self.state().position
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn attach_listener(&self, playback_id: PlaybackId, sink: DeviceEventSender) {
        *self.listener() = Some((playback_id, sink));
    }

    fn detach_listener(&self) {
        *self.listener() = None;
    }

    fn stop(&self) -> Result<()> {
        self.state().stop_count += 1;
        self.pause()?;
        self.set_position(0.0)
    }
}
