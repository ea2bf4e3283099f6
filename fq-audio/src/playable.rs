//! Playable capability
//!
//! The controller never decodes audio itself. It drives whatever the host
//! platform provides through this trait: a media element, a rodio sink, a
//! test double. Lifecycle notifications flow back as [`DeviceEvent`]s over
//! the sink handed to [`Playable::attach_listener`].

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identity of one admitted `play` call
pub type PlaybackId = Uuid;

/// Shared reference to a caller-owned sound resource
pub type SoundHandle = Arc<dyn Playable>;

/// Sending half of the controller's device event queue
pub type DeviceEventSender = mpsc::UnboundedSender<DeviceEvent>;

/// Preload strategy hint forwarded to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preload {
    /// Fetch the whole resource eagerly
    Auto,
    /// Fetch only duration and format information
    Metadata,
    /// Fetch nothing until playback starts
    None,
}

/// Lifecycle notifications reported by devices (and the host environment)
///
/// Every variant except `VisibilityChanged` carries the playback id that was
/// attached when the sound was started. The controller ignores ids it no
/// longer tracks.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Playback actually began
    Started { playback_id: PlaybackId },

    /// Playback paused (by the device or externally)
    Paused { playback_id: PlaybackId },

    /// Periodic position update
    TimeUpdate { playback_id: PlaybackId },

    /// Playback reached its natural end
    Ended { playback_id: PlaybackId },

    /// Device error during playback
    Error {
        playback_id: PlaybackId,
        message: String,
    },

    /// Application moved to or from the background
    VisibilityChanged,
}

impl DeviceEvent {
    /// Playback the event refers to, if any
    pub fn playback_id(&self) -> Option<PlaybackId> {
        match self {
            DeviceEvent::Started { playback_id }
            | DeviceEvent::Paused { playback_id }
            | DeviceEvent::TimeUpdate { playback_id }
            | DeviceEvent::Ended { playback_id }
            | DeviceEvent::Error { playback_id, .. } => Some(*playback_id),
            DeviceEvent::VisibilityChanged => None,
        }
    }
}

/// A playable audio resource
///
/// Positions and durations are in seconds, volumes are linear 0.0-1.0.
#[async_trait]
pub trait Playable: Send + Sync {
    /// Human-readable identity (path or URL) for logs and notifications
    fn source(&self) -> &str;

    /// Begin playback, resolving once the device acknowledges the start
    async fn start(&self) -> Result<()>;

    /// Pause playback, keeping the current position
    fn pause(&self) -> Result<()>;

    /// Seek to `secs`
    fn set_position(&self, secs: f64) -> Result<()>;

    /// Set linear output volume (0.0-1.0)
    fn set_volume(&self, volume: f32) -> Result<()>;

    /// Enable or disable looping
    fn set_loop(&self, looping: bool) -> Result<()>;

    /// Set playback rate (1.0 = normal speed)
    fn set_playback_rate(&self, rate: f32) -> Result<()>;

    /// Preload hint; devices without a preload notion ignore it
    fn set_preload(&self, _preload: Preload) -> Result<()> {
        Ok(())
    }

    /// Total duration, `None` until known
    fn duration(&self) -> Option<f64>;

    /// Current playback position
    fn position(&self) -> f64;

    /// True unless actively playing
    fn is_paused(&self) -> bool;

    /// Route lifecycle notifications for `playback_id` into `sink`,
    /// replacing any previous listener
    fn attach_listener(&self, playback_id: PlaybackId, sink: DeviceEventSender);

    /// Stop reporting lifecycle notifications
    fn detach_listener(&self);

    /// Stop playback and rewind
    fn stop(&self) -> Result<()> {
        self.pause()?;
        self.set_position(0.0)
    }
}

/// Pointer identity of two handles
pub fn same_handle(a: &SoundHandle, b: &SoundHandle) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// True while the handle is started, not paused, and short of its end
///
/// A handle with unknown duration is never considered audible.
pub fn is_audible(handle: &dyn Playable) -> bool {
    if handle.is_paused() {
        return false;
    }
    match handle.duration() {
        Some(duration) => handle.position() < duration,
        None => false,
    }
}
