//! Priority-based playback controller
//!
//! Multiplexes sound effects and one background music bed onto the host's
//! playback devices:
//! - At most one priority sound is tracked; a new one stops the old one.
//! - While a priority sound is audible, other requests are dropped or
//!   deferred to a FIFO queue, and the background bed is ducked.
//! - One deferred request is released each time the priority sound
//!   completes.
//!
//! All state is owned by one `PlaybackController` and mutated only through
//! `&mut self`. Device lifecycle notifications arrive on an internal channel
//! and are applied when the host pumps them (`process_pending_events`,
//! `process_next_event`), on the same task that issues requests.

mod background;
pub mod options;
pub mod queue;

pub use background::{ducked_volume, DUCK_RATIO};
pub use options::{CompletionCallback, PlayOptions};
pub use queue::{PriorityQueue, QueuedRequest};

use crate::config::ControllerConfig;
use crate::environment::Environment;
use crate::playable::{
    is_audible, same_handle, DeviceEvent, DeviceEventSender, PlaybackId, Playable, SoundHandle,
};
use crate::state::{AudioMetadata, BackgroundMusicState};
use background::BackgroundMusic;
use fq_common::events::{AudioEvent, StopReason};
use fq_common::time::{now, secs_to_duration};
use options::sanitize_volume;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A started sound whose lifecycle events are still being tracked
struct ActiveSound {
    handle: SoundHandle,
    priority: bool,
    on_complete: Option<CompletionCallback>,
}

/// Previous / priority slot occupant
struct Slot {
    playback_id: PlaybackId,
    handle: SoundHandle,
}

/// Priority-based audio playback controller
pub struct PlaybackController {
    config: ControllerConfig,
    environment: Arc<dyn Environment>,

    /// Playbacks with attached listeners, by playback id
    active: HashMap<PlaybackId, ActiveSound>,

    /// Most recent non-priority sound
    previous: Option<Slot>,

    /// Current priority sound
    priority: Option<Slot>,

    background: BackgroundMusic,
    queue: PriorityQueue,
    metadata: AudioMetadata,

    device_tx: DeviceEventSender,
    device_rx: mpsc::UnboundedReceiver<DeviceEvent>,

    /// Notification broadcaster
    event_tx: broadcast::Sender<AudioEvent>,
}

impl PlaybackController {
    /// Create a controller with default configuration
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        Self::with_config(ControllerConfig::default(), environment)
    }

    pub fn with_config(config: ControllerConfig, environment: Arc<dyn Environment>) -> Self {
        let (device_tx, device_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let queue = PriorityQueue::new(config.max_queue_len);
        Self {
            config,
            environment,
            active: HashMap::new(),
            previous: None,
            priority: None,
            background: BackgroundMusic::new(),
            queue,
            metadata: AudioMetadata::default(),
            device_tx,
            device_rx,
            event_tx,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Subscribe to controller notifications
    pub fn subscribe(&self) -> broadcast::Receiver<AudioEvent> {
        self.event_tx.subscribe()
    }

    /// Sender for host-originated events (visibility changes)
    pub fn event_sender(&self) -> DeviceEventSender {
        self.device_tx.clone()
    }

    // ========================================================================
    // Sound effects
    // ========================================================================

    /// Play a sound effect
    ///
    /// Returns `true` if the sound started. `false` means it was blocked by
    /// an audible priority sound (and possibly queued), or the device failed
    /// to start it. Slot changes made before a failed start are kept.
    pub async fn play(&mut self, handle: SoundHandle, options: PlayOptions) -> bool {
        if !options.priority && !options.ignore_priority && self.has_priority_audio() {
            self.block(handle, options);
            return false;
        }

        let PlayOptions {
            stop_previous,
            volume,
            looping,
            priority,
            playback_rate,
            preload,
            on_complete,
            ..
        } = options;

        if priority {
            if let Some(slot) = self.priority.take() {
                self.stop_playback(slot.playback_id, &slot.handle, StopReason::PrioritySuperseded);
            }
        }

        if stop_previous {
            if let Some(slot) = self.previous.take() {
                self.stop_playback(slot.playback_id, &slot.handle, StopReason::PreviousSuperseded);
            }
        }

        // Restarting the priority handle keeps it in the priority slot, so
        // its completion still releases the queue
        let priority = priority
            || self
                .priority
                .as_ref()
                .is_some_and(|slot| same_handle(&slot.handle, &handle));

        self.retire_handle(&handle);

        let playback_id = Uuid::new_v4();
        if priority {
            self.priority = Some(Slot {
                playback_id,
                handle: handle.clone(),
            });
        }

        let source = handle.source().to_string();
        let volume = sanitize_volume(volume).unwrap_or_else(|| {
            warn!("Invalid volume {} for {}, using 1.0", volume, source);
            1.0
        });
        log_device_error(&source, "set volume", handle.set_volume(volume));
        log_device_error(&source, "set loop", handle.set_loop(looping));
        if let Some(rate) = playback_rate {
            if rate.is_finite() && rate > 0.0 {
                log_device_error(&source, "set playback rate", handle.set_playback_rate(rate));
            } else {
                warn!("Ignoring invalid playback rate {} for {}", rate, source);
            }
        }
        let preload = preload.unwrap_or_else(|| {
            self.config
                .preload
                .for_device(self.environment.is_low_power_device())
        });
        log_device_error(&source, "set preload", handle.set_preload(preload));

        self.active.insert(
            playback_id,
            ActiveSound {
                handle: handle.clone(),
                priority,
                on_complete,
            },
        );
        handle.attach_listener(playback_id, self.device_tx.clone());

        if let Err(e) = handle.start().await {
            warn!("Failed to start {}: {}", source, e);
            if self.active.remove(&playback_id).is_some() {
                handle.detach_listener();
            }
            self.refresh_background_volume();
            self.publish(AudioEvent::SoundFailed {
                source,
                reason: e.to_string(),
                timestamp: now(),
            });
            return false;
        }

        debug!(%playback_id, priority, "Started {}", source);
        let duration_ms = handle
            .duration()
            .map(|d| u64::try_from(secs_to_duration(d).as_millis()).unwrap_or(u64::MAX));
        if !priority {
            self.previous = Some(Slot {
                playback_id,
                handle,
            });
        }
        self.refresh_background_volume();
        self.publish(AudioEvent::SoundStarted {
            playback_id,
            source,
            priority,
            duration_ms,
            timestamp: now(),
        });
        true
    }

    /// Stop every tracked playback of `handle` immediately
    ///
    /// Completion callbacks do not run and queued requests stay queued.
    pub fn stop_sound(&mut self, handle: &SoundHandle) {
        let ids: Vec<PlaybackId> = self
            .active
            .iter()
            .filter(|(_, sound)| same_handle(&sound.handle, handle))
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.stop_playback(id, handle, StopReason::Requested);
        }

        if self
            .previous
            .as_ref()
            .is_some_and(|slot| same_handle(&slot.handle, handle))
        {
            if let Some(slot) = self.previous.take() {
                self.stop_playback(slot.playback_id, &slot.handle, StopReason::Requested);
            }
        }
        if self
            .priority
            .as_ref()
            .is_some_and(|slot| same_handle(&slot.handle, handle))
        {
            if let Some(slot) = self.priority.take() {
                self.stop_playback(slot.playback_id, &slot.handle, StopReason::Requested);
            }
        }

        self.refresh_background_volume();
    }

    /// Set a handle's volume directly, bypassing priority and ducking
    pub fn set_volume(&self, handle: &SoundHandle, volume: f32) {
        match sanitize_volume(volume) {
            Some(volume) => log_device_error(handle.source(), "set volume", handle.set_volume(volume)),
            None => warn!("Ignoring invalid volume {} for {}", volume, handle.source()),
        }
    }

    /// True iff the priority slot is started, unpaused and short of its end
    ///
    /// Always re-queried from the device.
    pub fn has_priority_audio(&self) -> bool {
        self.priority
            .as_ref()
            .map(|slot| is_audible(slot.handle.as_ref()))
            .unwrap_or(false)
    }

    /// Source of the priority slot occupant
    pub fn priority_source(&self) -> Option<&str> {
        self.priority.as_ref().map(|slot| slot.handle.source())
    }

    /// Number of deferred requests
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn get_audio_metadata(&self) -> AudioMetadata {
        self.metadata
    }

    // ========================================================================
    // Background music
    // ========================================================================

    /// Replace the background track and start it looping
    ///
    /// Starts already ducked if a priority sound is audible and ducking is
    /// enabled. `volume` is recorded as the un-ducked level either way.
    pub async fn play_background_music(
        &mut self,
        handle: SoundHandle,
        volume: f32,
        enable_ducking: bool,
    ) {
        if let Some(old) = self.background.handle.take() {
            log_device_error(old.source(), "stop background music", old.stop());
            self.publish(AudioEvent::BackgroundMusicStopped {
                source: old.source().to_string(),
                timestamp: now(),
            });
        }

        let source = handle.source().to_string();
        let volume = sanitize_volume(volume).unwrap_or_else(|| {
            warn!("Invalid background volume {} for {}, using 1.0", volume, source);
            1.0
        });
        let ducked = enable_ducking && self.has_priority_audio();
        let initial = ducked_volume(volume, ducked);

        log_device_error(&source, "set loop", handle.set_loop(true));
        log_device_error(&source, "set volume", handle.set_volume(initial));

        let playing = match handle.start().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to start background music {}: {}", source, e);
                false
            }
        };

        info!(volume = initial, ducked, "Background music {}", source);
        self.background = BackgroundMusic {
            handle: Some(handle),
            current_volume: initial,
            is_playing: playing,
            original_volume: volume,
            ducking_enabled: enable_ducking,
            ducked,
        };
        self.publish(AudioEvent::BackgroundMusicStarted {
            source,
            volume: initial,
            playing,
            timestamp: now(),
        });

        // Priority state may have moved while awaiting the start
        self.refresh_background_volume();
    }

    /// Stop the background track; no-op when nothing is playing
    pub fn stop_background_music(&mut self) {
        if !self.background.is_playing {
            return;
        }
        if let Some(handle) = &self.background.handle {
            log_device_error(handle.source(), "stop background music", handle.stop());
            let source = handle.source().to_string();
            debug!("Stopped background music {}", source);
            self.publish(AudioEvent::BackgroundMusicStopped {
                source,
                timestamp: now(),
            });
        }
        self.background.is_playing = false;
    }

    /// Change the un-ducked background volume
    pub fn set_background_music_volume(&mut self, volume: f32) {
        match sanitize_volume(volume) {
            Some(volume) => {
                self.background.original_volume = volume;
                self.refresh_background_volume();
            }
            None => warn!("Ignoring invalid background volume {}", volume),
        }
    }

    /// Enable or disable ducking; takes effect immediately
    pub fn set_background_music_ducking(&mut self, enabled: bool) {
        self.background.ducking_enabled = enabled;
        self.refresh_background_volume();
    }

    pub fn get_background_music_state(&self) -> BackgroundMusicState {
        self.background.snapshot()
    }

    // ========================================================================
    // Device events
    // ========================================================================

    /// Apply every device event queued so far, including ones raised while
    /// handling them. Returns the number handled.
    pub async fn process_pending_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.device_rx.try_recv() {
            self.handle_device_event(event).await;
            handled += 1;
        }
        handled
    }

    /// Wait for the next device event and apply it
    pub async fn process_next_event(&mut self) -> bool {
        match self.device_rx.recv().await {
            Some(event) => {
                self.handle_device_event(event).await;
                true
            }
            None => false,
        }
    }

    /// Apply one device event
    pub async fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Started { playback_id }
            | DeviceEvent::Paused { playback_id }
            | DeviceEvent::TimeUpdate { playback_id } => {
                if let Some(sound) = self.active.get(&playback_id) {
                    self.metadata = observe(sound.handle.as_ref());
                }
                self.refresh_background_volume();
            }
            DeviceEvent::Ended { playback_id } => self.on_ended(playback_id).await,
            DeviceEvent::Error {
                playback_id,
                message,
            } => self.on_error(playback_id, message).await,
            DeviceEvent::VisibilityChanged => self.on_visibility_changed(),
        }
    }

    async fn on_ended(&mut self, playback_id: PlaybackId) {
        let Some(sound) = self.release(playback_id) else {
            debug!(%playback_id, "Ignoring end of untracked playback");
            return;
        };

        let source = sound.handle.source().to_string();
        debug!(%playback_id, "Completed {}", source);
        self.publish(AudioEvent::SoundCompleted {
            playback_id,
            source,
            timestamp: now(),
        });

        if let Some(callback) = sound.on_complete {
            callback();
        }

        self.finish_slot(playback_id).await;
    }

    async fn on_error(&mut self, playback_id: PlaybackId, message: String) {
        let Some(sound) = self.release(playback_id) else {
            debug!(%playback_id, "Ignoring error from untracked playback");
            return;
        };

        let source = sound.handle.source().to_string();
        warn!(%playback_id, "Playback error on {}: {}", source, message);
        self.publish(AudioEvent::SoundFailed {
            source,
            reason: message,
            timestamp: now(),
        });

        self.finish_slot(playback_id).await;
    }

    /// Stop tracking a playback that ended on its own
    fn release(&mut self, playback_id: PlaybackId) -> Option<ActiveSound> {
        let sound = self.active.remove(&playback_id)?;
        sound.handle.detach_listener();
        self.metadata = observe(sound.handle.as_ref());
        if self
            .previous
            .as_ref()
            .is_some_and(|slot| slot.playback_id == playback_id)
        {
            self.previous = None;
        }
        Some(sound)
    }

    /// Clear the priority slot if it held `playback_id`, restore the bed and
    /// release the next deferred request
    async fn finish_slot(&mut self, playback_id: PlaybackId) {
        let was_priority = self
            .priority
            .as_ref()
            .is_some_and(|slot| slot.playback_id == playback_id);

        if !was_priority {
            self.refresh_background_volume();
            return;
        }

        self.priority = None;
        self.refresh_background_volume();

        if let Some(QueuedRequest {
            handle,
            mut options,
        }) = self.queue.pop()
        {
            debug!(remaining = self.queue.len(), "Releasing queued {}", handle.source());
            options.ignore_priority = true;
            self.play(handle, options).await;
        }
    }

    fn on_visibility_changed(&mut self) {
        if !self.environment.is_backgrounded() {
            return;
        }

        let victims: Vec<(PlaybackId, SoundHandle)> = self
            .active
            .iter()
            .filter(|(_, sound)| !sound.priority)
            .map(|(id, sound)| (*id, sound.handle.clone()))
            .collect();
        if victims.is_empty() {
            return;
        }

        info!("Backgrounded, stopping {} sound(s)", victims.len());
        for (id, handle) in victims {
            self.stop_playback(id, &handle, StopReason::Backgrounded);
            if self
                .previous
                .as_ref()
                .is_some_and(|slot| slot.playback_id == id)
            {
                self.previous = None;
            }
        }
        self.refresh_background_volume();
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Stop everything and reset to the initial empty state
    ///
    /// Safe to call repeatedly; a call on an idle controller does nothing.
    pub fn cleanup(&mut self) {
        let was_idle = self.is_idle();

        let active: Vec<(PlaybackId, ActiveSound)> = self.active.drain().collect();
        for (playback_id, sound) in active {
            sound.handle.detach_listener();
            log_device_error(sound.handle.source(), "stop", sound.handle.stop());
            self.publish(AudioEvent::SoundStopped {
                playback_id,
                source: sound.handle.source().to_string(),
                reason: StopReason::Cleanup,
                timestamp: now(),
            });
        }

        let slots = [self.previous.take(), self.priority.take()];
        for slot in slots.into_iter().flatten() {
            stop_if_playing(&slot.handle);
        }
        for request in self.queue.drain() {
            stop_if_playing(&request.handle);
        }
        if let Some(handle) = self.background.handle.take() {
            log_device_error(handle.source(), "stop background music", handle.stop());
        }

        self.background = BackgroundMusic::new();
        self.metadata = AudioMetadata::default();

        // Anything still in flight refers to playbacks that no longer exist
        while self.device_rx.try_recv().is_ok() {}

        if !was_idle {
            info!("Audio controller reset");
            self.publish(AudioEvent::ControllerReset { timestamp: now() });
        }
    }

    fn is_idle(&self) -> bool {
        self.active.is_empty()
            && self.previous.is_none()
            && self.priority.is_none()
            && self.queue.is_empty()
            && self.background.handle.is_none()
            && self.background.snapshot() == BackgroundMusicState::default()
            && self.metadata == AudioMetadata::default()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn block(&mut self, handle: SoundHandle, options: PlayOptions) {
        let source = handle.source().to_string();
        let queued = if options.queue_if_blocked {
            match self.queue.enqueue(QueuedRequest::new(handle, options)) {
                Ok(()) => {
                    debug!(queued = self.queue.len(), "Deferred {} behind priority sound", source);
                    true
                }
                Err(_) => {
                    warn!("Priority queue full, dropping {}", source);
                    false
                }
            }
        } else {
            debug!("Dropped {}, priority sound is playing", source);
            false
        };
        self.publish(AudioEvent::SoundBlocked {
            source,
            queued,
            timestamp: now(),
        });
    }

    /// Stop one playback and forget it
    ///
    /// The device is only touched if the playback is still tracked, or if
    /// the handle is not tracked under any other playback and still plays.
    fn stop_playback(&mut self, playback_id: PlaybackId, handle: &SoundHandle, reason: StopReason) {
        if let Some(sound) = self.active.remove(&playback_id) {
            sound.handle.detach_listener();
            log_device_error(sound.handle.source(), "stop", sound.handle.stop());
            debug!(%playback_id, ?reason, "Stopped {}", sound.handle.source());
            self.publish(AudioEvent::SoundStopped {
                playback_id,
                source: sound.handle.source().to_string(),
                reason,
                timestamp: now(),
            });
            return;
        }

        let reused = self
            .active
            .values()
            .any(|sound| same_handle(&sound.handle, handle));
        if !reused {
            stop_if_playing(handle);
        }
    }

    /// Forget earlier playbacks of a handle that is about to restart
    ///
    /// The priority slot is not touched; `play` re-keys it to the new
    /// playback.
    fn retire_handle(&mut self, handle: &SoundHandle) {
        let stale: Vec<PlaybackId> = self
            .active
            .iter()
            .filter(|(_, sound)| same_handle(&sound.handle, handle))
            .map(|(id, _)| *id)
            .collect();

        for playback_id in stale {
            self.active.remove(&playback_id);
            if self
                .previous
                .as_ref()
                .is_some_and(|slot| slot.playback_id == playback_id)
            {
                self.previous = None;
            }
            self.publish(AudioEvent::SoundStopped {
                playback_id,
                source: handle.source().to_string(),
                reason: StopReason::Restarted,
                timestamp: now(),
            });
        }
    }

    /// Re-derive the background volume from current priority-audio state
    ///
    /// Single transition point for ducking; every state change ends here.
    fn refresh_background_volume(&mut self) {
        let audible = self.has_priority_audio();
        let ducked = self.background.should_duck(audible);
        let target = self.background.target_volume(audible);

        let changed = target != self.background.current_volume || ducked != self.background.ducked;
        self.background.current_volume = target;
        self.background.ducked = ducked;
        if !changed {
            return;
        }

        if let Some(handle) = &self.background.handle {
            if self.background.is_playing {
                log_device_error(handle.source(), "set background volume", handle.set_volume(target));
            }
            debug!(volume = target, ducked, "Background volume changed");
            self.publish(AudioEvent::BackgroundVolumeChanged {
                volume: target,
                ducked,
                timestamp: now(),
            });
        }
    }

    fn publish(&self, event: AudioEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn observe(handle: &dyn Playable) -> AudioMetadata {
    AudioMetadata {
        duration: handle.duration(),
        current_time: handle.position(),
        is_playing: !handle.is_paused(),
    }
}

fn stop_if_playing(handle: &SoundHandle) {
    if !handle.is_paused() {
        log_device_error(handle.source(), "stop", handle.stop());
    }
}

fn log_device_error(source: &str, action: &str, result: crate::Result<()>) {
    if let Err(e) = result {
        warn!("Failed to {} on {}: {}", action, source, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::HeadlessEnvironment;
    use crate::simulated::SimulatedSound;

    fn controller() -> PlaybackController {
        PlaybackController::new(Arc::new(HeadlessEnvironment::new()))
    }

    fn sound(name: &str) -> (Arc<SimulatedSound>, SoundHandle) {
        let sim = Arc::new(SimulatedSound::new(name, Some(2.0)));
        let handle: SoundHandle = sim.clone();
        (sim, handle)
    }

    #[tokio::test]
    async fn test_plain_play_fills_previous_slot() {
        let mut ctl = controller();
        let (sim, handle) = sound("click.mp3");

        assert!(ctl.play(handle, PlayOptions::new()).await);
        assert!(sim.is_playing());
        assert!(ctl.previous.is_some());
        assert!(ctl.priority.is_none());
        assert!(!ctl.has_priority_audio());
    }

    #[tokio::test]
    async fn test_stop_previous_stops_old_effect() {
        let mut ctl = controller();
        let (a, ha) = sound("a.mp3");
        let (b, hb) = sound("b.mp3");

        ctl.play(ha, PlayOptions::new()).await;
        ctl.play(hb, PlayOptions::new()).await;
        assert!(!a.is_playing());
        assert_eq!(a.stop_count(), 1);
        assert!(b.is_playing());
    }

    #[tokio::test]
    async fn test_keep_previous_when_requested() {
        let mut ctl = controller();
        let (a, ha) = sound("a.mp3");
        let (b, hb) = sound("b.mp3");

        ctl.play(ha, PlayOptions::new()).await;
        ctl.play(hb, PlayOptions::new().with_stop_previous(false)).await;
        assert!(a.is_playing());
        assert!(b.is_playing());
        assert_eq!(ctl.active.len(), 2);
    }

    #[tokio::test]
    async fn test_restart_same_handle_retires_old_playback() {
        let mut ctl = controller();
        let (sim, handle) = sound("a.mp3");

        ctl.play(handle.clone(), PlayOptions::new().with_stop_previous(false)).await;
        let first = sim.listener_id();
        ctl.play(handle, PlayOptions::new().with_stop_previous(false)).await;

        assert_eq!(ctl.active.len(), 1);
        assert_ne!(sim.listener_id(), first);
    }

    #[tokio::test]
    async fn test_failed_start_leaves_nothing_tracked() {
        let mut ctl = controller();
        let sim = Arc::new(SimulatedSound::new("broken.mp3", Some(1.0)).with_start_failure("decode"));

        assert!(!ctl.play(sim.clone(), PlayOptions::new()).await);
        assert!(ctl.active.is_empty());
        assert!(ctl.previous.is_none());
        assert!(sim.listener_id().is_none());
    }

    #[tokio::test]
    async fn test_failed_priority_start_keeps_slot_but_not_audible() {
        let mut ctl = controller();
        let sim = Arc::new(SimulatedSound::new("fanfare.mp3", Some(1.0)).with_start_failure("busy"));

        assert!(!ctl.play(sim, PlayOptions::priority()).await);
        assert_eq!(ctl.priority_source(), Some("fanfare.mp3"));
        assert!(!ctl.has_priority_audio());
    }

    #[tokio::test]
    async fn test_stale_events_are_ignored() {
        let mut ctl = controller();
        ctl.handle_device_event(DeviceEvent::Ended {
            playback_id: Uuid::new_v4(),
        })
        .await;
        assert_eq!(ctl.get_audio_metadata(), AudioMetadata::default());
    }

    #[tokio::test]
    async fn test_metadata_tracks_latest_event() {
        let mut ctl = controller();
        let (sim, handle) = sound("a.mp3");

        ctl.play(handle, PlayOptions::new()).await;
        sim.advance(0.5);
        ctl.process_pending_events().await;

        let meta = ctl.get_audio_metadata();
        assert_eq!(meta.duration, Some(2.0));
        assert_eq!(meta.current_time, 0.5);
        assert!(meta.is_playing);
    }

    #[tokio::test]
    async fn test_preload_follows_device_class() {
        let env = Arc::new(HeadlessEnvironment::low_power());
        let mut ctl = PlaybackController::new(env);
        let (sim, handle) = sound("a.mp3");
        ctl.play(handle, PlayOptions::new()).await;
        assert_eq!(sim.preload(), Some(crate::playable::Preload::Metadata));

        let (sim, handle) = sound("b.mp3");
        ctl.play(handle, PlayOptions::new().with_preload(crate::playable::Preload::None))
            .await;
        assert_eq!(sim.preload(), Some(crate::playable::Preload::None));
    }

    #[tokio::test]
    async fn test_cleanup_on_idle_controller_publishes_nothing() {
        let mut ctl = controller();
        let mut rx = ctl.subscribe();
        ctl.cleanup();
        assert!(rx.try_recv().is_err());
    }
}
