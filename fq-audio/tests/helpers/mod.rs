//! Test helper module for fq-audio integration tests
//!
//! Provides a controller wired to a headless environment plus simulated
//! sounds whose clocks the test drives by hand.

#![allow(dead_code)]

use fq_audio::simulated::SimulatedSound;
use fq_audio::{ControllerConfig, HeadlessEnvironment, PlaybackController, SoundHandle};
use fq_common::config::LoggingConfig;
use fq_common::AudioEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default simulated sound length in seconds
pub const SOUND_SECS: f64 = 2.0;

/// Controller plus the environment it consults
pub struct Harness {
    pub ctl: PlaybackController,
    pub env: Arc<HeadlessEnvironment>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        init_test_logging();
        let env = Arc::new(HeadlessEnvironment::new());
        let ctl = PlaybackController::with_config(config, env.clone());
        Self { ctl, env }
    }

    /// Apply every pending device event
    pub async fn pump(&mut self) -> usize {
        self.ctl.process_pending_events().await
    }
}

/// Simulated sound with the default duration
pub fn sim(name: &str) -> (Arc<SimulatedSound>, SoundHandle) {
    sim_with_duration(name, Some(SOUND_SECS))
}

pub fn sim_with_duration(name: &str, duration: Option<f64>) -> (Arc<SimulatedSound>, SoundHandle) {
    let sound = Arc::new(SimulatedSound::new(name, duration));
    let handle: SoundHandle = sound.clone();
    (sound, handle)
}

/// Float comparison for derived volumes
pub fn assert_volume(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "volume {} != expected {}",
        actual,
        expected
    );
}

/// Everything published so far
pub fn drain_events(rx: &mut broadcast::Receiver<AudioEvent>) -> Vec<AudioEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Names of everything published so far
pub fn drain_event_types(rx: &mut broadcast::Receiver<AudioEvent>) -> Vec<&'static str> {
    drain_events(rx).iter().map(|e| e.event_type()).collect()
}

/// Route controller logs to the test writer; honours RUST_LOG
pub fn init_test_logging() {
    let quiet = LoggingConfig {
        level: "warn".to_string(),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(fq_common::logging::env_filter(&quiet))
        .with_test_writer()
        .try_init();
}
