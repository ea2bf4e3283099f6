//! # FlagQuest Audio Controller (fq-audio)
//!
//! Priority-based playback controller for game sound effects and
//! background music.
//!
//! **Purpose:** Multiplex effect sounds and one looping music bed onto the
//! host's playback devices, enforcing priority preemption, background
//! ducking and deferred (queued) playback.
//!
//! **Architecture:** The controller owns all state and talks to devices only
//! through the [`Playable`] and [`Environment`] capabilities. Devices report
//! lifecycle events over a tokio channel that the host pumps on the same task
//! that issues play requests.
//!
//! ```no_run
//! use fq_audio::{ControllerConfig, HeadlessEnvironment, PlaybackController};
//! use std::sync::Arc;
//!
//! # fn main() -> fq_audio::Result<()> {
//! let config = ControllerConfig::load(None)?;
//! fq_common::logging::init_tracing(&config.logging);
//! let mut controller = PlaybackController::with_config(config, Arc::new(HeadlessEnvironment::new()));
//! controller.set_background_music_ducking(true);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod environment;
pub mod error;
pub mod playable;
pub mod simulated;
pub mod state;

pub use config::ControllerConfig;
pub use controller::{PlayOptions, PlaybackController, DUCK_RATIO};
pub use environment::{Environment, HeadlessEnvironment};
pub use error::{Error, Result};
pub use playable::{DeviceEvent, PlaybackId, Playable, Preload, SoundHandle};
pub use state::{AudioMetadata, BackgroundMusicState};
