//! # FlagQuest Common Library
//!
//! Shared code for FlagQuest components including:
//! - Common error type
//! - Configuration file resolution and TOML loading
//! - Logging bootstrap
//! - Audio notification events (AudioEvent enum)

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
pub use events::AudioEvent;
