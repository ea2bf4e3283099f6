//! Host environment capability
//!
//! Platform policy inputs the controller consults but never owns: whether
//! the application is backgrounded (non-priority sounds get cut) and whether
//! the device is low-power (picks the preload hint).

use std::sync::atomic::{AtomicBool, Ordering};

/// Platform state queried by the playback controller
pub trait Environment: Send + Sync {
    /// True while the application is not visible to the user
    fn is_backgrounded(&self) -> bool;

    /// True on mobile or otherwise constrained devices
    fn is_low_power_device(&self) -> bool;
}

/// Flag-backed environment for headless hosts and tests
///
/// Defaults to a foreground desktop.
#[derive(Debug, Default)]
pub struct HeadlessEnvironment {
    backgrounded: AtomicBool,
    low_power: AtomicBool,
}

impl HeadlessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment reporting a low-power device
    pub fn low_power() -> Self {
        let env = Self::default();
        env.set_low_power(true);
        env
    }

    pub fn set_backgrounded(&self, backgrounded: bool) {
        self.backgrounded.store(backgrounded, Ordering::SeqCst);
    }

    pub fn set_low_power(&self, low_power: bool) {
        self.low_power.store(low_power, Ordering::SeqCst);
    }
}

impl Environment for HeadlessEnvironment {
    fn is_backgrounded(&self) -> bool {
        self.backgrounded.load(Ordering::SeqCst)
    }

    fn is_low_power_device(&self) -> bool {
        self.low_power.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_foreground_desktop() {
        let env = HeadlessEnvironment::new();
        assert!(!env.is_backgrounded());
        assert!(!env.is_low_power_device());
    }

    #[test]
    fn test_flags_are_settable() {
        let env = HeadlessEnvironment::low_power();
        assert!(env.is_low_power_device());
        env.set_backgrounded(true);
        assert!(env.is_backgrounded());
        env.set_backgrounded(false);
        assert!(!env.is_backgrounded());
    }
}
