//! Tracing subscriber bootstrap

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for the configured level; `RUST_LOG` takes precedence
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// if a global subscriber was already installed (by an earlier call or by
/// the host application).
pub fn init_tracing(config: &LoggingConfig) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let config = LoggingConfig::default();
        // The first call may lose to another test in this binary; the second never wins.
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
