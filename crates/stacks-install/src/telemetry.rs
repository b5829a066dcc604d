//! Tracing setup

use crate::config::LoggingConfig;
use crate::error::{InstallError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber. `RUST_LOG` overrides the configured level.
///
/// A subscriber that is already installed is left in place.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("global subscriber already installed");
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| InstallError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = LoggingConfig::default();
        init_tracing(&config).unwrap();
        assert!(tracing::dispatcher::has_been_set());

        let json = LoggingConfig {
            json: true,
            ..LoggingConfig::default()
        };
        init_tracing(&json).unwrap();
        init_tracing(&config).unwrap();
    }
}
