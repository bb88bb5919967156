//! Logging bootstrap for hosts embedding Flashdeck

use crate::{ConfigError, LoggingSettings};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice returns
/// an error instead of panicking.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(settings.ansi))
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}
