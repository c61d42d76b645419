//! Structured logging for the Grotto generator.
//!
//! Console output goes through a `tracing-subscriber` fmt layer; debug builds
//! can additionally write JSON lines to a log directory for later inspection.
//! The level comes from `RUST_LOG` when set, otherwise from the config.

use std::path::Path;

use grotto_config::DebugConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config provide one.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON log inside the configured log directory.
pub const LOG_FILE_NAME: &str = "grotto.log";

/// Initialize the global tracing subscriber.
///
/// `debug_build` gates the JSON file layer; it is only attached when a log
/// directory is configured and can be created. Calling this twice panics, as
/// with any global subscriber, so binaries call it once from `main`.
///
/// ```no_run
/// use grotto_config::DebugConfig;
///
/// grotto_log::init_logging(&DebugConfig::default(), cfg!(debug_assertions));
/// ```
pub fn init_logging(config: &DebugConfig, debug_build: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter_from_level(&config.log_level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = config.log_dir.as_deref()
        && let Some(log_file) = create_log_file(log_dir)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Build an `EnvFilter` from a configured level string, falling back to
/// [`DEFAULT_FILTER`] when the string is empty or unparsable.
pub fn filter_from_level(level: &str) -> EnvFilter {
    if level.trim().is_empty() {
        return EnvFilter::new(DEFAULT_FILTER);
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn create_log_file(log_dir: &Path) -> Option<std::fs::File> {
    std::fs::create_dir_all(log_dir).ok()?;
    std::fs::File::create(log_dir.join(LOG_FILE_NAME)).ok()
}
