//! Tracing subscriber setup.
//!
//! Logs go to stderr and, optionally, to `contentlayer.log` in the user data
//! directory through a non-blocking writer. `RUST_LOG` overrides the
//! configured level.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{ConfigFile, DEFAULT_LOG_LEVEL};
use crate::paths::ensure_dir;

/// Name of the log file written into the log directory.
pub const LOG_FILE_NAME: &str = "contentlayer.log";

/// Logging options.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is not set.
    pub level: String,

    /// Directory for the log file, created if missing; `None` disables file
    /// logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Options from the configuration file, logging into `data_dir` when
    /// file logging is enabled.
    pub fn from_config(config: &ConfigFile, data_dir: PathBuf) -> Self {
        Self {
            level: config.logging.level.clone(),
            log_dir: config.logging.file.then_some(data_dir),
        }
    }

    /// Override the level (builder pattern).
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Keeps the background log writer alive. Drop it at shutdown to flush.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// Calling this twice is harmless: the second call leaves the first
/// subscriber in place.
pub fn init_logging(config: &LoggingConfig) -> LoggingGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false);

    let (file_layer, file_guard) = match &config.log_dir {
        Some(dir) if ensure_dir(dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339());
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}
