//! Subscriber installation
//!
//! Human-readable events go to stderr, leaving stdout for rewritten text
//! and reports. With `logging.local_enabled` a second JSON layer appends to
//! a rolling `faceless.log` under `logging.local_path`.

use crate::config::LoggingConfig;
use crate::domain::{FacelessError, Result};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "faceless.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the file writer thread alive; dropping it flushes pending events
pub struct LoggingGuard {
    file_writer: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether a rolling JSON file is being written
    pub fn writes_file(&self) -> bool {
        self.file_writer.is_some()
    }
}

/// Install the global subscriber
///
/// `level` applies to the `faceless` target; `RUST_LOG` replaces it entirely
/// when set.
///
/// ```no_run
/// use faceless::config::LoggingConfig;
/// use faceless::logging::init_logging;
///
/// let _guard = init_logging("debug", &LoggingConfig::default()).unwrap();
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = level_filter(parse_log_level(level)?);

    let mut layers: Vec<BoxedLayer> = vec![tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter.clone())
        .boxed()];

    let mut file_writer = None;
    if config.local_enabled {
        let (layer, guard) = json_file_layer(config, filter)?;
        layers.push(layer);
        file_writer = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| FacelessError::Configuration(format!("Logging already initialized: {e}")))?;

    tracing::debug!(
        level,
        file = config.local_enabled,
        directory = %config.local_path,
        "Logging ready"
    );

    Ok(LoggingGuard { file_writer })
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("faceless={level}")))
}

fn json_file_layer(config: &LoggingConfig, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard)> {
    let directory = Path::new(&config.local_path);
    std::fs::create_dir_all(directory).map_err(|e| {
        FacelessError::Configuration(format!(
            "Cannot create log directory {}: {e}",
            directory.display()
        ))
    })?;

    let appender = RollingFileAppender::new(rotation(&config.local_rotation), directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_thread_ids(true)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok((layer, guard))
}

fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    let parsed = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            return Err(FacelessError::Configuration(format!(
                "Unknown log level '{level}' (expected trace, debug, info, warn or error)"
            )))
        }
    };
    Ok(parsed)
}
