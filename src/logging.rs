//! Tracing subscriber setup.
//!
//! Logs go to stdout and, when `logging.directory` is set, to a log file in
//! that directory through a non-blocking writer.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Build the filter: `RUST_LOG` wins, otherwise the configured level for this crate
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), &config.level)
}

fn build_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(format!("warn,empowerment_predictor={}", level))
        .context("Invalid logging.level")
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop and must be held for the
/// lifetime of the process.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let json = config.format.eq_ignore_ascii_case("json");

    let stdout_layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir))?;
            let appender = tracing_appender::rolling::never(dir, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let layers = match file_layer {
        Some(file_layer) => vec![stdout_layer, file_layer],
        None => vec![stdout_layer],
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(config)?)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
