use crate::error::ConfigError;
use crate::settings::{LogFormat, LogSettings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "bikesim.log";

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` overrides `settings.level`. With a `directory` set, output goes to a daily
/// rolling file through a non-blocking writer; the returned guard must be held until exit
/// or buffered lines are lost.
pub fn init_logging(settings: &LogSettings) -> Result<Option<WorkerGuard>, ConfigError> {
    // The configured level is checked even when `RUST_LOG` will replace it.
    let configured = EnvFilter::try_new(&settings.level)
        .map_err(|e| ConfigError::Logging(format!("invalid log level '{}': {}", settings.level, e)))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let (result, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let builder = builder.with_writer(writer).with_ansi(false);
            let result = match settings.format {
                LogFormat::Full => builder.try_init(),
                LogFormat::Compact => builder.compact().try_init(),
            };
            (result, Some(guard))
        }
        None => {
            let builder = builder.with_writer(std::io::stderr);
            let result = match settings.format {
                LogFormat::Full => builder.try_init(),
                LogFormat::Compact => builder.compact().try_init(),
            };
            (result, None)
        }
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))?;
    Ok(guard)
}
