//! Process-wide logger construction.
//!
//! # Responsibilities
//! - Leveled, timestamped, machine-parsable records
//! - Daily-rotating file destination bound to the service name
//! - Extra human-readable stdout layer in development
//!
//! # Design Decisions
//! - There is no fallback logger: a failed initialization is fatal
//!   misconfiguration, surfaced synchronously to the orchestrator
//! - The non-blocking writer guard is returned to the caller and must be
//!   held for the process lifetime or buffered records are lost

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ServiceConfig;

/// Error type for logger construction.
#[derive(Debug, thiserror::Error)]
#[error("logger initialization failed: {0}")]
pub struct LoggerInitError(String);

/// Install the global subscriber: JSON records into
/// `<log_dir>/<service-name>.log.<date>`, rotated daily.
pub fn init(config: &ServiceConfig) -> Result<WorkerGuard, LoggerInitError> {
    let appender = tracing_appender::rolling::daily(
        &config.log_dir,
        format!("{}.log", config.service_name),
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(writer);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = if config.is_development() {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    } else {
        registry.try_init()
    };

    installed.map_err(|err| LoggerInitError(err.to_string()))?;
    Ok(guard)
}
