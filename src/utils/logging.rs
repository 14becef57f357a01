//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the CampBar service.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::errors::{CampBarError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, "campbar.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| CampBarError::Config(format!("Invalid log filter: {}", e)))?;

    let json = config.format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout)))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(non_blocking.clone())))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stdout)))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
        }))
        .try_init()
        .map_err(|e| CampBarError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log trip-level actions with structured data
pub fn log_trip_action(trip_id: i64, action: &str, user_id: i64, details: Option<&str>) {
    info!(
        trip_id = trip_id,
        action = action,
        user_id = user_id,
        details = details,
        "Trip action performed"
    );
}

/// Log SOS lifecycle events; these are always emitted at warn level or above
pub fn log_sos_event(trip_id: i64, alert_id: i64, event: &str, user_id: i64) {
    warn!(
        trip_id = trip_id,
        alert_id = alert_id,
        event = event,
        user_id = user_id,
        "SOS event"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}

/// Log collaborator failures with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}
