//! # Structured Logging Module
//!
//! Environment-aware structured logging that writes human-readable output to
//! the console and JSON lines to a file under the configured log directory.

use crate::config::LoggingConfig;
use chrono::Utc;
use std::fs;
use std::process;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging for the environment the configuration was
/// loaded for (see [`crate::config::ConfigManager::environment`]).
///
/// Safe to call more than once; only the first call installs the subscriber.
pub fn init_structured_logging(config: &LoggingConfig, environment: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = environment.to_lowercase();
        let log_level = config
            .level
            .clone()
            .unwrap_or_else(|| get_log_level(&environment).to_string());

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(true)
            .with_filter(EnvFilter::new(log_level.clone()));

        let file_layer = if config.json_file {
            match fs::create_dir_all(&config.directory) {
                Ok(()) => {
                    let pid = process::id();
                    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
                    let file_name = format!("{environment}.{pid}.{timestamp}.log");
                    let appender = tracing_appender::rolling::never(&config.directory, file_name);
                    let (writer, guard) = tracing_appender::non_blocking(appender);
                    // Flush guard lives for the rest of the process
                    std::mem::forget(guard);

                    Some(
                        fmt::layer()
                            .with_writer(writer)
                            .with_target(true)
                            .with_thread_ids(true)
                            .with_level(true)
                            .with_ansi(false)
                            .json()
                            .with_filter(EnvFilter::new(log_level)),
                    )
                }
                Err(e) => {
                    eprintln!(
                        "log directory {} unavailable, file logging disabled: {e}",
                        config.directory.display()
                    );
                    None
                }
            }
        } else {
            None
        };

        // A subscriber may already be installed by a test harness or an embedding binary
        if tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            log_directory = %config.directory.display(),
            json_file = config.json_file,
            "Structured logging initialized"
        );
    });
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for database operations
pub fn log_database_operation(
    operation: &str,
    table: Option<&str>,
    record_id: Option<i64>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        table = table,
        record_id = record_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "DATABASE_OPERATION"
    );
}

/// Log structured data for cart and order operations
pub fn log_order_operation(
    operation: &str,
    user_id: i64,
    reference: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        user_id = user_id,
        reference = reference,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "ORDER_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig {
            directory: std::env::temp_dir().join("swiggy-logging-test"),
            json_file: false,
            level: Some("warn".to_string()),
        };
        init_structured_logging(&config, "Test");
        init_structured_logging(&config, "production");
        assert!(LOGGER_INITIALIZED.get().is_some());
    }
}
