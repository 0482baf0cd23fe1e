//! Logging and observability
//!
//! Structured logging with:
//! - JSON-formatted file logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! Email addresses never reach the logs; documents are identified by file
//! path and user id only.
//!
//! # Example
//!
//! ```no_run
//! use refiner::logging::init_logging;
//! use refiner::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of one document
///
/// # Example
///
/// ```no_run
/// use refiner::log_document_start;
/// use std::path::Path;
///
/// log_document_start!(Path::new("in/profile.json").display(), 1, 10);
/// ```
#[macro_export]
macro_rules! log_document_start {
    ($path:expr, $current:expr, $total:expr) => {
        tracing::debug!(
            path = %$path,
            current = $current,
            total = $total,
            "Refining document"
        );
    };
}

/// Log the completion of a refine run
///
/// # Example
///
/// ```no_run
/// use refiner::log_refine_complete;
/// use std::time::Duration;
///
/// log_refine_complete!(42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_refine_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            documents = $count,
            duration_ms = $duration.as_millis() as u64,
            "Refine completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use refiner::log_error_with_context;
/// use refiner::domain::RefinerError;
///
/// let error = RefinerError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}
