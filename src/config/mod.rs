//! Configuration management for Refiner.
//!
//! Refiner uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REFINER_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use refiner::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("refiner.toml")?;
//!
//! println!("Inputs: {:?}", config.input.paths);
//! println!("Dry run: {}", config.application.dry_run);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and dry-run switch
//! - [`InputConfig`] - input files or directories, error policy
//! - [`PostgreSQLConfig`] - PostgreSQL connection and pool settings
//! - [`LoggingConfig`] - local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! dry_run = false
//!
//! [input]
//! paths = ["/data/profiles"]
//! continue_on_error = true
//!
//! [postgresql]
//! connection_string = "${REFINER_DATABASE_URL}"
//! max_connections = 10
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/refiner"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config, read_config};
pub use schema::{ApplicationConfig, InputConfig, LoggingConfig, PostgreSQLConfig, RefinerConfig};
pub use secret::{secret_string, SecretString, SecretValue};
