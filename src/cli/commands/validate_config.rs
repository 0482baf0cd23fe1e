//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Refiner configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateConfigArgs {}

impl ValidateConfigArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Input Paths: {:?}", config.input.paths);
        println!("  Continue On Error: {}", config.input.continue_on_error);

        match config.postgresql {
            Some(ref pg_config) => {
                use secrecy::ExposeSecret;
                let connection_string: &str = pg_config.connection_string.expose_secret().as_ref();
                println!(
                    "  PostgreSQL Connection: {}",
                    connection_string.rsplit('@').next().unwrap_or("***")
                );
                println!("  Max Connections: {}", pg_config.max_connections);
                println!(
                    "  Statement Timeout: {}s",
                    pg_config.statement_timeout_seconds
                );
            }
            None => println!("  PostgreSQL: not configured"),
        }

        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();

        Ok(0)
    }
}
