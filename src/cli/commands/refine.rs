//! Refine command implementation
//!
//! This module implements the `refine` command, which validates input
//! documents and stores their canonical records in PostgreSQL.

use crate::config::loader::{read_config, validate};
use crate::core::refine::RefineCoordinator;
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the refine command
#[derive(Args, Debug)]
pub struct RefineArgs {
    /// Input files or directories (overrides input.paths)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Dry run mode - validate and transform without writing to PostgreSQL
    #[arg(long)]
    pub dry_run: bool,
}

impl RefineArgs {
    /// Execute the refine command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting refine command");

        let mut config = match read_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if !self.paths.is_empty() {
            tracing::info!(paths = ?self.paths, "Overriding input paths from CLI");
            config.input.paths = self.paths.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = validate(&config) {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("{e}");
            return Ok(2); // Configuration error exit code
        }

        if config.input.paths.is_empty() {
            eprintln!("No input paths given. Set input.paths or pass PATHS.");
            return Ok(2);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to the database");
            println!();
        }

        let coordinator = match RefineCoordinator::from_config(config, shutdown_signal).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create refine coordinator");
                eprintln!("Failed to initialize refine: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("🚀 Starting refine...");
        println!();

        let summary = match coordinator.execute_refine().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Refine failed");
                eprintln!("Refine failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!();
        println!("📊 Refine Summary:");
        println!("  Documents: {}", summary.documents_total);
        println!("  Succeeded: {}", summary.documents_succeeded);
        println!("  Failed: {}", summary.documents_failed);
        println!("  Records Written: {}", summary.records_written());
        for (table, count) in &summary.records_by_table {
            println!("    {table}: {count}");
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Success Rate: {:.2}%", summary.success_rate());
        println!();

        if !summary.errors.is_empty() {
            println!("⚠️  Errors encountered:");
            for error in &summary.errors {
                println!("  - {:?}: {}", error.error_type, error.message);
                if let Some(context) = &error.context {
                    println!("    Context: {context}");
                }
            }
            println!();
        }

        let exit_code = if summary.interrupted {
            println!("⚠️  Refine interrupted. Documents already stored are kept.");
            tracing::info!("Refine interrupted by user signal");
            130 // SIGINT exit code (standard Unix convention)
        } else if summary.is_successful() {
            println!("✅ Refine completed successfully!");
            0
        } else {
            println!("⚠️  Refine completed with failures");
            1 // Partial success
        };

        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = RefineArgs {
            paths: Vec::new(),
            dry_run: true,
        };
        let (_tx, rx) = watch::channel(false);

        let code = args
            .execute("/nonexistent/refiner.toml", rx)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_missing_postgresql_is_config_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("refiner.toml");
        std::fs::write(&config_path, "[input]\npaths = [\"in\"]\n").unwrap();

        let args = RefineArgs {
            paths: Vec::new(),
            dry_run: false,
        };
        let (_tx, rx) = watch::channel(false);

        let code = args
            .execute(config_path.to_str().unwrap(), rx)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_dry_run_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("refiner.toml");
        std::fs::write(&config_path, "[logging]\nlocal_enabled = false\n").unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();

        let args = RefineArgs {
            paths: vec![input],
            dry_run: true,
        };
        let (_tx, rx) = watch::channel(false);

        let code = args
            .execute(config_path.to_str().unwrap(), rx)
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
