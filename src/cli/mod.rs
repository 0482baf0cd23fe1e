//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Refiner using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Refiner - FHIR profile bundle normalizer
#[derive(Parser, Debug)]
#[command(name = "refiner")]
#[command(version, about, long_about = None)]
#[command(author = "Refiner Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "refiner.toml", env = "REFINER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REFINER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate input documents and store their records in PostgreSQL
    Refine(commands::refine::RefineArgs),

    /// Validate one input document and show the records it produces
    Validate(commands::validate::ValidateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate_config::ValidateConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_refine() {
        let cli = Cli::parse_from(["refiner", "refine"]);
        assert_eq!(cli.config, "refiner.toml");
        match cli.command {
            Commands::Refine(args) => {
                assert!(args.paths.is_empty());
                assert!(!args.dry_run);
            }
            other => panic!("expected refine, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_refine_paths_and_dry_run() {
        let cli = Cli::parse_from(["refiner", "refine", "a.json", "in/", "--dry-run"]);
        match cli.command {
            Commands::Refine(args) => {
                assert_eq!(args.paths, vec![PathBuf::from("a.json"), PathBuf::from("in/")]);
                assert!(args.dry_run);
            }
            other => panic!("expected refine, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["refiner", "--config", "custom.toml", "refine"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["refiner", "--log-level", "debug", "refine"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["refiner", "validate", "profile.json"]);
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.file, PathBuf::from("profile.json")),
            other => panic!("expected validate, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_requires_file() {
        assert!(Cli::try_parse_from(["refiner", "validate"]).is_err());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["refiner", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }
}
