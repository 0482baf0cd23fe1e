//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{PostgreSQLConfig, RefinerConfig};
use super::secret_string;
use crate::domain::errors::RefinerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RefinerConfig
/// 4. Applies environment variable overrides (REFINER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use refiner::config::loader::load_config;
///
/// let config = load_config("refiner.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RefinerConfig> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Loads configuration from a TOML file without validating it
///
/// Lets callers apply command-line overrides before validation.
pub fn read_config(path: impl AsRef<Path>) -> Result<RefinerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RefinerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RefinerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_unvalidated(&contents)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses and validates configuration from TOML text
///
/// Runs the same substitution, override and validation steps as
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<RefinerConfig> {
    let config = parse_unvalidated(contents)?;
    validate(&config)?;
    Ok(config)
}

/// Validates a configuration, mapping failures to configuration errors
pub fn validate(config: &RefinerConfig) -> Result<()> {
    config.validate().map_err(|e| {
        RefinerError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

fn parse_unvalidated(contents: &str) -> Result<RefinerConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RefinerConfig = toml::from_str(&contents)
        .map_err(|e| RefinerError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RefinerError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|missing| missing == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(RefinerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using REFINER_* prefix
///
/// Environment variables follow the pattern: REFINER_<SECTION>_<KEY>
/// For example: REFINER_APPLICATION_LOG_LEVEL, REFINER_POSTGRESQL_CONNECTION_STRING
fn apply_env_overrides(config: &mut RefinerConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("REFINER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("REFINER_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Input overrides
    if let Ok(val) = std::env::var("REFINER_INPUT_PATHS") {
        config.input.paths = val
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .collect();
    }
    if let Ok(val) = std::env::var("REFINER_INPUT_CONTINUE_ON_ERROR") {
        config.input.continue_on_error = val.parse().unwrap_or(true);
    }

    // PostgreSQL overrides; a connection string alone is enough to enable the sink
    if let Ok(val) = std::env::var("REFINER_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg_config) => pg_config.connection_string = secret_string(val),
            None => {
                config.postgresql = Some(PostgreSQLConfig {
                    connection_string: secret_string(val),
                    max_connections: 10,
                    connection_timeout_seconds: 30,
                    statement_timeout_seconds: 60,
                })
            }
        }
    }
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("REFINER_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg_config.max_connections = max;
            }
        }
        if let Ok(val) = std::env::var("REFINER_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS") {
            if let Ok(timeout) = val.parse() {
                pg_config.statement_timeout_seconds = timeout;
            }
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("REFINER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("REFINER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("REFINER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
