//! Refine coordinator - main orchestrator for the refine process
//!
//! This module drives input documents through validation, transformation and
//! the record sink, one document at a time.

use crate::adapters::database::{InsertResult, RecordSink};
use crate::adapters::memory::MemorySink;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLSink};
use crate::config::{InputConfig, RefinerConfig};
use crate::core::refine::summary::{RefineError, RefineErrorType, RefineSummary};
use crate::core::transform::{DataTransformer, UserTransformer};
use crate::domain::{RefinerError, Result, SchemaValidationError};
use crate::{log_document_start, log_error_with_context, log_refine_complete};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

const INPUT_EXTENSION: &str = "json";

/// Refine coordinator
pub struct RefineCoordinator {
    input: InputConfig,
    dry_run: bool,
    sink: Arc<dyn RecordSink>,
    transformer: Arc<dyn DataTransformer>,
    shutdown_signal: watch::Receiver<bool>,
}

impl RefineCoordinator {
    /// Create a coordinator over an existing sink and transformer
    pub fn new(
        config: &RefinerConfig,
        sink: Arc<dyn RecordSink>,
        transformer: Arc<dyn DataTransformer>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            input: config.input.clone(),
            dry_run: config.application.dry_run,
            sink,
            transformer,
            shutdown_signal,
        }
    }

    /// Create a coordinator with the sink the configuration asks for
    ///
    /// Dry runs use a [`MemorySink`]; otherwise the PostgreSQL sink is
    /// connected and its schema created before any document is read.
    ///
    /// # Errors
    ///
    /// Returns an error if PostgreSQL is not configured, unreachable, or the
    /// schema cannot be created.
    pub async fn from_config(
        config: RefinerConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Result<Self> {
        let sink: Arc<dyn RecordSink> = if config.application.dry_run {
            Arc::new(MemorySink::new())
        } else {
            let pg_config = config.postgresql.clone().ok_or_else(|| {
                RefinerError::Configuration(
                    "postgresql configuration is required unless application.dry_run = true"
                        .to_string(),
                )
            })?;
            let client = PostgreSQLClient::new(pg_config)?;
            tracing::info!(
                database = %client.connection_string_safe(),
                "Connecting to PostgreSQL"
            );
            Arc::new(PostgreSQLSink::new(client))
        };

        sink.test_connection().await?;
        sink.ensure_schema().await?;

        Ok(Self::new(
            &config,
            sink,
            Arc::new(UserTransformer::new()),
            shutdown_signal,
        ))
    }

    /// Execute the refine run
    ///
    /// Documents are processed in path order. A failing document is recorded
    /// in the summary; with `continue_on_error = false` it also ends the run.
    /// A shutdown signal is honoured between documents.
    ///
    /// # Errors
    ///
    /// Returns an error only if the input paths cannot be listed.
    pub async fn execute_refine(&self) -> Result<RefineSummary> {
        let start_time = Instant::now();
        let mut summary = RefineSummary::new();

        let files = collect_input_files(&self.input.paths)?;
        summary.documents_total = files.len();

        tracing::info!(
            documents = files.len(),
            sink = self.sink.name(),
            dry_run = self.dry_run,
            "Starting refine process"
        );

        for (index, path) in files.iter().enumerate() {
            if *self.shutdown_signal.borrow() {
                tracing::info!(
                    processed = index,
                    remaining = files.len() - index,
                    "Shutdown requested, stopping before next document"
                );
                summary.interrupted = true;
                break;
            }

            log_document_start!(path.display(), index + 1, files.len());

            match self.refine_document(path).await {
                Ok(result) => {
                    tracing::debug!(
                        path = %path.display(),
                        records = result.records_written,
                        "Document refined"
                    );
                    summary.add_success(&result);
                }
                Err(error) => {
                    let error = error.with_context(format!("path={}", path.display()));
                    log_error_with_context!(
                        error.message,
                        error.context.as_deref().unwrap_or_default()
                    );
                    summary.add_failure(error);

                    if !self.input.continue_on_error {
                        tracing::warn!("Stopping after first failure (continue_on_error = false)");
                        break;
                    }
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        log_refine_complete!(summary.documents_succeeded, summary.duration);
        summary.log_summary();

        Ok(summary)
    }

    /// Read, validate, transform and store one document
    pub async fn refine_document(
        &self,
        path: &Path,
    ) -> std::result::Result<InsertResult, RefineError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RefineError::new(RefineErrorType::Io, format!("Failed to read document: {e}"))
        })?;

        let document: Value = serde_json::from_slice(&bytes).map_err(|e| {
            let error = SchemaValidationError::new("", format!("malformed JSON: {e}"));
            RefineError::from(RefinerError::from(error))
        })?;

        let records = self.transformer.transform_value(document)?;

        self.sink
            .insert_all(records, self.dry_run)
            .await
            .map_err(|e| RefineError::new(RefineErrorType::Storage, e.to_string()))
    }
}

/// Collect the documents named by the configured input paths
///
/// A file path is taken as is; a directory contributes its `.json` files
/// (not recursive). The result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = std::fs::metadata(path).map_err(|e| {
            RefinerError::Io(format!("Cannot access input {}: {e}", path.display()))
        })?;

        if metadata.is_file() {
            files.push(path.clone());
            continue;
        }

        let entries = std::fs::read_dir(path).map_err(|e| {
            RefinerError::Io(format!("Cannot read directory {}: {e}", path.display()))
        })?;
        for entry in entries {
            let candidate = entry?.path();
            let is_json = candidate
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));
            if is_json && candidate.is_file() {
                files.push(candidate);
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
