//! Refine summary and reporting
//!
//! This module defines structures for tracking and reporting refine results.

use crate::adapters::database::InsertResult;
use crate::domain::RefinerError;
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of a refine run
#[derive(Debug, Clone, Default)]
pub struct RefineSummary {
    /// Number of input documents found
    pub documents_total: usize,

    /// Documents whose records were all stored
    pub documents_succeeded: usize,

    /// Documents that failed at any stage
    pub documents_failed: usize,

    /// Records written per table
    pub records_by_table: BTreeMap<&'static str, usize>,

    /// Duration of the run
    pub duration: Duration,

    /// Errors encountered during the run
    pub errors: Vec<RefineError>,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,
}

impl RefineSummary {
    /// Create a new empty refine summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Count a stored document
    pub fn add_success(&mut self, result: &InsertResult) {
        self.documents_succeeded += 1;
        for (table, count) in &result.by_table {
            *self.records_by_table.entry(*table).or_insert(0) += count;
        }
    }

    /// Count a failed document
    pub fn add_failure(&mut self, error: RefineError) {
        self.documents_failed += 1;
        self.errors.push(error);
    }

    /// Total records written across all tables
    pub fn records_written(&self) -> usize {
        self.records_by_table.values().sum()
    }

    /// Check if the run was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.documents_failed == 0 && self.errors.is_empty()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let processed = self.documents_succeeded + self.documents_failed;
        if processed == 0 {
            return 100.0;
        }
        (self.documents_succeeded as f64 / processed as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            documents_total = self.documents_total,
            succeeded = self.documents_succeeded,
            failed = self.documents_failed,
            records_written = self.records_written(),
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            interrupted = self.interrupted,
            "Refine completed"
        );

        for (table, count) in &self.records_by_table {
            tracing::debug!(table = table, count = count, "Records written");
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Refine completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Refine error"
                );
            }
        }
    }
}

/// Stage at which a document failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineErrorType {
    /// The document could not be read
    Io,
    /// The document is not valid JSON or violates the input schema
    Validation,
    /// A timestamp in the document could not be interpreted
    Timestamp,
    /// The sink rejected the records
    Storage,
}

impl RefineErrorType {
    /// Classify an error raised while validating or transforming a document
    pub fn classify(error: &RefinerError) -> Self {
        match error {
            RefinerError::Io(_) => Self::Io,
            RefinerError::Timestamp(_) => Self::Timestamp,
            RefinerError::Database(_) => Self::Storage,
            RefinerError::SchemaValidation(_)
            | RefinerError::Serialization(_)
            | RefinerError::Configuration(_)
            | RefinerError::Other(_) => Self::Validation,
        }
    }
}

/// Refine error with context
#[derive(Debug, Clone)]
pub struct RefineError {
    /// Type of error
    pub error_type: RefineErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., input file path)
    pub context: Option<String>,
}

impl RefineError {
    /// Create a new refine error
    pub fn new(error_type: RefineErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<RefinerError> for RefineError {
    fn from(error: RefinerError) -> Self {
        Self::new(RefineErrorType::classify(&error), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SchemaValidationError, TimestampError};

    fn insert_result(tables: &[(&'static str, usize)]) -> InsertResult {
        InsertResult {
            records_written: tables.iter().map(|(_, count)| count).sum(),
            by_table: tables.iter().copied().collect(),
        }
    }

    #[test]
    fn test_refine_summary_creation() {
        let summary = RefineSummary::new();

        assert_eq!(summary.documents_total, 0);
        assert_eq!(summary.documents_succeeded, 0);
        assert_eq!(summary.documents_failed, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(!summary.interrupted);
    }

    #[test]
    fn test_refine_summary_with_duration() {
        let summary = RefineSummary::new().with_duration(Duration::from_secs(120));
        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_add_success_accumulates_tables() {
        let mut summary = RefineSummary::new();
        summary.add_success(&insert_result(&[("users", 1), ("patients", 2)]));
        summary.add_success(&insert_result(&[("users", 1), ("auth_sources", 1)]));

        assert_eq!(summary.documents_succeeded, 2);
        assert_eq!(summary.records_by_table["users"], 2);
        assert_eq!(summary.records_by_table["patients"], 2);
        assert_eq!(summary.records_written(), 5);
    }

    #[test]
    fn test_refine_summary_is_successful() {
        let mut summary = RefineSummary::new();
        summary.add_success(&insert_result(&[("users", 1)]));
        assert!(summary.is_successful());

        summary.add_failure(RefineError::new(
            RefineErrorType::Validation,
            "bad".to_string(),
        ));
        assert!(!summary.is_successful());
        assert_eq!(summary.documents_failed, 1);
    }

    #[test]
    fn test_refine_summary_success_rate() {
        let mut summary = RefineSummary::new();
        assert_eq!(summary.success_rate(), 100.0);

        summary.documents_succeeded = 3;
        summary.documents_failed = 1;
        assert_eq!(summary.success_rate(), 75.0);
    }

    #[test]
    fn test_classify_errors() {
        let validation: RefinerError = SchemaValidationError::new("email", "missing").into();
        let timestamp: RefinerError = TimestampError::Unparsable("x".to_string()).into();

        assert_eq!(
            RefineErrorType::classify(&validation),
            RefineErrorType::Validation
        );
        assert_eq!(
            RefineErrorType::classify(&timestamp),
            RefineErrorType::Timestamp
        );
        assert_eq!(
            RefineErrorType::classify(&RefinerError::Database("down".to_string())),
            RefineErrorType::Storage
        );
        assert_eq!(
            RefineErrorType::classify(&RefinerError::Io("gone".to_string())),
            RefineErrorType::Io
        );
    }

    #[test]
    fn test_refine_error_with_context() {
        let error: RefineError = RefinerError::Io("denied".to_string()).into();
        let error = error.with_context("path=in/a.json".to_string());

        assert_eq!(error.error_type, RefineErrorType::Io);
        assert_eq!(error.context.as_deref(), Some("path=in/a.json"));
    }
}
