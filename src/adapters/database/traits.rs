//! Record sink abstraction
//!
//! This module defines the trait that persistence adapters must implement
//! to receive the canonical records of a transformed document.

use crate::domain::Result;
use crate::refined::RefinedRecord;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Result of writing one document's records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertResult {
    /// Number of records written
    pub records_written: usize,

    /// Records written per table
    pub by_table: BTreeMap<&'static str, usize>,
}

impl InsertResult {
    /// Tally a record set without writing it
    pub fn from_records(records: &[RefinedRecord]) -> Self {
        let mut result = Self::default();
        for record in records {
            result.record(record);
        }
        result
    }

    /// Count one written record
    pub fn record(&mut self, record: &RefinedRecord) {
        self.records_written += 1;
        *self.by_table.entry(record.table_name()).or_insert(0) += 1;
    }
}

/// Persistence sink for canonical records
///
/// A sink accepts records one at a time. `insert_all` receives one document's
/// records in transformer order (parents before children) and may wrap them
/// in a single transaction.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Test the sink connection
    ///
    /// # Errors
    ///
    /// Returns an error if the sink is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the relational schema exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Insert a single record
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    async fn insert(&self, record: RefinedRecord) -> Result<()>;

    /// Insert one document's records in order
    ///
    /// # Arguments
    ///
    /// * `records` - Records of one document, in transformer order
    /// * `dry_run` - If true, skip actual writes and only count the records
    ///
    /// # Errors
    ///
    /// Returns the first insert error; records before it may already be stored
    /// unless the implementation is transactional.
    async fn insert_all(&self, records: Vec<RefinedRecord>, dry_run: bool) -> Result<InsertResult> {
        if dry_run {
            tracing::info!(
                sink = self.name(),
                count = records.len(),
                "DRY RUN: Would insert {} records",
                records.len()
            );
            return Ok(InsertResult::from_records(&records));
        }

        let mut result = InsertResult::default();
        for record in records {
            result.record(&record);
            self.insert(record).await?;
        }
        Ok(result)
    }

    /// Name of the sink, for logs and summaries
    fn name(&self) -> &str;
}
