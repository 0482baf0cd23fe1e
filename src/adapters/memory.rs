//! In-memory record sink
//!
//! Keeps inserted records in insertion order. Used for dry runs, the
//! `validate` command, and tests.

use crate::adapters::database::traits::RecordSink;
use crate::domain::Result;
use crate::refined::RefinedRecord;
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::Mutex;

/// Record sink backed by a vector
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<RefinedRecord>>,
    next_key: AtomicI64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored records, in insertion order
    pub async fn records(&self) -> Vec<RefinedRecord> {
        self.records.lock().await.clone()
    }

    /// Stored records of one table, in insertion order
    pub async fn records_for(&self, table: &str) -> Vec<RefinedRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|record| record.table_name() == table)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Assign the surrogate keys a database would generate
    fn assign_key(&self, record: &mut RefinedRecord) {
        let slot = match record {
            RefinedRecord::StorageMetric(metric) => &mut metric.metric_id,
            RefinedRecord::AuthSource(source) => &mut source.auth_id,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(self.next_key.fetch_add(1, Ordering::Relaxed) + 1);
        }
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, mut record: RefinedRecord) -> Result<()> {
        self.assign_key(&mut record);
        self.records.lock().await.push(record);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
