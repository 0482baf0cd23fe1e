//! PostgreSQL record sink
//!
//! Stores each document's records in one transaction so a failed document
//! leaves no partial rows behind.

use crate::adapters::database::traits::{InsertResult, RecordSink};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{insert_rank, InsertStatement};
use crate::domain::{RefinerError, Result};
use crate::refined::RefinedRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of [`RecordSink`]
pub struct PostgreSQLSink {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLSink {
    /// Create a new PostgreSQL sink
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Create a new PostgreSQL sink with an Arc-wrapped client
    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

/// Records sorted so parent tables are written first
///
/// The sort is stable, so records of one table keep transformer order.
pub fn ordered_for_insert(records: &[RefinedRecord]) -> Vec<&RefinedRecord> {
    let mut ordered: Vec<&RefinedRecord> = records.iter().collect();
    ordered.sort_by_key(|record| insert_rank(record.table_name()));
    ordered
}

#[async_trait]
impl RecordSink for PostgreSQLSink {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn insert(&self, record: RefinedRecord) -> Result<()> {
        let statement = InsertStatement::for_record(&record);
        self.client
            .execute(&statement.sql, &statement.params)
            .await
            .map_err(|e| {
                RefinerError::Database(format!("Failed to insert into {}: {e}", statement.table))
            })?;
        Ok(())
    }

    async fn insert_all(&self, records: Vec<RefinedRecord>, dry_run: bool) -> Result<InsertResult> {
        if dry_run {
            tracing::info!(
                count = records.len(),
                "DRY RUN: Would insert {} records into PostgreSQL",
                records.len()
            );
            return Ok(InsertResult::from_records(&records));
        }

        let mut conn = self.client.get_connection().await?;
        let transaction = conn
            .transaction()
            .await
            .map_err(|e| RefinerError::Database(format!("Failed to begin transaction: {e}")))?;

        let mut result = InsertResult::default();
        for record in ordered_for_insert(&records) {
            let statement = InsertStatement::for_record(record);
            transaction
                .execute(statement.sql.as_str(), &statement.params)
                .await
                .map_err(|e| {
                    RefinerError::Database(format!(
                        "Failed to insert into {}: {e}",
                        statement.table
                    ))
                })?;
            result.record(record);
        }

        transaction
            .commit()
            .await
            .map_err(|e| RefinerError::Database(format!("Failed to commit transaction: {e}")))?;

        tracing::debug!(
            records = result.records_written,
            "Committed document records to PostgreSQL"
        );

        Ok(result)
    }

    fn name(&self) -> &str {
        "postgresql"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refined::{Observation, Patient, User};
    use chrono::{TimeZone, Utc};

    fn user() -> RefinedRecord {
        RefinedRecord::User(User {
            user_id: "u1".to_string(),
            email: "***1@example.com".to_string(),
            name: "Ada".to_string(),
            locale: "en-US".to_string(),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        })
    }

    fn patient(id: &str) -> RefinedRecord {
        Patient {
            id: id.to_string(),
            resource_id: id.to_string(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_ordered_for_insert_puts_parents_first() {
        let observation = RefinedRecord::Observation(Box::new(Observation {
            id: "o1".to_string(),
            patient_id: Some("p1".to_string()),
            ..Default::default()
        }));
        let records = vec![observation, patient("p1"), patient("p2"), user()];

        let tables: Vec<&str> = ordered_for_insert(&records)
            .iter()
            .map(|record| record.table_name())
            .collect();
        assert_eq!(tables, ["users", "patients", "patients", "observations"]);

        let patients: Vec<Option<String>> = ordered_for_insert(&records)
            .iter()
            .filter(|record| record.table_name() == "patients")
            .map(|record| record.key())
            .collect();
        assert_eq!(patients, [Some("p1".to_string()), Some("p2".to_string())]);
    }
}
