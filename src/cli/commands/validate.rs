//! Validate command implementation
//!
//! This module implements the `validate` command, which checks one input
//! document and shows the records it would produce. No sink is touched.

use crate::adapters::database::InsertResult;
use crate::core::transform::{DataTransformer, UserTransformer};
use crate::domain::RefinerError;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Input document to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(path = %self.file.display(), "Validating document");

        println!("🔍 Validating document: {}", self.file.display());
        println!();

        let contents = match tokio::fs::read(&self.file).await {
            Ok(contents) => contents,
            Err(e) => {
                println!("❌ Failed to read document");
                println!("   Error: {e}");
                return Ok(1);
            }
        };

        let bundle = match crate::schema::validate_slice(&contents) {
            Ok(bundle) => {
                println!("✅ Document matches the input schema");
                bundle
            }
            Err(e) => {
                println!("❌ Document validation failed");
                println!("   Path: {}", e.path);
                println!("   Error: {}", e.message);
                return Ok(1);
            }
        };

        match UserTransformer::new().transform(&bundle) {
            Ok(records) => {
                let result = InsertResult::from_records(&records);
                println!("✅ Document transformed successfully");
                println!();
                println!("Record Summary:");
                println!("  Entries: {}", bundle.entry.len());
                println!("  Records: {}", result.records_written);
                for (table, count) in &result.by_table {
                    println!("    {table}: {count}");
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Document transformation failed");
                println!("   Error: {e}");
                if matches!(e, RefinerError::Timestamp(_)) {
                    println!("   Check `timestamp` and `metadata.collectionDate`");
                }
                println!();
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("profile.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_valid_document() {
        let dir = TempDir::new().unwrap();
        let document = json!({
            "userId": "u1",
            "email": "a@b.com",
            "timestamp": 1_700_000_000,
            "profile": {"name": "Ada", "locale": "en-US"},
            "metadata": {"source": "x", "collectionDate": "2023-01-01", "dataType": "export"},
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": []
        });
        let args = ValidateArgs {
            file: write(&dir, &document.to_string()),
        };

        assert_eq!(args.execute().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_document() {
        let dir = TempDir::new().unwrap();
        let args = ValidateArgs {
            file: write(&dir, r#"{"resourceType": "Bundle"}"#),
        };

        assert_eq!(args.execute().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_document() {
        let args = ValidateArgs {
            file: PathBuf::from("/nonexistent/profile.json"),
        };

        assert_eq!(args.execute().await.unwrap(), 1);
    }
}
