//! End-to-end tests for the refine pipeline
//!
//! Documents go through validation, transformation and an in-memory sink.

use chrono::{NaiveDate, TimeZone, Utc};
use refiner::adapters::database::RecordSink;
use refiner::adapters::MemorySink;
use refiner::anonymization::mask_email;
use refiner::config::RefinerConfig;
use refiner::core::refine::{RefineCoordinator, RefineErrorType};
use refiner::core::transform::{DataTransformer, UserTransformer};
use refiner::refined::RefinedRecord;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

fn scenario() -> Value {
    json!({
        "userId": "u1",
        "email": "a@b.com",
        "timestamp": 1_700_000_000,
        "profile": {"name": "Ada", "locale": "en-US"},
        "metadata": {"source": "x", "collectionDate": "2023-01-01", "dataType": "export"},
        "resourceType": "Bundle",
        "type": "transaction",
        "entry": [{"resource": {
            "resourceType": "Patient",
            "id": "p1",
            "gender": "female",
            "birthDate": "1990-01-01"
        }}]
    })
}

#[test]
fn test_end_to_end_scenario() {
    let records = UserTransformer::new().transform_value(scenario()).unwrap();
    let import_date = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    assert_eq!(records.len(), 3);

    match &records[0] {
        RefinedRecord::User(user) => {
            assert_eq!(user.user_id, "u1");
            assert_eq!(user.email, mask_email("a@b.com"));
            assert_ne!(user.email, "a@b.com");
            assert_eq!(user.name, "Ada");
            assert_eq!(user.locale, "en-US");
            assert_eq!(user.created_at, import_date);
        }
        other => panic!("expected user, got {other:?}"),
    }

    match &records[1] {
        RefinedRecord::AuthSource(source) => {
            assert_eq!(source.user_id, "u1");
            assert_eq!(source.source, "x");
            assert_eq!(source.data_type, "export");
            assert_eq!(
                source.collection_date,
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
            );
        }
        other => panic!("expected auth source, got {other:?}"),
    }

    match &records[2] {
        RefinedRecord::Patient(patient) => {
            assert_eq!(patient.id, "p1");
            assert_eq!(patient.gender.as_deref(), Some("female"));
            assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));
            assert_eq!(patient.import_date, Some(import_date));
        }
        other => panic!("expected patient, got {other:?}"),
    }

    assert!(records
        .iter()
        .all(|record| record.table_name() != "storage_metrics"));
}

#[test]
fn test_transform_is_deterministic() {
    let mut doc = scenario();
    doc["storage"] = json!({"percentUsed": 71.0});
    doc["entry"] = json!([
        {"resource": {"resourceType": "Patient", "id": "p1", "name": [{"given": ["Ada"], "family": "Lovelace", "prefix": ["Dr"]}]}},
        {"resource": {"resourceType": "Encounter", "id": "e1"}},
        {"resource": {"resourceType": "Patient", "id": "p2", "name": []}}
    ]);

    let transformer = UserTransformer::new();
    let first = transformer.transform_value(doc.clone()).unwrap();
    let second = transformer.transform_value(doc).unwrap();

    assert_eq!(first, second);

    let tables: Vec<_> = first.iter().map(RefinedRecord::table_name).collect();
    assert_eq!(
        tables,
        ["users", "storage_metrics", "auth_sources", "patients", "patients"]
    );

    match (&first[3], &first[4]) {
        (RefinedRecord::Patient(named), RefinedRecord::Patient(unnamed)) => {
            assert_eq!(named.first_name.as_deref(), Some("Ada"));
            assert_eq!(named.last_name.as_deref(), Some("Lovelace"));
            assert_eq!(named.prefix.as_deref(), Some("Dr"));
            assert_eq!(unnamed.first_name, None);
            assert_eq!(unnamed.last_name, None);
            assert_eq!(named.import_date, unnamed.import_date);
        }
        other => panic!("expected two patients, got {other:?}"),
    }
}

#[test]
fn test_records_carry_relationship_metadata() {
    let records = UserTransformer::new().transform_value(scenario()).unwrap();

    let user = &records[0];
    assert_eq!(user.primary_key(), "user_id");
    assert_eq!(user.key().as_deref(), Some("u1"));

    let source = &records[1];
    assert_eq!(source.key(), None);
    assert_eq!(source.foreign_keys()[0].references_table, "users");
}

#[tokio::test]
async fn test_refine_directory_into_memory_sink() {
    let dir = TempDir::new().unwrap();
    let mut second = scenario();
    second["userId"] = json!("u2");
    second["email"] = json!("b@c.org");
    second["storage"] = json!({"percentUsed": 10.0});
    second["entry"][0]["resource"]["id"] = json!("p2");

    std::fs::write(dir.path().join("a.json"), scenario().to_string()).unwrap();
    std::fs::write(dir.path().join("b.json"), second.to_string()).unwrap();
    std::fs::write(dir.path().join("c.json"), "{\"userId\": 1}").unwrap();
    std::fs::write(dir.path().join("ignored.csv"), "a,b").unwrap();

    let mut config: RefinerConfig = toml::from_str("").unwrap();
    config.input.paths = vec![dir.path().to_path_buf()];

    let sink = Arc::new(MemorySink::new());
    let (_tx, rx) = watch::channel(false);
    let coordinator = RefineCoordinator::new(
        &config,
        sink.clone(),
        Arc::new(UserTransformer::new()),
        rx,
    );

    let summary = coordinator.execute_refine().await.unwrap();

    assert_eq!(summary.documents_total, 3);
    assert_eq!(summary.documents_succeeded, 2);
    assert_eq!(summary.documents_failed, 1);
    assert_eq!(summary.errors[0].error_type, RefineErrorType::Validation);
    assert_eq!(summary.records_by_table["users"], 2);
    assert_eq!(summary.records_by_table["storage_metrics"], 1);
    assert_eq!(summary.records_by_table["patients"], 2);

    let metrics = sink.records_for("storage_metrics").await;
    match &metrics[0] {
        RefinedRecord::StorageMetric(metric) => {
            assert_eq!(metric.user_id, "u2");
            assert!(metric.metric_id.is_some());
        }
        other => panic!("expected storage metric, got {other:?}"),
    }
}

#[tokio::test]
async fn test_memory_sink_keeps_transformer_order() {
    let records = UserTransformer::new().transform_value(scenario()).unwrap();
    let sink = MemorySink::new();

    let result = sink.insert_all(records.clone(), false).await.unwrap();

    assert_eq!(result.records_written, 3);
    let stored: Vec<_> = sink
        .records()
        .await
        .iter()
        .map(RefinedRecord::table_name)
        .collect();
    assert_eq!(stored, ["users", "auth_sources", "patients"]);
}
