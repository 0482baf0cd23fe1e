//! User and app-specific tables

use super::{Entity, ForeignKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const USER_FK: &[ForeignKey] = &[ForeignKey::new("user_id", "users", "user_id")];

/// Application user owning the imported document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,

    /// Masked email address, never the raw value
    pub email: String,

    pub name: String,
    pub locale: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const PRIMARY_KEY: &'static str = "user_id";

    fn key(&self) -> Option<String> {
        Some(self.user_id.clone())
    }
}

/// Device storage usage reported with a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageMetric {
    /// Assigned by the sink on insert
    pub metric_id: Option<i64>,

    pub user_id: String,
    pub percent_used: f64,
    pub recorded_at: DateTime<Utc>,
}

impl Entity for StorageMetric {
    const TABLE: &'static str = "storage_metrics";
    const PRIMARY_KEY: &'static str = "metric_id";
    const FOREIGN_KEYS: &'static [ForeignKey] = USER_FK;
    const KEY_ASSIGNED_BY_SINK: bool = true;

    fn key(&self) -> Option<String> {
        self.metric_id.map(|id| id.to_string())
    }
}

/// Provenance of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSource {
    /// Assigned by the sink on insert
    pub auth_id: Option<i64>,

    pub user_id: String,
    pub source: String,
    pub collection_date: DateTime<Utc>,
    pub data_type: String,
}

impl Entity for AuthSource {
    const TABLE: &'static str = "auth_sources";
    const PRIMARY_KEY: &'static str = "auth_id";
    const FOREIGN_KEYS: &'static [ForeignKey] = USER_FK;
    const KEY_ASSIGNED_BY_SINK: bool = true;

    fn key(&self) -> Option<String> {
        self.auth_id.map(|id| id.to_string())
    }
}
