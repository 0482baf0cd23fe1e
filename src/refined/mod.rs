//! Canonical relational model.
//!
//! Every entity is a flat row type with a primary key, nullable foreign keys
//! and scalar columns. Records are created once by the transformer and never
//! mutated afterwards; ownership passes to the sink.
//!
//! - [`user`] - `User`, `StorageMetric`, `AuthSource`
//! - [`clinical`] - `Patient` and the clinical resources hanging off it
//!
//! [`RefinedRecord`] is the closed set of rows a sink accepts.

pub mod clinical;
pub mod user;

pub use clinical::{
    Claim, Condition, DiagnosticReport, Encounter, Immunization, MedicationRequest,
    Observation, Organization, Patient, Practitioner, Procedure,
};
pub use user::{AuthSource, StorageMetric, User};

use serde::{Deserialize, Serialize};

/// Foreign key from one table column to another table's column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// Relationship metadata of a row type
pub trait Entity {
    /// Table the rows are stored in
    const TABLE: &'static str;

    /// Primary key column
    const PRIMARY_KEY: &'static str;

    /// Outgoing references
    const FOREIGN_KEYS: &'static [ForeignKey] = &[];

    /// Whether the primary key is generated on insert
    const KEY_ASSIGNED_BY_SINK: bool = false;

    /// Primary key value, `None` until a sink-assigned key is known
    fn key(&self) -> Option<String>;
}

impl<E: Entity> Entity for Box<E> {
    const TABLE: &'static str = E::TABLE;
    const PRIMARY_KEY: &'static str = E::PRIMARY_KEY;
    const FOREIGN_KEYS: &'static [ForeignKey] = E::FOREIGN_KEYS;
    const KEY_ASSIGNED_BY_SINK: bool = E::KEY_ASSIGNED_BY_SINK;

    fn key(&self) -> Option<String> {
        (**self).key()
    }
}

/// One row of the canonical model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", content = "record")]
pub enum RefinedRecord {
    #[serde(rename = "users")]
    User(User),
    #[serde(rename = "storage_metrics")]
    StorageMetric(StorageMetric),
    #[serde(rename = "auth_sources")]
    AuthSource(AuthSource),
    #[serde(rename = "patients")]
    Patient(Box<Patient>),
    #[serde(rename = "practitioners")]
    Practitioner(Practitioner),
    #[serde(rename = "organizations")]
    Organization(Organization),
    #[serde(rename = "encounters")]
    Encounter(Encounter),
    #[serde(rename = "observations")]
    Observation(Box<Observation>),
    #[serde(rename = "conditions")]
    Condition(Condition),
    #[serde(rename = "medication_requests")]
    MedicationRequest(MedicationRequest),
    #[serde(rename = "immunizations")]
    Immunization(Immunization),
    #[serde(rename = "diagnostic_reports")]
    DiagnosticReport(DiagnosticReport),
    #[serde(rename = "procedures")]
    Procedure(Procedure),
    #[serde(rename = "claims")]
    Claim(Claim),
}

macro_rules! for_each_record {
    ($record:expr, $row:ident => $body:expr) => {
        match $record {
            RefinedRecord::User($row) => $body,
            RefinedRecord::StorageMetric($row) => $body,
            RefinedRecord::AuthSource($row) => $body,
            RefinedRecord::Patient($row) => $body,
            RefinedRecord::Practitioner($row) => $body,
            RefinedRecord::Organization($row) => $body,
            RefinedRecord::Encounter($row) => $body,
            RefinedRecord::Observation($row) => $body,
            RefinedRecord::Condition($row) => $body,
            RefinedRecord::MedicationRequest($row) => $body,
            RefinedRecord::Immunization($row) => $body,
            RefinedRecord::DiagnosticReport($row) => $body,
            RefinedRecord::Procedure($row) => $body,
            RefinedRecord::Claim($row) => $body,
        }
    };
}

fn table_of<E: Entity>(_: &E) -> &'static str {
    E::TABLE
}

fn primary_key_of<E: Entity>(_: &E) -> &'static str {
    E::PRIMARY_KEY
}

fn foreign_keys_of<E: Entity>(_: &E) -> &'static [ForeignKey] {
    E::FOREIGN_KEYS
}

impl RefinedRecord {
    /// Table this record belongs to
    pub fn table_name(&self) -> &'static str {
        for_each_record!(self, row => table_of(row))
    }

    /// Primary key column of the table
    pub fn primary_key(&self) -> &'static str {
        for_each_record!(self, row => primary_key_of(row))
    }

    /// Outgoing references of the table
    pub fn foreign_keys(&self) -> &'static [ForeignKey] {
        for_each_record!(self, row => foreign_keys_of(row))
    }

    /// Primary key value, `None` for sink-assigned keys not yet known
    pub fn key(&self) -> Option<String> {
        for_each_record!(self, row => Entity::key(row))
    }
}

impl From<User> for RefinedRecord {
    fn from(user: User) -> Self {
        RefinedRecord::User(user)
    }
}

impl From<StorageMetric> for RefinedRecord {
    fn from(metric: StorageMetric) -> Self {
        RefinedRecord::StorageMetric(metric)
    }
}

impl From<AuthSource> for RefinedRecord {
    fn from(source: AuthSource) -> Self {
        RefinedRecord::AuthSource(source)
    }
}

impl From<Patient> for RefinedRecord {
    fn from(patient: Patient) -> Self {
        RefinedRecord::Patient(Box::new(patient))
    }
}
