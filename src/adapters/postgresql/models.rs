//! PostgreSQL row mapping
//!
//! Maps every canonical entity onto the column list of its table and builds
//! the parameterised upsert used to store it.

use crate::refined::{
    AuthSource, Claim, Condition, DiagnosticReport, Encounter, Entity, Immunization,
    MedicationRequest, Observation, Organization, Patient, Practitioner, Procedure,
    RefinedRecord, StorageMetric, User,
};
use tokio_postgres::types::ToSql;

/// A column name paired with its bound value
pub type Column<'a> = (&'static str, &'a (dyn ToSql + Sync));

fn col<'a, T: ToSql + Sync>(name: &'static str, value: &'a T) -> Column<'a> {
    (name, value)
}

/// Parent tables first, so foreign keys resolve inside one transaction
pub const INSERT_ORDER: [&str; 14] = [
    "users",
    "storage_metrics",
    "auth_sources",
    "practitioners",
    "organizations",
    "patients",
    "encounters",
    "observations",
    "conditions",
    "medication_requests",
    "immunizations",
    "diagnostic_reports",
    "procedures",
    "claims",
];

/// Position of a table in [`INSERT_ORDER`]
pub fn insert_rank(table: &str) -> usize {
    INSERT_ORDER
        .iter()
        .position(|name| *name == table)
        .unwrap_or(INSERT_ORDER.len())
}

/// Column values of a row, in table column order
///
/// Sink-assigned keys are omitted so the database generates them.
pub trait SqlRow: Entity {
    fn columns(&self) -> Vec<Column<'_>>;
}

/// A ready-to-execute insert
pub struct InsertStatement<'a> {
    pub table: &'static str,
    pub sql: String,
    pub params: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> InsertStatement<'a> {
    /// Build the statement for one row
    pub fn for_row<E: SqlRow>(row: &'a E) -> Self {
        let columns = row.columns();
        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let conflict_key = (!E::KEY_ASSIGNED_BY_SINK).then_some(E::PRIMARY_KEY);

        Self {
            table: E::TABLE,
            sql: upsert_sql(E::TABLE, conflict_key, &names),
            params: columns.into_iter().map(|(_, value)| value).collect(),
        }
    }

    /// Build the statement for any canonical record
    pub fn for_record(record: &'a RefinedRecord) -> Self {
        match record {
            RefinedRecord::User(row) => Self::for_row(row),
            RefinedRecord::StorageMetric(row) => Self::for_row(row),
            RefinedRecord::AuthSource(row) => Self::for_row(row),
            RefinedRecord::Patient(row) => Self::for_row(row.as_ref()),
            RefinedRecord::Practitioner(row) => Self::for_row(row),
            RefinedRecord::Organization(row) => Self::for_row(row),
            RefinedRecord::Encounter(row) => Self::for_row(row),
            RefinedRecord::Observation(row) => Self::for_row(row.as_ref()),
            RefinedRecord::Condition(row) => Self::for_row(row),
            RefinedRecord::MedicationRequest(row) => Self::for_row(row),
            RefinedRecord::Immunization(row) => Self::for_row(row),
            RefinedRecord::DiagnosticReport(row) => Self::for_row(row),
            RefinedRecord::Procedure(row) => Self::for_row(row),
            RefinedRecord::Claim(row) => Self::for_row(row),
        }
    }
}

/// `INSERT ... ON CONFLICT (key) DO UPDATE` over the given columns
///
/// Without a conflict key the statement is a plain insert.
pub fn upsert_sql(table: &str, conflict_key: Option<&str>, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    let mut sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );

    if let Some(key) = conflict_key {
        let updates: Vec<String> = columns
            .iter()
            .filter(|column| **column != key)
            .map(|column| format!("{column} = EXCLUDED.{column}"))
            .collect();

        if updates.is_empty() {
            sql.push_str(&format!(" ON CONFLICT ({key}) DO NOTHING"));
        } else {
            sql.push_str(&format!(
                " ON CONFLICT ({key}) DO UPDATE SET {}",
                updates.join(", ")
            ));
        }
    }

    sql
}

impl SqlRow for User {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("user_id", &self.user_id),
            col("email", &self.email),
            col("name", &self.name),
            col("locale", &self.locale),
            col("created_at", &self.created_at),
        ]
    }
}

impl SqlRow for StorageMetric {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("user_id", &self.user_id),
            col("percent_used", &self.percent_used),
            col("recorded_at", &self.recorded_at),
        ]
    }
}

impl SqlRow for AuthSource {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("user_id", &self.user_id),
            col("source", &self.source),
            col("collection_date", &self.collection_date),
            col("data_type", &self.data_type),
        ]
    }
}

impl SqlRow for Patient {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("first_name", &self.first_name),
            col("last_name", &self.last_name),
            col("prefix", &self.prefix),
            col("gender", &self.gender),
            col("birth_date", &self.birth_date),
            col("deceased_date_time", &self.deceased_date_time),
            col("marital_status", &self.marital_status),
            col("multiple_birth_boolean", &self.multiple_birth_boolean),
            col("race", &self.race),
            col("ethnicity", &self.ethnicity),
            col("birth_sex", &self.birth_sex),
            col("birth_place_city", &self.birth_place_city),
            col("birth_place_state", &self.birth_place_state),
            col("birth_place_country", &self.birth_place_country),
            col("address_line", &self.address_line),
            col("address_city", &self.address_city),
            col("address_state", &self.address_state),
            col("address_postal_code", &self.address_postal_code),
            col("address_country", &self.address_country),
            col("address_latitude", &self.address_latitude),
            col("address_longitude", &self.address_longitude),
            col("phone", &self.phone),
            col("language", &self.language),
            col("ssn", &self.ssn),
            col("drivers_license", &self.drivers_license),
            col("mothers_maiden_name", &self.mothers_maiden_name),
            col("daly", &self.daly),
            col("qaly", &self.qaly),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Practitioner {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("first_name", &self.first_name),
            col("last_name", &self.last_name),
            col("prefix", &self.prefix),
            col("suffix", &self.suffix),
            col("gender", &self.gender),
            col("birth_date", &self.birth_date),
            col("npi", &self.npi),
            col("license_number", &self.license_number),
            col("specialty", &self.specialty),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Organization {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("name", &self.name),
            col("type", &self.organization_type),
            col("address_line", &self.address_line),
            col("address_city", &self.address_city),
            col("address_state", &self.address_state),
            col("address_postal_code", &self.address_postal_code),
            col("address_country", &self.address_country),
            col("phone", &self.phone),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Encounter {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("practitioner_id", &self.practitioner_id),
            col("organization_id", &self.organization_id),
            col("status", &self.status),
            col("class_code", &self.class_code),
            col("type_code", &self.type_code),
            col("type_display", &self.type_display),
            col("start_date", &self.start_date),
            col("end_date", &self.end_date),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Observation {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("encounter_id", &self.encounter_id),
            col("performer_id", &self.performer_id),
            col("status", &self.status),
            col("category_code", &self.category_code),
            col("code", &self.code),
            col("display", &self.display),
            col("effective_date_time", &self.effective_date_time),
            col("issued", &self.issued),
            col("value_quantity", &self.value_quantity),
            col("value_unit", &self.value_unit),
            col("value_code", &self.value_code),
            col("value_display", &self.value_display),
            col("value_string", &self.value_string),
            col("value_boolean", &self.value_boolean),
            col("reference_range_low", &self.reference_range_low),
            col("reference_range_high", &self.reference_range_high),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Condition {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("encounter_id", &self.encounter_id),
            col("asserter_id", &self.asserter_id),
            col("status", &self.status),
            col("category_code", &self.category_code),
            col("code", &self.code),
            col("display", &self.display),
            col("onset_date_time", &self.onset_date_time),
            col("abatement_date_time", &self.abatement_date_time),
            col("clinical_status", &self.clinical_status),
            col("verification_status", &self.verification_status),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for MedicationRequest {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("encounter_id", &self.encounter_id),
            col("requester_id", &self.requester_id),
            col("status", &self.status),
            col("intent", &self.intent),
            col("medication_code", &self.medication_code),
            col("medication_display", &self.medication_display),
            col("authored_on", &self.authored_on),
            col("dosage_instruction", &self.dosage_instruction),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Immunization {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("performer_id", &self.performer_id),
            col("status", &self.status),
            col("vaccine_code", &self.vaccine_code),
            col("vaccine_display", &self.vaccine_display),
            col("occurrence_date_time", &self.occurrence_date_time),
            col("lot_number", &self.lot_number),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for DiagnosticReport {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("encounter_id", &self.encounter_id),
            col("performer_id", &self.performer_id),
            col("status", &self.status),
            col("category_code", &self.category_code),
            col("code", &self.code),
            col("display", &self.display),
            col("effective_date_time", &self.effective_date_time),
            col("issued", &self.issued),
            col("conclusion", &self.conclusion),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Procedure {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("encounter_id", &self.encounter_id),
            col("performer_id", &self.performer_id),
            col("location_id", &self.location_id),
            col("status", &self.status),
            col("code", &self.code),
            col("display", &self.display),
            col("performed_date_time", &self.performed_date_time),
            col("import_date", &self.import_date),
        ]
    }
}

impl SqlRow for Claim {
    fn columns(&self) -> Vec<Column<'_>> {
        vec![
            col("id", &self.id),
            col("resource_id", &self.resource_id),
            col("patient_id", &self.patient_id),
            col("insurer_id", &self.insurer_id),
            col("status", &self.status),
            col("type_code", &self.type_code),
            col("type_display", &self.type_display),
            col("sub_type_code", &self.sub_type_code),
            col("sub_type_display", &self.sub_type_display),
            col("use", &self.claim_use),
            col("created", &self.created),
            col("total", &self.total),
            col("import_date", &self.import_date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_upsert_sql_with_conflict_key() {
        let sql = upsert_sql("users", Some("user_id"), &["user_id", "email", "name"]);
        assert_eq!(
            sql,
            "INSERT INTO users (user_id, email, name) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE SET email = EXCLUDED.email, name = EXCLUDED.name"
        );
    }

    #[test]
    fn test_upsert_sql_without_conflict_key() {
        let sql = upsert_sql("storage_metrics", None, &["user_id", "percent_used"]);
        assert_eq!(
            sql,
            "INSERT INTO storage_metrics (user_id, percent_used) VALUES ($1, $2)"
        );
    }

    #[test]
    fn test_sink_assigned_key_is_not_bound() {
        let metric = StorageMetric {
            metric_id: None,
            user_id: "u1".to_string(),
            percent_used: 10.0,
            recorded_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        };
        let statement = InsertStatement::for_row(&metric);
        assert_eq!(statement.table, "storage_metrics");
        assert!(!statement.sql.contains("metric_id"));
        assert!(!statement.sql.contains("ON CONFLICT"));
        assert_eq!(statement.params.len(), 3);
    }

    #[test]
    fn test_patient_statement_binds_every_column() {
        let record = RefinedRecord::from(Patient {
            id: "p1".to_string(),
            resource_id: "p1".to_string(),
            ..Default::default()
        });
        let statement = InsertStatement::for_record(&record);
        assert_eq!(statement.table, "patients");
        assert_eq!(statement.params.len(), 31);
        assert!(statement.sql.contains("ON CONFLICT (id) DO UPDATE"));
        assert!(statement.sql.contains("$31"));
    }

    #[test]
    fn test_reserved_word_columns() {
        let claim = Claim::default();
        let statement = InsertStatement::for_row(&claim);
        assert!(statement.sql.contains("use = EXCLUDED.use"));
    }

    #[test]
    fn test_insert_rank_orders_parents_first() {
        assert!(insert_rank("users") < insert_rank("auth_sources"));
        assert!(insert_rank("patients") < insert_rank("encounters"));
        assert!(insert_rank("practitioners") < insert_rank("observations"));
        assert_eq!(insert_rank("unknown"), INSERT_ORDER.len());
    }
}
