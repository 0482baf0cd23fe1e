//! FHIR core and clinical tables
//!
//! `Patient` is the root of the clinical subgraph. Practitioners and
//! organizations are only referenced by id, never owned.

use super::{Entity, ForeignKey};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const PATIENT: ForeignKey = ForeignKey::new("patient_id", "patients", "id");
const ENCOUNTER: ForeignKey = ForeignKey::new("encounter_id", "encounters", "id");

macro_rules! keyed_by_id {
    ($entity:ty, $table:literal, [$($fk:expr),* $(,)?]) => {
        impl Entity for $entity {
            const TABLE: &'static str = $table;
            const PRIMARY_KEY: &'static str = "id";
            const FOREIGN_KEYS: &'static [ForeignKey] = &[$($fk),*];

            fn key(&self) -> Option<String> {
                Some(self.id.clone())
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub resource_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub prefix: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub deceased_date_time: Option<DateTime<Utc>>,
    pub marital_status: Option<String>,
    pub multiple_birth_boolean: Option<bool>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub birth_sex: Option<String>,
    pub birth_place_city: Option<String>,
    pub birth_place_state: Option<String>,
    pub birth_place_country: Option<String>,
    pub address_line: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_country: Option<String>,
    pub address_latitude: Option<f64>,
    pub address_longitude: Option<f64>,
    pub phone: Option<String>,
    pub language: Option<String>,
    pub ssn: Option<String>,
    pub drivers_license: Option<String>,
    pub mothers_maiden_name: Option<String>,
    pub daly: Option<f64>,
    pub qaly: Option<f64>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(Patient, "patients", []);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: String,
    pub resource_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub npi: Option<String>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(Practitioner, "practitioners", []);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub resource_id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub organization_type: Option<String>,
    pub address_line: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_country: Option<String>,
    pub phone: Option<String>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(Organization, "organizations", []);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub practitioner_id: Option<String>,
    pub organization_id: Option<String>,
    pub status: Option<String>,
    pub class_code: Option<String>,
    pub type_code: Option<String>,
    pub type_display: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    Encounter,
    "encounters",
    [
        PATIENT,
        ForeignKey::new("practitioner_id", "practitioners", "id"),
        ForeignKey::new("organization_id", "organizations", "id"),
    ]
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    pub performer_id: Option<String>,
    pub status: Option<String>,
    pub category_code: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
    pub effective_date_time: Option<DateTime<Utc>>,
    pub issued: Option<DateTime<Utc>>,
    pub value_quantity: Option<f64>,
    pub value_unit: Option<String>,
    pub value_code: Option<String>,
    pub value_display: Option<String>,
    pub value_string: Option<String>,
    pub value_boolean: Option<bool>,
    pub reference_range_low: Option<f64>,
    pub reference_range_high: Option<f64>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    Observation,
    "observations",
    [
        PATIENT,
        ENCOUNTER,
        ForeignKey::new("performer_id", "practitioners", "id"),
    ]
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    pub asserter_id: Option<String>,
    pub status: Option<String>,
    pub category_code: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
    pub onset_date_time: Option<DateTime<Utc>>,
    pub abatement_date_time: Option<DateTime<Utc>>,
    pub clinical_status: Option<String>,
    pub verification_status: Option<String>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    Condition,
    "conditions",
    [
        PATIENT,
        ENCOUNTER,
        ForeignKey::new("asserter_id", "practitioners", "id"),
    ]
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationRequest {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    pub requester_id: Option<String>,
    pub status: Option<String>,
    pub intent: Option<String>,
    pub medication_code: Option<String>,
    pub medication_display: Option<String>,
    pub authored_on: Option<DateTime<Utc>>,
    pub dosage_instruction: Option<String>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    MedicationRequest,
    "medication_requests",
    [
        PATIENT,
        ENCOUNTER,
        ForeignKey::new("requester_id", "practitioners", "id"),
    ]
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Immunization {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub performer_id: Option<String>,
    pub status: Option<String>,
    pub vaccine_code: Option<String>,
    pub vaccine_display: Option<String>,
    pub occurrence_date_time: Option<DateTime<Utc>>,
    pub lot_number: Option<String>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    Immunization,
    "immunizations",
    [
        PATIENT,
        ForeignKey::new("performer_id", "practitioners", "id"),
    ]
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    pub performer_id: Option<String>,
    pub status: Option<String>,
    pub category_code: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
    pub effective_date_time: Option<DateTime<Utc>>,
    pub issued: Option<DateTime<Utc>>,
    pub conclusion: Option<String>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    DiagnosticReport,
    "diagnostic_reports",
    [
        PATIENT,
        ENCOUNTER,
        ForeignKey::new("performer_id", "practitioners", "id"),
    ]
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    pub performer_id: Option<String>,
    pub location_id: Option<String>,
    pub status: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
    pub performed_date_time: Option<DateTime<Utc>>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    Procedure,
    "procedures",
    [
        PATIENT,
        ENCOUNTER,
        ForeignKey::new("performer_id", "practitioners", "id"),
        ForeignKey::new("location_id", "organizations", "id"),
    ]
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub resource_id: String,
    pub patient_id: Option<String>,
    pub insurer_id: Option<String>,
    pub status: Option<String>,
    pub type_code: Option<String>,
    pub type_display: Option<String>,
    pub sub_type_code: Option<String>,
    pub sub_type_display: Option<String>,
    #[serde(rename = "use")]
    pub claim_use: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub total: Option<f64>,
    pub import_date: Option<DateTime<Utc>>,
}

keyed_by_id!(
    Claim,
    "claims",
    [
        PATIENT,
        ForeignKey::new("insurer_id", "organizations", "id"),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clinical_tables_reference_patients() {
        for foreign_keys in [
            Encounter::FOREIGN_KEYS,
            Observation::FOREIGN_KEYS,
            Condition::FOREIGN_KEYS,
            MedicationRequest::FOREIGN_KEYS,
            Immunization::FOREIGN_KEYS,
            DiagnosticReport::FOREIGN_KEYS,
            Procedure::FOREIGN_KEYS,
            Claim::FOREIGN_KEYS,
        ] {
            assert!(foreign_keys
                .iter()
                .any(|fk| fk.column == "patient_id" && fk.references_table == "patients"));
        }
        assert!(Patient::FOREIGN_KEYS.is_empty());
    }

    #[test]
    fn test_reserved_column_names_serialize() {
        let claim = Claim {
            id: "c1".to_string(),
            resource_id: "c1".to_string(),
            claim_use: Some("claim".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&claim).unwrap();
        assert_eq!(value["use"], "claim");

        let organization = Organization {
            organization_type: Some("prov".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&organization).unwrap();
        assert_eq!(value["type"], "prov");
    }
}
