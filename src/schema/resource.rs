//! Bundle resources
//!
//! A bundle entry's `resource` is polymorphic over its `resourceType`
//! discriminator: `Patient` gets the strict [`PatientResource`] shape, every
//! other type falls back to [`GenericResource`], which keeps unknown keys.

use super::common::{
    Address, CodeableConcept, Communication, Extension, HumanName, Identifier, Narrative, Telecom,
};
use super::de;
use crate::domain::SchemaValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Discriminator value selecting the Patient shape
pub const PATIENT_RESOURCE_TYPE: &str = "Patient";

/// Literal `resourceType` of a Patient resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientResourceType {
    #[default]
    Patient,
}

/// FHIR Patient, restricted to the fields used downstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientResource {
    #[serde(rename = "resourceType")]
    pub resource_type: PatientResourceType,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<HumanName>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<Telecom>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, rename = "birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(
        default,
        rename = "deceasedDateTime",
        deserialize_with = "de::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub deceased_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,

    #[serde(default, rename = "maritalStatus", skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,

    #[serde(
        default,
        rename = "multipleBirthBoolean",
        skip_serializing_if = "Option::is_none"
    )]
    pub multiple_birth_boolean: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<Vec<Communication>>,
}

/// Permissive shape for every non-Patient resource
///
/// Only the discriminator and `id` are typed. Every other key is kept as raw
/// JSON in `other`, whatever its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericResource {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl GenericResource {
    /// Raw value of a field other than `resourceType` or `id`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.other.get(name)
    }
}

/// Polymorphic bundle entry resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BundleResource {
    Patient(Box<PatientResource>),
    Generic(GenericResource),
}

impl BundleResource {
    /// Validate a raw resource, dispatching on `resourceType`
    ///
    /// The error path is relative to the resource object itself.
    pub fn from_value(value: Value) -> Result<Self, SchemaValidationError> {
        match value.get("resourceType") {
            Some(Value::String(kind)) if kind == PATIENT_RESOURCE_TYPE => {
                decode::<PatientResource>(value).map(|patient| Self::Patient(Box::new(patient)))
            }
            Some(Value::String(_)) => decode::<GenericResource>(value).map(Self::Generic),
            Some(_) => Err(SchemaValidationError::new(
                "resourceType",
                "invalid type: expected a string",
            )),
            None if value.is_object() => Err(SchemaValidationError::new(
                "",
                "missing field `resourceType`",
            )),
            None => Err(SchemaValidationError::new(
                "",
                format!("invalid type: {}, expected a resource object", kind_of(&value)),
            )),
        }
    }

    /// The `resourceType` discriminator
    pub fn resource_type(&self) -> &str {
        match self {
            BundleResource::Patient(_) => PATIENT_RESOURCE_TYPE,
            BundleResource::Generic(resource) => &resource.resource_type,
        }
    }

    /// The resource id, if present
    pub fn id(&self) -> Option<&str> {
        match self {
            BundleResource::Patient(patient) => Some(&patient.id),
            BundleResource::Generic(resource) => resource.id.as_deref(),
        }
    }

    /// The Patient shape, if this is a Patient
    pub fn as_patient(&self) -> Option<&PatientResource> {
        match self {
            BundleResource::Patient(patient) => Some(patient),
            BundleResource::Generic(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for BundleResource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        BundleResource::from_value(value).map_err(D::Error::custom)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SchemaValidationError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = de::path_string(err.path());
        SchemaValidationError::new(path, err.into_inner().to_string())
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
