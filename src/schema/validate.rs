//! Input document validation
//!
//! Validation is all-or-nothing: a document either becomes a
//! [`ProfileBundle`] or fails with one [`SchemaValidationError`] carrying the
//! path of the first offending field.

use super::bundle::{ProfileBundle, RawEnvelope};
use super::de::{join_path, path_string};
use super::resource::BundleResource;
use crate::domain::SchemaValidationError;
use serde_json::Value;

/// Validate an already decoded JSON document
pub fn validate_value(document: Value) -> Result<ProfileBundle, SchemaValidationError> {
    let envelope = serde_path_to_error::deserialize::<_, RawEnvelope>(document)
        .map_err(path_error)?;
    resolve_resources(envelope)
}

/// Validate a JSON document given as text
pub fn validate_str(json: &str) -> Result<ProfileBundle, SchemaValidationError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let envelope = decode_envelope(&mut deserializer)?;
    deserializer
        .end()
        .map_err(|err| SchemaValidationError::new("", err.to_string()))?;
    resolve_resources(envelope)
}

/// Validate a JSON document given as raw bytes
pub fn validate_slice(json: &[u8]) -> Result<ProfileBundle, SchemaValidationError> {
    let mut deserializer = serde_json::Deserializer::from_slice(json);
    let envelope = decode_envelope(&mut deserializer)?;
    deserializer
        .end()
        .map_err(|err| SchemaValidationError::new("", err.to_string()))?;
    resolve_resources(envelope)
}

fn decode_envelope<'de, R>(
    deserializer: &mut serde_json::Deserializer<R>,
) -> Result<RawEnvelope, SchemaValidationError>
where
    R: serde_json::de::Read<'de>,
{
    serde_path_to_error::deserialize(deserializer).map_err(path_error)
}

fn resolve_resources(envelope: RawEnvelope) -> Result<ProfileBundle, SchemaValidationError> {
    envelope.try_map_resources(|index, raw| {
        BundleResource::from_value(raw).map_err(|err| {
            let prefix = format!("entry[{index}].resource");
            SchemaValidationError::new(join_path(&prefix, &err.path), err.message)
        })
    })
}

fn path_error<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> SchemaValidationError {
    let path = path_string(err.path());
    SchemaValidationError::new(path, err.into_inner().to_string())
}
