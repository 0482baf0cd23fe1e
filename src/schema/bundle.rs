//! Profile bundle envelope
//!
//! A user profile wrapped around a FHIR transaction bundle. The envelope is
//! generic over its entry payload so the validator can first accept raw
//! resources and then resolve each one with a precise path.

use super::resource::BundleResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Literal `resourceType` of the envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleResourceType {
    #[default]
    Bundle,
}

/// Literal bundle `type`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    #[default]
    Transaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    #[serde(rename = "percentUsed")]
    pub percent_used: f64,
}

/// Provenance of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub source: String,

    /// Collection date as sent by the exporter, parsed during transformation
    #[serde(rename = "collectionDate")]
    pub collection_date: String,

    #[serde(rename = "dataType")]
    pub data_type: String,
}

/// Transaction request of an entry (not used by transformation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<R = BundleResource> {
    #[serde(default, rename = "fullUrl", skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    pub resource: R,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
}

/// Envelope shape, generic over the entry resource payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<R = BundleResource> {
    #[serde(rename = "userId")]
    pub user_id: String,

    pub email: String,

    /// Epoch seconds of the export; becomes the import instant of every record
    pub timestamp: i64,

    pub profile: Profile,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,

    pub metadata: Metadata,

    #[serde(rename = "resourceType")]
    pub resource_type: BundleResourceType,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    pub entry: Vec<Entry<R>>,
}

/// A fully validated document
pub type ProfileBundle = Envelope<BundleResource>;

/// An envelope whose resources have not been resolved yet
pub(crate) type RawEnvelope = Envelope<Value>;

impl<R> Envelope<R> {
    /// Replace every entry resource, stopping at the first failure
    ///
    /// The closure receives the entry index alongside the resource.
    pub(crate) fn try_map_resources<S, E>(
        self,
        mut f: impl FnMut(usize, R) -> Result<S, E>,
    ) -> Result<Envelope<S>, E> {
        let entry = self
            .entry
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                Ok(Entry {
                    full_url: entry.full_url,
                    resource: f(index, entry.resource)?,
                    request: entry.request,
                })
            })
            .collect::<Result<Vec<_>, E>>()?;

        Ok(Envelope {
            user_id: self.user_id,
            email: self.email,
            timestamp: self.timestamp,
            profile: self.profile,
            storage: self.storage,
            metadata: self.metadata,
            resource_type: self.resource_type,
            bundle_type: self.bundle_type,
            entry,
        })
    }
}

impl ProfileBundle {
    /// Iterate over the Patient resources of the bundle, in entry order
    pub fn patients(&self) -> impl Iterator<Item = &super::PatientResource> {
        self.entry
            .iter()
            .filter_map(|entry| entry.resource.as_patient())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundle_literals() {
        assert_eq!(
            serde_json::to_value(BundleResourceType::Bundle).unwrap(),
            json!("Bundle")
        );
        assert_eq!(
            serde_json::to_value(BundleType::Transaction).unwrap(),
            json!("transaction")
        );
        assert!(serde_json::from_value::<BundleType>(json!("batch")).is_err());
        assert!(serde_json::from_value::<BundleResourceType>(json!("bundle")).is_err());
    }

    #[test]
    fn test_try_map_resources_stops_at_first_error() {
        let envelope: RawEnvelope = serde_json::from_value(json!({
            "userId": "u1",
            "email": "a@b.com",
            "timestamp": 0,
            "profile": {"name": "A", "locale": "en"},
            "metadata": {"source": "s", "collectionDate": "2023-01-01", "dataType": "d"},
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [{"resource": 1}, {"resource": 2}, {"resource": 3}]
        }))
        .unwrap();

        let mut seen = Vec::new();
        let result = envelope.try_map_resources(|index, value| {
            seen.push(index);
            if value == json!(2) {
                Err(index)
            } else {
                Ok(value)
            }
        });

        assert_eq!(result.unwrap_err(), 1);
        assert_eq!(seen, vec![0, 1]);
    }
}
