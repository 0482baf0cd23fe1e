//! Data transformation logic
//!
//! This module projects validated profile bundles onto the canonical
//! relational model. Transformation is deterministic and performs no I/O:
//!
//! - [`user`] - envelope to `User`, `StorageMetric`, `AuthSource`
//! - [`patient`] - FHIR Patient to a flat `patients` row

pub mod patient;
pub mod user;

pub use patient::flatten_patient;
pub use user::UserTransformer;

use crate::domain::Result;
use crate::refined::RefinedRecord;
use crate::schema::{validate_value, ProfileBundle};
use serde_json::Value;

/// Transformation from an input document to canonical records
///
/// # Examples
///
/// ```
/// use refiner::core::transform::{DataTransformer, UserTransformer};
/// use serde_json::json;
///
/// # fn example() -> refiner::domain::Result<()> {
/// let records = UserTransformer::new().transform_value(json!({
///     "userId": "u1",
///     "email": "ada@example.com",
///     "timestamp": 1_700_000_000,
///     "profile": {"name": "Ada", "locale": "en-GB"},
///     "metadata": {"source": "app", "collectionDate": "2023-01-01", "dataType": "fhir"},
///     "resourceType": "Bundle",
///     "type": "transaction",
///     "entry": [{"resource": {"resourceType": "Patient", "id": "p1"}}]
/// }))?;
///
/// assert_eq!(records.len(), 3);
/// # Ok(())
/// # }
/// ```
pub trait DataTransformer: Send + Sync {
    /// Transform a validated bundle into its ordered record set
    fn transform(&self, bundle: &ProfileBundle) -> Result<Vec<RefinedRecord>>;

    /// Validate a raw document, then transform it
    fn transform_value(&self, document: Value) -> Result<Vec<RefinedRecord>> {
        let bundle = validate_value(document)?;
        self.transform(&bundle)
    }
}
