//! Input schema for profile bundles.
//!
//! A profile bundle is a user profile (identity, storage usage, provenance)
//! wrapped around a FHIR transaction bundle. This module defines the typed
//! shape of that document and the validator that produces it:
//!
//! - [`common`] - shared clinical value types (coding, names, addresses, extensions)
//! - [`resource`] - polymorphic bundle resources (Patient or generic fallback)
//! - [`bundle`] - the envelope
//! - [`validate`] - all-or-nothing validation with field paths
//!
//! # Example
//!
//! ```rust
//! use refiner::schema::validate_value;
//! use serde_json::json;
//!
//! let bundle = validate_value(json!({
//!     "userId": "u1",
//!     "email": "ada@example.com",
//!     "timestamp": 1_700_000_000,
//!     "profile": {"name": "Ada", "locale": "en-GB"},
//!     "metadata": {"source": "app", "collectionDate": "2023-01-01", "dataType": "fhir"},
//!     "resourceType": "Bundle",
//!     "type": "transaction",
//!     "entry": []
//! }))
//! .unwrap();
//!
//! assert_eq!(bundle.user_id, "u1");
//! ```

pub mod bundle;
pub mod common;
mod de;
pub mod resource;
pub mod validate;

pub use bundle::{
    BundleResourceType, BundleType, Entry, Envelope, Metadata, Profile, ProfileBundle, Request,
    Storage,
};
pub use common::{
    Address, CodeableConcept, Coding, Communication, Extension, ExtensionValue, FamilyName,
    HumanName, Identifier, Narrative, Telecom,
};
pub use resource::{BundleResource, GenericResource, PatientResource};
pub use validate::{validate_slice, validate_str, validate_value};
