//! PII masking for Refiner
//!
//! Email addresses are the only direct identifier copied from the envelope
//! into the relational model; they pass through an [`EmailMasker`] before any
//! record is created. Masking is deterministic so repeated imports of the same
//! user produce the same value, and non-invertible.
//!
//! # Usage
//!
//! ```rust
//! use refiner::anonymization::{EmailMasker, HashingEmailMasker};
//!
//! let masked = HashingEmailMasker::new().mask("ada@example.com");
//! assert!(masked.starts_with("***"));
//! assert!(masked.ends_with("@example.com"));
//! ```

pub mod email;

pub use email::{mask_email, HashingEmailMasker};

/// Email masking collaborator of the transformer
///
/// Implementations must be pure: the same input always yields the same
/// output, and masking never fails.
pub trait EmailMasker: Send + Sync {
    /// Mask an email address
    fn mask(&self, email: &str) -> String;
}
