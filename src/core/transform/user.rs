//! Profile bundle transformer
//!
//! Turns one validated [`ProfileBundle`] into its ordered record set:
//! `User`, optional `StorageMetric`, `AuthSource`, then one `Patient` per
//! Patient entry in bundle order.

use super::patient::flatten_patient;
use super::DataTransformer;
use crate::anonymization::{EmailMasker, HashingEmailMasker};
use crate::core::timestamp::{parse_epoch, parse_str};
use crate::domain::Result;
use crate::refined::{AuthSource, RefinedRecord, StorageMetric, User};
use crate::schema::ProfileBundle;

/// Transformer for user profile bundles
#[derive(Debug, Clone, Default)]
pub struct UserTransformer<M = HashingEmailMasker> {
    masker: M,
}

impl UserTransformer<HashingEmailMasker> {
    /// Create a transformer with the default SHA-256 email masker
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: EmailMasker> UserTransformer<M> {
    /// Create a transformer with a custom email masker
    pub fn with_masker(masker: M) -> Self {
        Self { masker }
    }
}

impl<M: EmailMasker> DataTransformer for UserTransformer<M> {
    fn transform(&self, bundle: &ProfileBundle) -> Result<Vec<RefinedRecord>> {
        // One import instant for every record of this document
        let created_at = parse_epoch(bundle.timestamp)?;

        let mut records = Vec::with_capacity(3 + bundle.entry.len());

        records.push(RefinedRecord::from(User {
            user_id: bundle.user_id.clone(),
            email: self.masker.mask(&bundle.email),
            name: bundle.profile.name.clone(),
            locale: bundle.profile.locale.clone(),
            created_at,
        }));

        if let Some(storage) = &bundle.storage {
            records.push(RefinedRecord::from(StorageMetric {
                metric_id: None,
                user_id: bundle.user_id.clone(),
                percent_used: storage.percent_used,
                recorded_at: created_at,
            }));
        }

        let collection_date = parse_str(&bundle.metadata.collection_date)?;
        records.push(RefinedRecord::from(AuthSource {
            auth_id: None,
            user_id: bundle.user_id.clone(),
            source: bundle.metadata.source.clone(),
            collection_date,
            data_type: bundle.metadata.data_type.clone(),
        }));

        let mut patients = 0usize;
        for patient in bundle.patients() {
            records.push(RefinedRecord::from(flatten_patient(patient, created_at)));
            patients += 1;
        }

        tracing::debug!(
            user_id = %bundle.user_id,
            entries = bundle.entry.len(),
            patients,
            records = records.len(),
            "Transformed profile bundle"
        );

        Ok(records)
    }
}
