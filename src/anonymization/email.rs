//! Email masking
//!
//! The local part of an address is replaced by a decimal digest of the whole
//! lowercased address, so the same mailbox always masks to the same value
//! while the original cannot be recovered. The domain is kept, lowercased, for
//! analytics.

use super::EmailMasker;
use sha2::{Digest, Sha256};

const MASK_PREFIX: &str = "***";

/// SHA-256 based email masker
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingEmailMasker;

impl HashingEmailMasker {
    pub fn new() -> Self {
        Self
    }

    /// 20 decimal digits derived from the SHA-256 of the lowercased address
    fn digest(email: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(email.to_lowercase().as_bytes());
        let hash = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash[..8]);
        format!("{:020}", u64::from_be_bytes(prefix))
    }
}

impl EmailMasker for HashingEmailMasker {
    fn mask(&self, email: &str) -> String {
        let email = email.trim();
        let digest = Self::digest(email);

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                format!("{MASK_PREFIX}{digest}@{}", domain.to_lowercase())
            }
            _ => format!("{MASK_PREFIX}{digest}"),
        }
    }
}

/// Mask an email address with the default masker
pub fn mask_email(email: &str) -> String {
    HashingEmailMasker.mask(email)
}
