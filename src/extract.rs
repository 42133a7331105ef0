//! Published package id extraction and normalization
//!
//! A successful single-package publish produces exactly one `published`
//! object change. Its raw identifier is zero-padded to full width; the
//! canonical form strips the redundant zeros after the `0x` prefix.

use crate::types::{ObjectChange, TransactionEffectsResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static ZERO_PADDED_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0x)(0+)").unwrap());

/// Canonical identifier of a published package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublishedPackageId(String);

impl PublishedPackageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PublishedPackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No `published` change in the effects. The upstream success check
    /// should have made this impossible; treat as fatal to the calling test.
    #[error("no published-package change found in transaction effects")]
    NotFound,
}

/// Strip redundant zero-padding after the `0x` prefix.
///
/// An identifier that is all zeros collapses to `0x0` rather than a bare
/// prefix. Idempotent: normalizing a normalized id is a no-op.
pub fn normalize_package_id(raw: &str) -> String {
    let stripped = ZERO_PADDED_PREFIX.replace(raw, "$1");
    if stripped == "0x" {
        "0x0".to_string()
    } else {
        stripped.into_owned()
    }
}

/// Locate the published package's identifier in finalized effects.
pub fn extract(effects: &TransactionEffectsResult) -> Result<PublishedPackageId, ExtractionError> {
    let raw = effects
        .object_changes
        .iter()
        .find_map(|change| match change {
            ObjectChange::Published { package_id, .. } => Some(package_id.as_str()),
            _ => None,
        })
        .ok_or(ExtractionError::NotFound)?;

    Ok(PublishedPackageId(normalize_package_id(raw)))
}
