//! Shared transaction and effects types
//!
//! Wire-level shapes exchanged with the ledger: the opaque transaction
//! digest, execution status, the object-change records produced by finalized
//! transactions and the response options passed when awaiting finality.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionDigest(pub String);

impl std::fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final execution status reported by transaction effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

/// One state change recorded in finalized transaction effects, tagged with
/// its change kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ObjectChange {
    /// A new package was published on-chain.
    Published { package_id: String, version: u64 },
    Created { object_id: String, object_type: String },
    Mutated { object_id: String, object_type: String },
    Deleted { object_id: String },
    Transferred { object_id: String, recipient: String },
}

/// Finalized record of a transaction: digest, status and object changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffectsResult {
    pub digest: TransactionDigest,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub object_changes: Vec<ObjectChange>,
}

/// Which optional sections the ledger should include when reporting a
/// finalized transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOptions {
    pub show_object_changes: bool,
    pub show_effects: bool,
}

impl ResponseOptions {
    /// Request object changes and execution effects, as the publish workflow
    /// needs both.
    pub fn full() -> Self {
        Self {
            show_object_changes: true,
            show_effects: true,
        }
    }
}

/// Snapshot of network-wide state, used for informational queries only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
    pub epoch: u64,
    pub active_validators: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_change_kind_tags_round_trip() {
        let json = r#"{"type":"published","packageId":"0x42","version":1}"#;
        let change: ObjectChange = serde_json::from_str(json).unwrap();

        assert_eq!(
            change,
            ObjectChange::Published {
                package_id: "0x42".to_string(),
                version: 1,
            }
        );
        assert_eq!(serde_json::to_string(&change).unwrap(), json);
    }

    #[test]
    fn effects_deserialize_without_object_changes() {
        let json = r#"{"digest":"abc","status":{"status":"success"}}"#;
        let effects: TransactionEffectsResult = serde_json::from_str(json).unwrap();

        assert!(effects.status.is_success());
        assert!(effects.object_changes.is_empty());
    }

    #[test]
    fn failure_status_carries_error_text() {
        let json = r#"{"status":"failure","error":"abort in module init, code 7"}"#;
        let status: ExecutionStatus = serde_json::from_str(json).unwrap();

        assert!(!status.is_success());
        assert_eq!(
            status,
            ExecutionStatus::Failure {
                error: "abort in module init, code 7".to_string()
            }
        );
    }
}
