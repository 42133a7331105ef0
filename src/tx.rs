//! Publish transaction assembly
//!
//! Pure data construction: a publish command over the built bytecode plus a
//! transfer handing the resulting upgrade capability back to the sender. The
//! capability's id is unknown until execution, so the transfer references the
//! publish command's result slot.

use crate::build::BuildArtifact;
use crate::wallet::LedgerAddress;
use serde::{Deserialize, Serialize};

/// Reference to a value available inside the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    /// The result of the command at the given index.
    Result(u16),
}

/// A single transaction command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TxCommand {
    Publish {
        modules: Vec<String>,
        dependencies: Vec<String>,
    },
    TransferObject {
        object: Argument,
        recipient: LedgerAddress,
    },
}

/// A fully assembled publish transaction. Built once and consumed by
/// submission; a signed transaction is single-use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishTransaction {
    pub sender: LedgerAddress,
    pub commands: Vec<TxCommand>,
}

/// Assemble a publish transaction from a built artifact.
///
/// Consumes the artifact. The upgrade capability produced by the publish
/// command is transferred to `recipient` (the publishing account), so it
/// retains upgrade rights over the new package.
pub fn assemble(artifact: BuildArtifact, recipient: &LedgerAddress) -> PublishTransaction {
    let publish = TxCommand::Publish {
        modules: artifact.modules,
        dependencies: artifact.dependencies,
    };
    let transfer = TxCommand::TransferObject {
        object: Argument::Result(0),
        recipient: recipient.clone(),
    };

    PublishTransaction {
        sender: recipient.clone(),
        commands: vec![publish, transfer],
    }
}
