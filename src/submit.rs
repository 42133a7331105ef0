//! Transaction submission and finality confirmation
//!
//! Signs and executes a publish transaction, then blocks until the network
//! reports finality with effects and object changes included. None of the
//! failures here are retried: resubmitting an executed transaction risks
//! double-submission semantics that belong to the network, not this harness.

use crate::client::{ClientError, LedgerClient};
use crate::tx::PublishTransaction;
use crate::types::{ExecutionStatus, ResponseOptions, TransactionEffectsResult};
use crate::wallet::TestAccount;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The network reported the transaction invalid before execution.
    #[error("transaction rejected before execution: {0}")]
    Rejected(String),
    /// The transaction executed but its effects report a failure status.
    #[error("transaction {digest} executed with failure status: {error}")]
    ExecutionFailed { digest: String, error: String },
    /// Transport-level failure while awaiting finality.
    #[error("rpc failure while awaiting finality: {0}")]
    Rpc(ClientError),
}

/// Sign, submit and confirm a publish transaction.
///
/// Consumes the transaction: a signed transaction is single-use. On success
/// the returned effects are guaranteed to carry a success status.
pub async fn submit<C: LedgerClient + ?Sized>(
    client: &C,
    transaction: PublishTransaction,
    signer: &TestAccount,
) -> Result<TransactionEffectsResult, SubmissionError> {
    let digest = client
        .sign_and_execute_transaction(transaction, signer)
        .await
        .map_err(|err| match err {
            ClientError::Rpc { message, .. } => SubmissionError::Rejected(message),
            other => SubmissionError::Rpc(other),
        })?;

    debug!(digest = %digest, "Transaction accepted, awaiting finality");

    let effects = client
        .wait_for_transaction(&digest, ResponseOptions::full())
        .await
        .map_err(SubmissionError::Rpc)?;

    match &effects.status {
        ExecutionStatus::Success => Ok(effects),
        ExecutionStatus::Failure { error } => Err(SubmissionError::ExecutionFailed {
            digest: effects.digest.to_string(),
            error: error.clone(),
        }),
    }
}
