//! Account provisioning and package publish workflow
//!
//! The orchestration layer downstream integration tests call into: provision
//! a funded account, build the package source, publish it on-chain and hand
//! back the normalized package id together with the finalized transaction.
//! Stages run strictly sequentially and every stage error is surfaced to the
//! caller; there is no fallback path.

use crate::build::{BuildError, PackageBuilder};
use crate::client::{ClientError, LedgerClient};
use crate::extract::{extract, ExtractionError, PublishedPackageId};
use crate::faucet::{FaucetClient, FundingError};
use crate::submit::{submit, SubmissionError};
use crate::tx::assemble;
use crate::types::TransactionEffectsResult;
use crate::wallet::{LedgerAddress, TestAccount};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Any stage failure, unrecovered. A test harness treats these as failed
/// test setup.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("faucet funding failed: {0}")]
    Funding(#[from] FundingError),
    #[error("package build failed: {0}")]
    Build(#[from] BuildError),
    #[error("transaction submission failed: {0}")]
    Submission(#[from] SubmissionError),
    #[error("package id extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("ledger query failed: {0}")]
    Client(#[from] ClientError),
}

/// A funded test account paired with a ledger client.
pub struct TestToolbox<C: LedgerClient> {
    pub account: TestAccount,
    pub client: C,
}

impl<C: LedgerClient> TestToolbox<C> {
    pub fn new(account: TestAccount, client: C) -> Self {
        Self { account, client }
    }

    pub fn address(&self) -> &LedgerAddress {
        self.account.address()
    }

    /// Informational query against network state; not part of the publish path.
    pub async fn active_validators(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.client.latest_network_state().await?.active_validators)
    }
}

/// Output observable to downstream tests.
#[derive(Debug)]
pub struct PublishOutcome {
    pub package_id: PublishedPackageId,
    pub publish_txn: TransactionEffectsResult,
}

/// Provision a fresh account and fund it through the faucet.
pub async fn setup_toolbox<C: LedgerClient>(
    client: C,
    faucet: &FaucetClient,
) -> Result<TestToolbox<C>, HarnessError> {
    let account = TestAccount::generate();
    info!(address = %account.address(), "Provisioned test account");

    faucet.fund(account.address()).await?;
    Ok(TestToolbox::new(account, client))
}

/// Build the package at `package_path`, publish it from the toolbox account
/// and resolve the published package id.
pub async fn publish_package<C, B>(
    toolbox: &TestToolbox<C>,
    builder: &B,
    package_path: &Path,
) -> Result<PublishOutcome, HarnessError>
where
    C: LedgerClient,
    B: PackageBuilder + ?Sized,
{
    let artifact = builder.run_build(package_path).await?;
    info!(
        modules = artifact.modules.len(),
        dependencies = artifact.dependencies.len(),
        "Built package bytecode"
    );

    let transaction = assemble(artifact, toolbox.address());
    let publish_txn = submit(&toolbox.client, transaction, &toolbox.account).await?;
    let package_id = extract(&publish_txn)?;

    info!(
        package_id = %package_id,
        address = %toolbox.address(),
        "Published package"
    );

    Ok(PublishOutcome {
        package_id,
        publish_txn,
    })
}
