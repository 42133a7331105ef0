//! Ledger test harness
//!
//! Provisions a funded test account on a local ledger network, builds a
//! contract package with the external toolchain, publishes it on-chain and
//! resolves the published package id for downstream integration tests.

pub mod build;
pub mod client;
pub mod config;
pub mod extract;
pub mod faucet;
pub mod publish;
pub mod retry;
pub mod submit;
pub mod tx;
pub mod types;
pub mod wallet;

// Re-export the types downstream tests touch most
pub use build::{BuildArtifact, BuildError, PackageBuilder, ToolchainBuilder};
pub use client::{ClientError, JsonRpcClient, LedgerClient};
pub use config::HarnessConfig;
pub use extract::{ExtractionError, PublishedPackageId};
pub use faucet::{FaucetClient, FundingError};
pub use publish::{publish_package, setup_toolbox, HarnessError, PublishOutcome, TestToolbox};
pub use submit::SubmissionError;
pub use types::{ExecutionStatus, ObjectChange, TransactionDigest, TransactionEffectsResult};
pub use wallet::{LedgerAddress, TestAccount};
