//! Harness configuration
//!
//! Faucet endpoint, RPC endpoint and build-tool command, all defaulted to a
//! local development network. Loadable from a TOML file with environment
//! variable overrides.

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LOCALNET_FAUCET_URL: &str = "http://127.0.0.1:9123";
pub const LOCALNET_RPC_URL: &str = "http://127.0.0.1:9000";
pub const DEFAULT_BUILD_COMMAND: &str = "ledger-cli";

/// Top-level configuration surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Faucet endpoint URL
    #[serde(default = "default_faucet_url")]
    pub faucet_url: String,

    /// Fullnode RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Build-tool invocation command (whitespace-split, no shell)
    #[serde(default = "default_build_command")]
    pub build_command: String,

    /// Faucet retry behavior
    #[serde(default)]
    pub faucet: FaucetRetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetRetryConfig {
    /// Base backoff delay in milliseconds
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Overall funding budget in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_faucet_url() -> String {
    LOCALNET_FAUCET_URL.to_string()
}
fn default_rpc_url() -> String {
    LOCALNET_RPC_URL.to_string()
}
fn default_build_command() -> String {
    DEFAULT_BUILD_COMMAND.to_string()
}
fn default_base_backoff_ms() -> u64 {
    250
}
fn default_max_backoff_ms() -> u64 {
    8_000
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            faucet_url: default_faucet_url(),
            rpc_url: default_rpc_url(),
            build_command: default_build_command(),
            faucet: FaucetRetryConfig::default(),
        }
    }
}

impl Default for FaucetRetryConfig {
    fn default() -> Self {
        Self {
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FaucetRetryConfig {
    /// Convert to the retry combinator's policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_backoff_ms: self.base_backoff_ms,
            max_backoff_ms: self.max_backoff_ms,
            overall_timeout: Duration::from_secs(self.timeout_secs),
            ..RetryPolicy::default()
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HarnessConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults plus environment overrides (`FAUCET_URL`, `RPC_URL`,
    /// `BUILD_COMMAND`), reading a `.env` file first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load from a TOML file, then let the environment win.
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FAUCET_URL") {
            self.faucet_url = url;
        }
        if let Ok(url) = std::env::var("RPC_URL") {
            self.rpc_url = url;
        }
        if let Ok(command) = std::env::var("BUILD_COMMAND") {
            self.build_command = command;
        }
    }
}
