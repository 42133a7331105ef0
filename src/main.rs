//! Ledger test harness entry point
//!
//! Runs the full provisioning and publish workflow against a local
//! development network: provision an account, fund it through the faucet,
//! build the package at the given path and publish it, printing the
//! resulting package id.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_harness::config::HarnessConfig;
use ledger_harness::{publish_package, setup_toolbox, FaucetClient, JsonRpcClient, ToolchainBuilder};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the contract package source directory
    package_path: PathBuf,

    /// Path to configuration file
    #[arg(short, long, default_value = "harness.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    info!("🚀 Starting ledger test harness");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;
    info!("🌐 RPC endpoint: {}", config.rpc_url);
    info!("🚰 Faucet endpoint: {}", config.faucet_url);

    let client = JsonRpcClient::new(config.rpc_url.clone());
    let faucet = FaucetClient::with_policy(config.faucet_url.clone(), config.faucet.policy());
    let builder = ToolchainBuilder::new(config.build_command.clone());

    info!("🔑 Provisioning and funding test account");
    let toolbox = setup_toolbox(client, &faucet)
        .await
        .context("Failed to set up funded test account")?;
    info!("💼 Account address: {}", toolbox.address());

    info!("📦 Publishing package from {}", args.package_path.display());
    let outcome = publish_package(&toolbox, &builder, &args.package_path)
        .await
        .context("Publish workflow failed")?;

    info!("✅ Published package {}", outcome.package_id);
    println!("{}", outcome.package_id);

    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "ledger_harness=debug,info"
    } else {
        "ledger_harness=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Load configuration from file with fallback to env/defaults
fn load_config(path: &str) -> Result<HarnessConfig> {
    if std::path::Path::new(path).exists() {
        HarnessConfig::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using environment and defaults", path);
        Ok(HarnessConfig::from_env())
    }
}
