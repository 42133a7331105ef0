//! External package build invocation
//!
//! Shells out to the configured build tool to compile a contract source
//! directory into base64-encoded bytecode modules plus a dependency list.
//! The seam is a trait so workflow tests can substitute a fake builder
//! without spawning a process.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Compiled package: ordered bytecode modules (base64) and the package ids
/// it depends on. Produced once per build, consumed by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArtifact {
    pub modules: Vec<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BuildError {
    /// The external tool exited non-zero or produced unusable output.
    /// Builds are deterministic for a fixed source tree, so this is never
    /// retried.
    #[error("build tool failure: {0}")]
    ToolFailure(String),
}

/// Capability to turn a source directory into a [`BuildArtifact`].
#[async_trait]
pub trait PackageBuilder: Send + Sync {
    async fn run_build(&self, path: &Path) -> Result<BuildArtifact, BuildError>;
}

/// Builder that invokes the external toolchain binary.
pub struct ToolchainBuilder {
    command: String,
}

impl ToolchainBuilder {
    /// `command` is the tool invocation prefix, split on whitespace (no
    /// shell interpretation), e.g. `"ledger-cli"` or `"cargo run --bin ledger-cli --"`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl PackageBuilder for ToolchainBuilder {
    async fn run_build(&self, path: &Path) -> Result<BuildArtifact, BuildError> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| BuildError::ToolFailure("empty build command".to_string()))?;

        debug!(command = %self.command, path = %path.display(), "Invoking build tool");

        let output = Command::new(program)
            .args(parts)
            .arg("build")
            .arg("--dump-bytecode-as-base64")
            .arg("--path")
            .arg(path)
            .output()
            .await
            .map_err(|e| BuildError::ToolFailure(format!("failed to spawn build tool: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::ToolFailure(format!(
                "build tool exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_build_output(&output.stdout)
    }
}

/// Parse the tool's structured stdout and validate module encoding.
pub(crate) fn parse_build_output(stdout: &[u8]) -> Result<BuildArtifact, BuildError> {
    let artifact: BuildArtifact = serde_json::from_slice(stdout).map_err(|e| {
        BuildError::ToolFailure(format!("unparseable build output: {e}"))
    })?;

    for (index, module) in artifact.modules.iter().enumerate() {
        BASE64.decode(module).map_err(|e| {
            BuildError::ToolFailure(format!("module {index} is not valid base64: {e}"))
        })?;
    }

    Ok(artifact)
}
