//! Toolchain invocation against stub build scripts
#![cfg(unix)]

use ledger_harness::{PackageBuilder, ToolchainBuilder};
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

fn stub_tool(dir: &TempDir, script: &str) -> String {
    let path = dir.path().join("fake-ledger-cli");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn parses_structured_output_from_real_process() {
    let dir = tempfile::tempdir().unwrap();
    let script = "#!/bin/sh\necho '{\"modules\":[\"oRzrCwYAAA==\"],\"dependencies\":[\"0x2\"]}'\n";
    let builder = ToolchainBuilder::new(stub_tool(&dir, script));

    let artifact = builder.run_build(dir.path()).await.unwrap();

    assert_eq!(artifact.modules, vec!["oRzrCwYAAA==".to_string()]);
    assert_eq!(artifact.dependencies, vec!["0x2".to_string()]);
}

#[tokio::test]
async fn nonzero_exit_surfaces_diagnostic_text() {
    let dir = tempfile::tempdir().unwrap();
    let script = "#!/bin/sh\necho 'error: unresolved name in module token' >&2\nexit 1\n";
    let builder = ToolchainBuilder::new(stub_tool(&dir, script));

    let err = builder.run_build(dir.path()).await.unwrap_err();

    assert!(err.to_string().contains("unresolved name in module token"));
}

#[tokio::test]
async fn tool_is_invoked_with_bytecode_flag_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let script = "#!/bin/sh\necho \"$@\" > \"$0.args\"\necho '{\"modules\":[],\"dependencies\":[]}'\n";
    let tool = stub_tool(&dir, script);
    let builder = ToolchainBuilder::new(tool.clone());

    builder.run_build(dir.path()).await.unwrap();

    let argv = std::fs::read_to_string(format!("{tool}.args")).unwrap();
    assert!(argv.contains("build --dump-bytecode-as-base64 --path"));
    assert!(argv.contains(&dir.path().to_string_lossy().into_owned()));
}

#[tokio::test]
async fn garbage_stdout_is_a_tool_failure() {
    let dir = tempfile::tempdir().unwrap();
    let script = "#!/bin/sh\necho 'Compiling token v0.1.0'\n";
    let builder = ToolchainBuilder::new(stub_tool(&dir, script));

    let err = builder.run_build(dir.path()).await.unwrap_err();

    assert!(err.to_string().contains("unparseable"));
}
