//! Helpers for running the demo shell.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs the shell with `args`, feeding `input` on stdin.
///
/// Uses an empty temporary directory as the config location so the
/// defaults apply. Returns (exit code, stdout, stderr).
pub fn run_shell(args: &[&str], input: &str) -> (i32, String, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");

    let mut child = Command::new(env!("CARGO_BIN_EXE_cmdroute"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start cmdroute");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for cmdroute");
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
