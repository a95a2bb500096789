// src/exec/process.rs

//! Run an external program to completion and capture what it printed.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn `program args...` in `cwd` and wait for it.
///
/// The program is executed directly, not through a shell, so arguments
/// containing spaces need no quoting. Errors only cover spawning and
/// waiting; a non-zero exit is reported through [`ProcessOutput`].
pub async fn run_captured(program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput> {
    info!(%program, ?args, ?cwd, "starting process");

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("spawning process '{program}'"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    for line in stdout.lines() {
        debug!(%program, "stdout: {}", line);
    }
    for line in stderr.lines() {
        debug!(%program, "stderr: {}", line);
    }

    let exit_code = output.status.code();
    info!(
        %program,
        exit_code = exit_code.unwrap_or(-1),
        success = output.status.success(),
        "process exited"
    );

    Ok(ProcessOutput {
        exit_code,
        success: output.status.success(),
        stdout,
        stderr,
    })
}
