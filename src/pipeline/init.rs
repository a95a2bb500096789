// src/pipeline/init.rs

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::errors::{PipelineError, Result};
use crate::exec::process::run_captured;

/// One-time toolchain preparation that runs before the first compile.
#[derive(Debug, Clone)]
pub struct Initializer {
    program: String,
    args: Vec<String>,
    root: PathBuf,
}

impl Initializer {
    pub fn from_config(cfg: &ConfigFile, root: &Path) -> Self {
        Self {
            program: cfg.compiler.program.clone(),
            args: cfg.compiler.init_args.clone(),
            root: root.to_path_buf(),
        }
    }

    /// Run the init command and return the first line it printed
    /// (for `elm --version` that is the version number).
    pub async fn run(&self) -> Result<String> {
        if self.args.is_empty() {
            info!("init step has no arguments; skipping");
            return Ok(String::new());
        }

        let output = run_captured(&self.program, &self.args, &self.root)
            .await
            .map_err(|e| {
                PipelineError::InitFailed(format!(
                    "could not run '{}': {e:#} (is the Elm compiler installed?)",
                    self.program
                ))
            })?;

        if !output.success {
            let detail = if output.stderr.trim().is_empty() {
                output.stdout.trim()
            } else {
                output.stderr.trim()
            };
            warn!(program = %self.program, "init command failed");
            return Err(PipelineError::InitFailed(format!(
                "'{} {}' exited with {}: {}",
                self.program,
                self.args.join(" "),
                output
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "a signal".to_string()),
                detail
            )));
        }

        let first_line = output.stdout.lines().next().unwrap_or("").trim().to_string();
        info!(program = %self.program, output = %first_line, "toolchain ready");
        Ok(first_line)
    }
}
