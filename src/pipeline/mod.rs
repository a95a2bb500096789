// src/pipeline/mod.rs

//! The compile chain: invoke → (report) → rename → write.
//!
//! - [`invoker`] runs the external compiler and returns a [`CompileOutcome`].
//! - [`report`] prints failures and decides whether the run continues.
//! - [`rename`] gives the artifact its fixed output name.
//! - [`writer`] persists the artifact into the destination directory.
//! - [`init`] is the one-time toolchain step that precedes the first compile.
//!
//! [`Pipeline`] composes the stages. A failed compile is *not* an `Err`: it
//! comes back as [`CompileReport::Failed`] carrying the reporter's decision.

pub mod init;
pub mod invoker;
pub mod rename;
pub mod report;
pub mod writer;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::config::ConfigFile;
use crate::fs::FileSystem;

pub use init::Initializer;
pub use invoker::{CompileOutcome, Compiler, ElmCompiler};
pub use rename::rename_artifact;
pub use report::{ErrorReporter, StageDecision};
pub use writer::OutputWriter;

/// Compiled output held in memory between stages.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    contents: Vec<u8>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn into_contents(self) -> Vec<u8> {
        self.contents
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("name", &self.name)
            .field("bytes", &self.contents.len())
            .finish()
    }
}

/// Why a compile produced no artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    exit_code: Option<i32>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: None,
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of one trip through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileReport {
    Written { path: PathBuf, bytes: usize },
    Failed {
        diagnostic: Diagnostic,
        decision: StageDecision,
    },
}

impl CompileReport {
    pub fn is_success(&self) -> bool {
        matches!(self, CompileReport::Written { .. })
    }
}

/// The composed compile chain for one fixed source file.
#[derive(Debug)]
pub struct Pipeline {
    source: PathBuf,
    output_name: String,
    compiler: Arc<dyn Compiler>,
    reporter: ErrorReporter,
    writer: OutputWriter,
}

impl Pipeline {
    pub fn new(
        source: impl Into<PathBuf>,
        output_name: impl Into<String>,
        compiler: Arc<dyn Compiler>,
        reporter: ErrorReporter,
        writer: OutputWriter,
    ) -> Self {
        Self {
            source: source.into(),
            output_name: output_name.into(),
            compiler,
            reporter,
            writer,
        }
    }

    /// Production wiring: Elm compiler, stdout reporter, real filesystem.
    pub fn from_config(
        cfg: &ConfigFile,
        root: &Path,
        fs: Arc<dyn FileSystem>,
        reporter: ErrorReporter,
    ) -> Self {
        let compiler = ElmCompiler::from_config(cfg, root, Arc::clone(&fs));
        Self::new(
            cfg.pipeline.source_path(root),
            cfg.pipeline.output.clone(),
            Arc::new(compiler),
            reporter,
            OutputWriter::new(cfg.pipeline.dest_dir(root), fs),
        )
    }

    /// Compile once, then rename and write on success.
    ///
    /// Failures of any stage are handed to the reporter; this never
    /// returns early with an error.
    pub async fn run_once(&self) -> CompileReport {
        info!(source = ?self.source, "compiling");

        let artifact = match self.compiler.compile(&self.source).await {
            CompileOutcome::Success(artifact) => artifact,
            CompileOutcome::Failure(diagnostic) => return self.fail(diagnostic),
        };

        let artifact = rename_artifact(artifact, &self.output_name);
        let bytes = artifact.contents().len();

        match self.writer.write(&artifact) {
            Ok(path) => CompileReport::Written { path, bytes },
            Err(err) => {
                error!(error = %format!("{err:#}"), "failed to write artifact");
                self.fail(Diagnostic::new(format!("{err:#}")))
            }
        }
    }

    fn fail(&self, diagnostic: Diagnostic) -> CompileReport {
        let decision = self.reporter.report(&diagnostic);
        CompileReport::Failed {
            diagnostic,
            decision,
        }
    }
}
