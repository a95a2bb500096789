// src/pipeline/invoker.rs

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::exec::process::{ProcessOutput, run_captured};
use crate::fs::FileSystem;
use crate::pipeline::{Artifact, Diagnostic};

/// Tagged result of one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Success(Artifact),
    Failure(Diagnostic),
}

/// Something that turns a source file into a JavaScript artifact.
///
/// [`ElmCompiler`] shells out to the real toolchain; tests can plug in a
/// canned implementation.
pub trait Compiler: Send + Sync + fmt::Debug {
    fn compile<'a>(
        &'a self,
        source: &'a Path,
    ) -> Pin<Box<dyn Future<Output = CompileOutcome> + Send + 'a>>;
}

/// Invokes `elm make <source> --output=<staging>/<Stem>.js`.
#[derive(Debug, Clone)]
pub struct ElmCompiler {
    program: String,
    make_args: Vec<String>,
    flags: Vec<String>,
    /// Working directory for the compiler process.
    root: PathBuf,
    staging_dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl ElmCompiler {
    pub fn from_config(cfg: &ConfigFile, root: &Path, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            program: cfg.compiler.program.clone(),
            make_args: cfg.compiler.make_args.clone(),
            flags: cfg.compiler.flags.clone(),
            root: root.to_path_buf(),
            staging_dir: cfg.pipeline.staging_path(root),
            fs,
        }
    }

    /// Where the compiler is asked to write its output for `source`.
    ///
    /// The name mirrors the source stem, so `Main.elm` compiles to `Main.js`.
    pub fn staged_output_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        self.staging_dir.join(format!("{stem}.js"))
    }

    fn build_args(&self, source: &Path, staged: &Path) -> Vec<String> {
        let mut args = self.make_args.clone();
        args.push(source.to_string_lossy().into_owned());
        args.push(format!("--output={}", staged.to_string_lossy()));
        args.extend(self.flags.iter().cloned());
        args
    }

    async fn compile_inner(&self, source: &Path) -> CompileOutcome {
        if !self.fs.is_file(source) {
            return CompileOutcome::Failure(Diagnostic::new(format!(
                "source file {:?} does not exist",
                source
            )));
        }

        let staged = self.staged_output_path(source);
        let args = self.build_args(source, &staged);

        let output = match run_captured(&self.program, &args, &self.root).await {
            Ok(output) => output,
            Err(err) => {
                return CompileOutcome::Failure(Diagnostic::new(format!("{err:#}")));
            }
        };

        if !output.success {
            return CompileOutcome::Failure(diagnostic_from_output(&output));
        }

        match self.fs.read(&staged) {
            Ok(contents) => {
                let name = staged
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!(artifact = %name, bytes = contents.len(), "compiler produced artifact");
                CompileOutcome::Success(Artifact::new(name, contents))
            }
            Err(err) => CompileOutcome::Failure(Diagnostic::new(format!(
                "compiler reported success but its output could not be read: {err:#}"
            ))),
        }
    }
}

impl Compiler for ElmCompiler {
    fn compile<'a>(
        &'a self,
        source: &'a Path,
    ) -> Pin<Box<dyn Future<Output = CompileOutcome> + Send + 'a>> {
        debug!(?source, "invoking compiler");
        Box::pin(self.compile_inner(source))
    }
}

/// Elm writes its error report to stderr; some wrappers use stdout instead.
fn diagnostic_from_output(output: &ProcessOutput) -> Diagnostic {
    let text = if !output.stderr.trim().is_empty() {
        output.stderr.trim_end()
    } else if !output.stdout.trim().is_empty() {
        output.stdout.trim_end()
    } else {
        "compiler exited without printing a diagnostic"
    };

    let diagnostic = Diagnostic::new(text);
    match output.exit_code {
        Some(code) => diagnostic.with_exit_code(code),
        None => diagnostic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfigFile;
    use crate::fs::mock::MockFileSystem;

    fn compiler() -> ElmCompiler {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        ElmCompiler::from_config(&cfg, Path::new("/proj"), Arc::new(MockFileSystem::new()))
    }

    fn output(stdout: &str, stderr: &str, code: Option<i32>) -> ProcessOutput {
        ProcessOutput {
            exit_code: code,
            success: false,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn staged_name_follows_source_stem() {
        let c = compiler();
        assert_eq!(
            c.staged_output_path(Path::new("/proj/Main.elm")),
            PathBuf::from("/proj/elm-stuff/elmpipe/Main.js")
        );
    }

    #[test]
    fn arguments_put_flags_after_output() {
        let mut c = compiler();
        c.flags = vec!["--optimize".to_string()];
        let source = Path::new("/proj/Main.elm");
        let args = c.build_args(source, &c.staged_output_path(source));
        assert_eq!(
            args,
            vec![
                "make",
                "/proj/Main.elm",
                "--output=/proj/elm-stuff/elmpipe/Main.js",
                "--optimize",
            ]
        );
    }

    #[tokio::test]
    async fn missing_source_fails_without_running_the_compiler() {
        let outcome = compiler().compile(Path::new("/proj/Main.elm")).await;
        match outcome {
            CompileOutcome::Failure(d) => {
                assert!(d.message().contains("does not exist"));
                assert_eq!(d.exit_code(), None);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn diagnostic_prefers_stderr() {
        let d = diagnostic_from_output(&output("noise", "-- SYNTAX PROBLEM --\n", Some(1)));
        assert_eq!(d.message(), "-- SYNTAX PROBLEM --");
        assert_eq!(d.exit_code(), Some(1));

        let d = diagnostic_from_output(&output("-- NAMING ERROR --", "  ", None));
        assert_eq!(d.message(), "-- NAMING ERROR --");
        assert_eq!(d.exit_code(), None);

        let d = diagnostic_from_output(&output("", "", Some(2)));
        assert!(d.message().contains("without printing"));
    }
}
