// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::TriggerWhileRunningBehaviour;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// triggered_while_running_behaviour = "queue"
/// queue_length = 1
/// debounce_ms = 50
///
/// [compiler]
/// program = "elm"
/// flags = ["--optimize"]
///
/// [pipeline]
/// source = "Main.elm"
/// output = "main.js"
///
/// [watch]
/// patterns = ["*.elm"]
/// ```
///
/// Every section is optional; an empty file (or no file at all) yields the
/// classic `Main.elm` → `main.js` setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub compiler: CompilerSection,

    #[serde(default)]
    pub pipeline: PipelineSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// the checks in `validate.rs` having passed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub compiler: CompilerSection,
    pub pipeline: PipelineSection,
    pub watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            config: raw.config,
            compiler: raw.compiler,
            pipeline: raw.pipeline,
            watch: raw.watch,
        }
    }
}

/// `[config]` section: runtime behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// `"queue"` (default) or `"drop"`.
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Maximum number of follow-up compiles remembered while one is running.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,

    /// Quiet period used to fold a burst of file events into one trigger.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Same as `--fail-on-error`; only honoured by one-shot runs.
    #[serde(default)]
    pub fail_on_error: bool,
}

fn default_queue_length() -> usize {
    1
}

fn default_debounce_ms() -> u64 {
    50
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            triggered_while_running_behaviour: TriggerWhileRunningBehaviour::default(),
            queue_length: default_queue_length(),
            debounce_ms: default_debounce_ms(),
            fail_on_error: false,
        }
    }
}

/// `[compiler]` section: how the external compiler is invoked.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSection {
    /// Executable name or path.
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the source path (the `make` subcommand).
    #[serde(default = "default_make_args")]
    pub make_args: Vec<String>,

    /// Extra arguments appended after `--output=...`, e.g. `["--optimize"]`.
    #[serde(default)]
    pub flags: Vec<String>,

    /// Arguments for the one-time init step.
    ///
    /// The default is a presence check (`elm --version`). Older toolchains
    /// can use `["package", "install", "--yes"]`.
    #[serde(default = "default_init_args")]
    pub init_args: Vec<String>,
}

fn default_program() -> String {
    "elm".to_string()
}

fn default_make_args() -> Vec<String> {
    vec!["make".to_string()]
}

fn default_init_args() -> Vec<String> {
    vec!["--version".to_string()]
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            make_args: default_make_args(),
            flags: Vec::new(),
            init_args: default_init_args(),
        }
    }
}

/// `[pipeline]` section: input and output locations.
///
/// Relative paths are resolved against the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Fixed file name given to the compiled artifact.
    #[serde(default = "default_output")]
    pub output: String,

    /// Directory the artifact is written to.
    #[serde(default = "default_dest")]
    pub dest: PathBuf,

    /// Where the compiler is told to put its intermediate output.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
}

fn default_source() -> PathBuf {
    PathBuf::from("Main.elm")
}

fn default_output() -> String {
    "main.js".to_string()
}

fn default_dest() -> PathBuf {
    PathBuf::from(".")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("elm-stuff/elmpipe")
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            dest: default_dest(),
            staging_dir: default_staging_dir(),
        }
    }
}

impl PipelineSection {
    /// Absolute-or-root-relative path of the source file.
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join(&self.source)
    }

    pub fn dest_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.dest)
    }

    pub fn staging_path(&self, root: &Path) -> PathBuf {
        root.join(&self.staging_dir)
    }

    /// Final location of the renamed artifact.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        self.dest_dir(root).join(&self.output)
    }
}

/// `[watch]` section: which paths re-trigger the compile task.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    #[serde(default = "default_watch_patterns")]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_watch_patterns() -> Vec<String> {
    vec!["*.elm".to_string()]
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            patterns: default_watch_patterns(),
            exclude: Vec::new(),
        }
    }
}
