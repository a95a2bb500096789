// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::dag::Task;

/// Command-line arguments for `elmpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "elmpipe",
    version,
    about = "Compile an Elm entry point to JavaScript and recompile on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run: `init`, `compile` (one-shot) or `default` (compile, then watch).
    #[arg(value_enum, default_value_t = Task::Default)]
    pub task: Task,

    /// Path to the config file (TOML).
    ///
    /// When omitted, `Elmpipe.toml` in the current directory is used if it
    /// exists; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ELMPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the task plan and effective config, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 1 when a one-shot compile fails.
    ///
    /// Ignored while watching: a failed compile never stops the watcher.
    #[arg(long)]
    pub fail_on_error: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_defaults_to_watch_entry_point() {
        let args = CliArgs::try_parse_from(["elmpipe"]).unwrap();
        assert_eq!(args.task, Task::Default);
        assert!(args.config.is_none());
        assert!(!args.fail_on_error);
    }

    #[test]
    fn one_shot_compile_with_flags() {
        let args = CliArgs::try_parse_from([
            "elmpipe",
            "compile",
            "--config",
            "web/Elmpipe.toml",
            "--fail-on-error",
        ])
        .unwrap();
        assert_eq!(args.task, Task::Compile);
        assert_eq!(args.config.as_deref(), Some("web/Elmpipe.toml"));
        assert!(args.fail_on_error);
    }

    #[test]
    fn unknown_task_is_rejected() {
        assert!(CliArgs::try_parse_from(["elmpipe", "bundle"]).is_err());
    }
}
