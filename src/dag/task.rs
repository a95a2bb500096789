// src/dag/task.rs

use std::fmt;

use clap::ValueEnum;

/// A named step the user can ask for on the command line.
///
/// Dependencies are part of the type: `Compile` always runs after `Init`,
/// and `Default` always runs after `Compile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Task {
    /// Probe (or prepare) the compiler toolchain once.
    Init,
    /// Compile the entry point once and write the artifact.
    Compile,
    /// Compile, then keep watching and recompile on change.
    Default,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Init, Task::Compile, Task::Default];

    /// Direct prerequisites of this task.
    pub fn after(self) -> &'static [Task] {
        match self {
            Task::Init => &[],
            Task::Compile => &[Task::Init],
            Task::Default => &[Task::Compile],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Task::Init => "init",
            Task::Compile => "compile",
            Task::Default => "default",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
