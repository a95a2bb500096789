// src/types.rs

use serde::Deserialize;

/// Behaviour when a file change arrives while a compile is already running.
///
/// - `Queue`: remember the trigger and compile again once the current run
///   finishes (default behaviour).
/// - `Drop`: ignore the trigger; the running compile is the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    #[default]
    Queue,
    Drop,
}

/// What the pipeline does after reporting a compilation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the diagnostic and mark the stage complete.
    #[default]
    Continue,
    /// Log the diagnostic and stop the run with a failing status.
    Halt,
}
