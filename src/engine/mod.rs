// src/engine/mod.rs

//! Orchestration engine for elmpipe.
//!
//! This module ties together:
//! - the run plan resolved from the task graph
//! - the trigger queue (what happens when changes arrive mid-compile)
//! - the main runtime event loop that reacts to:
//!   - init completion
//!   - file-watch triggers
//!   - compile completion
//!   - shutdown signals
//!
//! The pure state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::pipeline::CompileReport;

/// Why a compile was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// The initial compile of a run plan.
    Manual,
    /// A watched file changed.
    FileWatch,
}

/// Lifecycle of the pipeline as seen by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Initializing,
    Compiling,
    /// Waiting for the next file change; only reached by the default task.
    Watching,
}

/// Events flowing into the runtime from the backend, the watcher and signals.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The init command finished; `Ok` carries its first output line.
    InitFinished {
        result: std::result::Result<String, String>,
    },
    /// Something asked for a (re)compile.
    CompileRequested { reason: TriggerReason },
    /// A dispatched compile has gone through the whole pipeline.
    CompileFinished { run_id: u64, report: CompileReport },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Counters collected over the lifetime of a runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub compiles: u64,
    pub failures: u64,
    pub last_report: Option<CompileReport>,
    /// A failed one-shot compile asked to stop the run.
    pub halted: bool,
}

impl RunSummary {
    pub(crate) fn record(&mut self, report: &CompileReport) {
        self.compiles += 1;
        if !report.is_success() {
            self.failures += 1;
        }
        self.last_report = Some(report.clone());
    }
}

pub mod core;
pub mod event_handlers;
pub mod queue;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use queue::TriggerQueue;
pub use crate::types::TriggerWhileRunningBehaviour;
pub use runtime::Runtime;
