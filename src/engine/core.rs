// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! The core consumes [`RuntimeEvent`]s and produces:
//! - an updated [`PipelineState`]
//! - a list of commands describing what the IO shell should do next
//!
//! It owns no channels, spawns nothing and performs no IO, so it can be
//! driven directly from unit tests.

use crate::dag::RunPlan;
use crate::engine::event_handlers::CoreStep;
use crate::engine::queue::TriggerQueue;
use crate::engine::{PipelineState, RunSummary, RuntimeEvent};
use crate::types::TriggerWhileRunningBehaviour;

#[derive(Debug)]
pub struct CoreRuntime {
    pub(super) plan: RunPlan,
    pub(super) queue: TriggerQueue,
    pub(super) state: PipelineState,
    /// Monotonically increasing compile id.
    pub(super) run_counter: u64,
    /// Id of the compile currently in flight, if any.
    pub(super) in_flight: Option<u64>,
    pub(super) summary: RunSummary,
}

impl CoreRuntime {
    pub fn new(plan: RunPlan, behaviour: TriggerWhileRunningBehaviour, queue_length: usize) -> Self {
        Self {
            plan,
            queue: TriggerQueue::new(behaviour, queue_length),
            state: PipelineState::Idle,
            run_counter: 0,
            in_flight: None,
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn plan(&self) -> RunPlan {
        self.plan
    }

    /// Whether a compile is currently dispatched and not yet finished.
    pub fn compile_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn into_summary(self) -> RunSummary {
        self.summary
    }

    /// Kick off the plan: init first when requested, otherwise compile.
    pub fn start(&mut self) -> CoreStep {
        self.handle_start()
    }

    /// Handle a single runtime event.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::InitFinished { result } => self.handle_init_finished(result),
            RuntimeEvent::CompileRequested { reason } => self.handle_compile_requested(reason),
            RuntimeEvent::CompileFinished { run_id, report } => {
                self.handle_compile_finished(run_id, report)
            }
            RuntimeEvent::ShutdownRequested => self.handle_shutdown(),
        }
    }
}
