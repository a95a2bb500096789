// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, info, warn};

use crate::engine::core::CoreRuntime;
use crate::engine::{PipelineState, TriggerReason};
use crate::pipeline::{CompileReport, StageDecision};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Run the init command.
    RunInit,
    /// Run the compile pipeline once, tagged with `run_id`.
    DispatchCompile { run_id: u64 },
    /// The plan is finished; the shell should return normally.
    RequestExit,
    /// Something fatal happened; the shell should return an error.
    Abort { reason: String },
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn proceed(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn stop(command: CoreCommand) -> Self {
        Self {
            commands: vec![command],
            keep_running: false,
        }
    }
}

impl CoreRuntime {
    pub(super) fn handle_start(&mut self) -> CoreStep {
        if self.plan.init {
            info!("initializing toolchain");
            self.state = PipelineState::Initializing;
            return CoreStep::proceed(vec![CoreCommand::RunInit]);
        }
        if self.plan.compile {
            return CoreStep::proceed(vec![self.begin_compile(TriggerReason::Manual)]);
        }
        self.finish()
    }

    pub(super) fn handle_init_finished(
        &mut self,
        result: std::result::Result<String, String>,
    ) -> CoreStep {
        if self.state != PipelineState::Initializing {
            warn!(state = ?self.state, "init result arrived outside of initialization; ignoring");
            return CoreStep::proceed(Vec::new());
        }

        match result {
            Ok(version) => {
                info!(%version, "initialization complete");
                if self.plan.compile {
                    CoreStep::proceed(vec![self.begin_compile(TriggerReason::Manual)])
                } else {
                    self.finish()
                }
            }
            Err(reason) => {
                self.state = PipelineState::Idle;
                CoreStep::stop(CoreCommand::Abort { reason })
            }
        }
    }

    /// Triggers are ignored while initializing (the first compile follows
    /// anyway) and handed to the queue while a compile is running.
    pub(super) fn handle_compile_requested(&mut self, reason: TriggerReason) -> CoreStep {
        match self.state {
            PipelineState::Initializing => {
                debug!(?reason, "compile requested during init; initial compile will cover it");
                CoreStep::proceed(Vec::new())
            }
            PipelineState::Compiling => {
                let accepted = self.queue.record_trigger(reason);
                debug!(?reason, accepted, "compile requested while compiling");
                CoreStep::proceed(Vec::new())
            }
            PipelineState::Idle | PipelineState::Watching => {
                CoreStep::proceed(vec![self.begin_compile(reason)])
            }
        }
    }

    pub(super) fn handle_compile_finished(
        &mut self,
        run_id: u64,
        report: CompileReport,
    ) -> CoreStep {
        if self.in_flight != Some(run_id) {
            warn!(run_id, in_flight = ?self.in_flight, "ignoring result of unknown compile");
            return CoreStep::proceed(Vec::new());
        }
        self.in_flight = None;
        self.summary.record(&report);

        match &report {
            CompileReport::Written { path, bytes } => {
                info!(run_id, ?path, bytes, "compile succeeded");
            }
            CompileReport::Failed { decision, .. } => {
                warn!(run_id, ?decision, "compile failed");
                // Watching never halts: the next change gets another chance.
                if *decision == StageDecision::Halt && !self.plan.watch {
                    self.summary.halted = true;
                    self.state = PipelineState::Idle;
                    return CoreStep::stop(CoreCommand::RequestExit);
                }
            }
        }

        if let Some(batch) = self.queue.take_next() {
            debug!(folded = batch.len(), "starting queued follow-up compile");
            return CoreStep::proceed(vec![self.begin_compile(TriggerReason::FileWatch)]);
        }

        if self.plan.watch {
            info!("watching for changes");
            self.state = PipelineState::Watching;
            return CoreStep::proceed(Vec::new());
        }

        self.finish()
    }

    pub(super) fn handle_shutdown(&mut self) -> CoreStep {
        info!(state = ?self.state, "shutdown requested");
        self.state = PipelineState::Idle;
        CoreStep::stop(CoreCommand::RequestExit)
    }

    fn begin_compile(&mut self, reason: TriggerReason) -> CoreCommand {
        self.run_counter += 1;
        let run_id = self.run_counter;
        self.in_flight = Some(run_id);
        self.state = PipelineState::Compiling;
        info!(run_id, ?reason, "starting compile");
        CoreCommand::DispatchCompile { run_id }
    }

    fn finish(&mut self) -> CoreStep {
        debug!("run plan complete");
        self.state = PipelineState::Idle;
        CoreStep::stop(CoreCommand::RequestExit)
    }
}
