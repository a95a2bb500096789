// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::{PipelineError, Result};
use crate::exec::PipelineBackend;

use super::core::CoreRuntime;
use super::{CoreCommand, CoreStep, RunSummary, RuntimeEvent};

/// Drives the core in response to `RuntimeEvent`s and delegates the actual
/// init/compile work to a [`PipelineBackend`].
///
/// All semantics live in [`CoreRuntime`]; this struct only reads events from
/// the channel and executes the commands the core hands back.
pub struct Runtime<B: PipelineBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
}

impl<B: PipelineBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: PipelineBackend> Runtime<B> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, backend: B) -> Self {
        Self {
            core,
            event_rx,
            backend,
        }
    }

    /// Main event loop.
    ///
    /// Starts the plan, then feeds every event into the core until it asks
    /// to stop. Returns the summary of all compiles, or an error when the
    /// core aborts (failed init) or the backend cannot be reached.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!(plan = ?self.core.plan(), "elmpipe runtime started");

        let step = self.core.start();
        let mut keep_running = self.apply(step).await?;

        while keep_running {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");
            let step = self.core.step(event);
            keep_running = self.apply(step).await?;
        }

        info!("runtime exiting");
        Ok(self.core.into_summary())
    }

    async fn apply(&mut self, step: CoreStep) -> Result<bool> {
        for command in step.commands {
            self.execute_command(command).await?;
        }
        Ok(step.keep_running)
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::RunInit => self.backend.run_init().await,
            CoreCommand::DispatchCompile { run_id } => {
                debug!(run_id, "dispatching compile");
                self.backend.dispatch_compile(run_id).await
            }
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
                Ok(())
            }
            CoreCommand::Abort { reason } => Err(PipelineError::InitFailed(reason)),
        }
    }
}
