// src/exec/backend.rs

//! Pluggable backend abstraction.
//!
//! The runtime talks to a `PipelineBackend` instead of spawning work itself.
//! `RealPipelineBackend` runs the init command and the compile pipeline on
//! Tokio tasks; tests swap in a fake that answers immediately.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::error;

use crate::engine::RuntimeEvent;
use crate::errors::{PipelineError, Result};
use crate::pipeline::{Initializer, Pipeline};

/// How init and compile work gets done.
///
/// Both methods only *start* the work. Completion is reported back to the
/// runtime as `RuntimeEvent::InitFinished` / `RuntimeEvent::CompileFinished`.
pub trait PipelineBackend: Send {
    fn run_init(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    fn dispatch_compile(
        &mut self,
        run_id: u64,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Backend used in production.
pub struct RealPipelineBackend {
    pipeline: Arc<Pipeline>,
    initializer: Initializer,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealPipelineBackend {
    pub fn new(
        pipeline: Pipeline,
        initializer: Initializer,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            initializer,
            runtime_tx,
        }
    }
}

impl PipelineBackend for RealPipelineBackend {
    fn run_init(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let initializer = self.initializer.clone();
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let result = initializer.run().await.map_err(|e| match e {
                    PipelineError::InitFailed(msg) => msg,
                    other => other.to_string(),
                });
                if let Err(err) = tx.send(RuntimeEvent::InitFinished { result }).await {
                    error!(error = %err, "failed to send InitFinished to runtime");
                }
            });
            Ok::<(), PipelineError>(())
        })
    }

    fn dispatch_compile(
        &mut self,
        run_id: u64,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let report = pipeline.run_once().await;
                if let Err(err) = tx
                    .send(RuntimeEvent::CompileFinished { run_id, report })
                    .await
                {
                    error!(run_id, error = %err, "failed to send CompileFinished to runtime");
                }
            });
            Ok::<(), PipelineError>(())
        })
    }
}
