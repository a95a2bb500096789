use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use elmpipe::engine::RuntimeEvent;
use elmpipe::errors::{PipelineError, Result};
use elmpipe::exec::PipelineBackend;
use elmpipe::pipeline::CompileReport;

/// A fake backend that:
/// - records every dispatched compile id
/// - answers init with `init_result`
/// - answers each compile with the next scripted report (or a success)
///
/// In `holding` mode compiles are never answered; the test sends
/// `CompileFinished` itself to control timing.
pub struct FakeBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    dispatched: Arc<Mutex<Vec<u64>>>,
    reports: VecDeque<CompileReport>,
    init_result: std::result::Result<String, String>,
    holding: bool,
}

impl FakeBackend {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, dispatched: Arc<Mutex<Vec<u64>>>) -> Self {
        Self {
            runtime_tx,
            dispatched,
            reports: VecDeque::new(),
            init_result: Ok("0.19.1".to_string()),
            holding: false,
        }
    }

    pub fn holding(mut self) -> Self {
        self.holding = true;
        self
    }

    pub fn with_reports(mut self, reports: impl IntoIterator<Item = CompileReport>) -> Self {
        self.reports.extend(reports);
        self
    }

    pub fn failing_init(mut self, reason: &str) -> Self {
        self.init_result = Err(reason.to_string());
        self
    }
}

/// Report used when no scripted report is left.
pub fn written_report() -> CompileReport {
    CompileReport::Written {
        path: PathBuf::from("main.js"),
        bytes: 42,
    }
}

impl PipelineBackend for FakeBackend {
    fn run_init(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let result = self.init_result.clone();

        Box::pin(async move {
            tx.send(RuntimeEvent::InitFinished { result })
                .await
                .map_err(|e| PipelineError::Other(anyhow::Error::from(e)))?;
            Ok(())
        })
    }

    fn dispatch_compile(
        &mut self,
        run_id: u64,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let dispatched = Arc::clone(&self.dispatched);
        let holding = self.holding;
        let report = self.reports.pop_front().unwrap_or_else(written_report);

        Box::pin(async move {
            // Record after the completion is queued, so a test that sees the
            // id knows the result is already ahead of anything it sends next.
            if !holding {
                tx.send(RuntimeEvent::CompileFinished { run_id, report })
                    .await
                    .map_err(|e| PipelineError::Other(anyhow::Error::from(e)))?;
            }
            dispatched.lock().unwrap().push(run_id);
            Ok(())
        })
    }
}
