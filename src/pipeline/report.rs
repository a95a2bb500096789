// src/pipeline/report.rs

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

use tracing::{error, warn};

use crate::pipeline::Diagnostic;
use crate::types::FailurePolicy;

/// What the caller should do after a failure has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage is complete; keep running.
    Continue,
    /// Stop the run and surface a failing status.
    Halt,
}

/// Writes compiler diagnostics to a console-like sink.
pub struct ErrorReporter {
    sink: Mutex<Box<dyn Write + Send>>,
    policy: FailurePolicy,
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ErrorReporter {
    pub fn new(sink: Box<dyn Write + Send>, policy: FailurePolicy) -> Self {
        Self {
            sink: Mutex::new(sink),
            policy,
        }
    }

    /// Reporter printing to stdout.
    pub fn stdout(policy: FailurePolicy) -> Self {
        Self::new(Box::new(std::io::stdout()), policy)
    }

    /// Print the diagnostic and decide how the pipeline proceeds.
    pub fn report(&self, diagnostic: &Diagnostic) -> StageDecision {
        warn!(exit_code = ?diagnostic.exit_code(), "compilation failed");

        match self.sink.lock() {
            Ok(mut sink) => {
                if let Err(err) = writeln!(sink, "{diagnostic}").and_then(|_| sink.flush()) {
                    error!(error = %err, "failed to write diagnostic to sink");
                }
            }
            Err(_) => error!("diagnostic sink lock poisoned; dropping diagnostic"),
        }

        match self.policy {
            FailurePolicy::Continue => StageDecision::Continue,
            FailurePolicy::Halt => StageDecision::Halt,
        }
    }
}
