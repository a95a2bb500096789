// src/engine/queue.rs

use std::collections::VecDeque;

use tracing::debug;

use super::TriggerReason;
use crate::types::TriggerWhileRunningBehaviour;

/// Triggers that arrive while a compile is in flight.
///
/// Each entry is one follow-up compile; the reasons inside an entry are the
/// triggers that were folded into it.
///
/// - `Queue`: keep up to `max_runs` follow-up compiles. Once full, further
///   triggers are merged into the last entry.
/// - `Drop`: triggers are discarded; nothing runs afterwards.
#[derive(Debug)]
pub struct TriggerQueue {
    behaviour: TriggerWhileRunningBehaviour,
    max_runs: usize,
    runs: VecDeque<Vec<TriggerReason>>,
}

impl TriggerQueue {
    /// `max_runs` is clamped to at least 1.
    pub fn new(behaviour: TriggerWhileRunningBehaviour, max_runs: usize) -> Self {
        Self {
            behaviour,
            max_runs: max_runs.max(1),
            runs: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of follow-up compiles currently queued.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Record a trigger that arrived mid-compile. Returns false when it was dropped.
    pub fn record_trigger(&mut self, reason: TriggerReason) -> bool {
        match self.behaviour {
            TriggerWhileRunningBehaviour::Queue => {
                if self.runs.len() < self.max_runs {
                    self.runs.push_back(vec![reason]);
                    debug!(queued = self.runs.len(), "queued follow-up compile");
                } else if let Some(last) = self.runs.back_mut() {
                    last.push(reason);
                    debug!(
                        merged = last.len(),
                        "queue full; merged trigger into last follow-up compile"
                    );
                }
                true
            }
            TriggerWhileRunningBehaviour::Drop => {
                debug!(?reason, "compile in progress; dropping trigger (drop mode)");
                false
            }
        }
    }

    /// Take the next follow-up compile, if any.
    pub fn take_next(&mut self) -> Option<Vec<TriggerReason>> {
        self.runs.pop_front()
    }
}
