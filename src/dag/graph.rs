// src/dag/graph.rs

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::task::Task;
use crate::errors::{PipelineError, Result};

/// Directed acyclic graph of [`Task`]s.
///
/// Edge direction: dep -> task. `Compile` lists `Init` in `after`, so the
/// graph holds the edge `Init -> Compile`.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraphMap<Task, ()>,
    /// Every task in dependency order, computed once at construction.
    order: Vec<Task>,
}

impl TaskGraph {
    /// Build the graph from `Task::after` and check it for cycles.
    pub fn new() -> Result<Self> {
        let mut graph: DiGraphMap<Task, ()> = DiGraphMap::new();

        for task in Task::ALL {
            graph.add_node(task);
        }
        for task in Task::ALL {
            for dep in task.after() {
                graph.add_edge(*dep, task, ());
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            PipelineError::DagCycle(format!(
                "cycle detected in task graph involving task '{}'",
                cycle.node_id()
            ))
        })?;

        Ok(Self { graph, order })
    }

    /// Immediate prerequisites of `task`.
    pub fn dependencies_of(&self, task: Task) -> Vec<Task> {
        self.graph
            .neighbors_directed(task, Direction::Incoming)
            .collect()
    }

    /// Tasks that must run for `target`, ending with `target` itself.
    pub fn plan(&self, target: Task) -> Vec<Task> {
        let mut needed = vec![target];
        let mut stack = vec![target];
        while let Some(task) = stack.pop() {
            for dep in self.dependencies_of(task) {
                if !needed.contains(&dep) {
                    needed.push(dep);
                    stack.push(dep);
                }
            }
        }

        let plan: Vec<Task> = self
            .order
            .iter()
            .copied()
            .filter(|t| needed.contains(t))
            .collect();
        debug!(%target, ?plan, "resolved task plan");
        plan
    }
}

/// What a resolved plan asks the runtime to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunPlan {
    pub init: bool,
    pub compile: bool,
    pub watch: bool,
}

impl RunPlan {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            init: tasks.contains(&Task::Init),
            compile: tasks.contains(&Task::Compile),
            watch: tasks.contains(&Task::Default),
        }
    }
}
