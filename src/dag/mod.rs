// src/dag/mod.rs

//! Task graph.
//!
//! - [`task`] defines the three tasks and their `after` relationships.
//! - [`graph`] holds the petgraph DAG built from those relationships and
//!   turns a requested task into an ordered plan.

pub mod graph;
pub mod task;

pub use graph::{RunPlan, TaskGraph};
pub use task::Task;
