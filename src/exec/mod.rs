// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`process`] runs an external program and captures its output.
//! - [`backend`] provides the `PipelineBackend` trait and the production
//!   `RealPipelineBackend`, which tests can replace with a fake.

pub mod backend;
pub mod process;

pub use backend::{PipelineBackend, RealPipelineBackend};
pub use process::{ProcessOutput, run_captured};
