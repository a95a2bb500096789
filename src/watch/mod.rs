// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the `[watch]` glob patterns into a [`WatchProfile`].
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Folding bursts of events into a single compile trigger.
//!
//! It knows nothing about the pipeline; it only turns filesystem changes
//! into `RuntimeEvent::CompileRequested`.

pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use patterns::WatchProfile;
pub use watcher::{WatcherHandle, forward_events, spawn_watcher};
