// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace, warn};

use crate::engine::{RuntimeEvent, TriggerReason};
use crate::errors::Result;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and send `RuntimeEvent::CompileRequested` when
/// a path matching `profile` changes.
///
/// Tracked changes within `debounce` of the first one are folded into one trigger.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profile: WatchProfile,
    debounce: Duration,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // Runs on notify's thread; tracing may not be usable here.
                    eprintln!("elmpipe: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("elmpipe: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!(?root, ?profile, "file watcher started");

    tokio::spawn(forward_events(root, profile, debounce, event_rx, runtime_tx));

    Ok(WatcherHandle { _inner: watcher })
}

/// Turn raw notify events into debounced compile triggers.
///
/// Returns when the event source closes or the runtime stops listening.
pub async fn forward_events(
    root: PathBuf,
    profile: WatchProfile,
    debounce: Duration,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    let mut source_closed = false;

    while !source_closed {
        let Some(event) = event_rx.recv().await else {
            break;
        };
        let Some(first) = matching_path(&root, &profile, &event) else {
            continue;
        };

        // Swallow the rest of the burst (editors often write, chmod and
        // rename in quick succession). The window is fixed at the first
        // match; later events never extend it.
        let mut folded = 0usize;
        if !debounce.is_zero() {
            let deadline = sleep_until(Instant::now() + debounce);
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    more = event_rx.recv() => match more {
                        Some(more) => {
                            if matching_path(&root, &profile, &more).is_some() {
                                folded += 1;
                            }
                        }
                        None => {
                            source_closed = true;
                            break;
                        }
                    },
                }
            }
        }

        debug!(path = %first, folded, "watch match -> requesting compile");
        if let Err(err) = runtime_tx
            .send(RuntimeEvent::CompileRequested {
                reason: TriggerReason::FileWatch,
            })
            .await
        {
            warn!("failed to send RuntimeEvent::CompileRequested: {err}");
            return;
        }
    }

    debug!("watcher event loop ended");
}

/// Relative path of the first tracked file touched by `event`, if any.
fn matching_path(root: &Path, profile: &WatchProfile, event: &Event) -> Option<String> {
    if !is_content_change(&event.kind) {
        trace!(kind = ?event.kind, "ignoring non-content event");
        return None;
    }

    event.paths.iter().find_map(|path| match relative_str(root, path) {
        Some(rel) if profile.matches(&rel) => Some(rel),
        Some(_) => None,
        None => {
            warn!(?path, ?root, "could not relativize event path");
            None
        }
    })
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
