// tests/watch_files.rs
//
// Exercises the real notify watcher against a scratch directory.

use std::fs;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use elmpipe::engine::{RuntimeEvent, TriggerReason};
use elmpipe::watch::{WatchProfile, spawn_watcher};
use elmpipe_test_utils::init_tracing;

#[tokio::test]
async fn tracked_changes_request_a_compile_and_others_do_not() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("Main.elm"), "module Main exposing (main)\n").unwrap();
    fs::write(root.join("notes.txt"), "todo\n").unwrap();

    let (tx, mut rx) = mpsc::channel(16);
    let profile = WatchProfile::new(&["*.elm".to_string()], &[]).unwrap();
    let _handle = spawn_watcher(root.clone(), profile, Duration::from_millis(50), tx).unwrap();
    sleep(Duration::from_millis(200)).await;

    fs::write(root.join("notes.txt"), "still todo\n").unwrap();
    fs::write(root.join("main.js"), "// output\n").unwrap();
    assert!(
        timeout(Duration::from_millis(500), rx.recv()).await.is_err(),
        "untracked files must not trigger a compile"
    );

    fs::write(root.join("Main.elm"), "module Main exposing (main)\n\nx = 1\n").unwrap();
    let event = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no compile request after editing Main.elm")
        .expect("watcher channel closed");

    assert!(matches!(
        event,
        RuntimeEvent::CompileRequested {
            reason: TriggerReason::FileWatch
        }
    ));
}
