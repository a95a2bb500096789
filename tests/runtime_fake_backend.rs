// tests/runtime_fake_backend.rs

use std::error::Error;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

use elmpipe::dag::{RunPlan, Task, TaskGraph};
use elmpipe::engine::{
    CoreRuntime, RunSummary, Runtime, RuntimeEvent, TriggerReason, TriggerWhileRunningBehaviour,
};
use elmpipe::errors::PipelineError;
use elmpipe::pipeline::{CompileReport, Diagnostic, StageDecision};
use elmpipe_test_utils::fake_backend::{FakeBackend, written_report};
use elmpipe_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn plan_for(task: Task) -> RunPlan {
    let graph = TaskGraph::new().expect("built-in task graph is acyclic");
    RunPlan::from_tasks(&graph.plan(task))
}

fn failed(decision: StageDecision) -> CompileReport {
    CompileReport::Failed {
        diagnostic: Diagnostic::new("-- SYNTAX PROBLEM --").with_exit_code(1),
        decision,
    }
}

async fn wait_for_dispatches(dispatched: &Arc<Mutex<Vec<u64>>>, count: usize) {
    with_timeout(async {
        while dispatched.lock().unwrap().len() < count {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
}

#[tokio::test]
async fn compile_task_runs_init_then_one_compile_and_exits() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched));

    let core = CoreRuntime::new(plan_for(Task::Compile), TriggerWhileRunningBehaviour::Queue, 1);
    let summary = with_timeout(Runtime::new(core, rx, backend).run()).await?;

    assert_eq!(*dispatched.lock().unwrap(), vec![1]);
    assert_eq!(summary.compiles, 1);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.last_report, Some(written_report()));
    assert!(!summary.halted);
    Ok(())
}

#[tokio::test]
async fn init_task_never_compiles() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched));

    let core = CoreRuntime::new(plan_for(Task::Init), TriggerWhileRunningBehaviour::Queue, 1);
    let summary = with_timeout(Runtime::new(core, rx, backend).run()).await?;

    assert!(dispatched.lock().unwrap().is_empty());
    assert_eq!(summary, RunSummary::default());
    Ok(())
}

#[tokio::test]
async fn swallowed_failure_still_exits_normally() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched))
        .with_reports([failed(StageDecision::Continue)]);

    let core = CoreRuntime::new(plan_for(Task::Compile), TriggerWhileRunningBehaviour::Queue, 1);
    let summary = with_timeout(Runtime::new(core, rx, backend).run()).await?;

    assert_eq!(summary.compiles, 1);
    assert_eq!(summary.failures, 1);
    assert!(!summary.halted);
    Ok(())
}

#[tokio::test]
async fn halt_decision_marks_one_shot_run_as_halted() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched))
        .with_reports([failed(StageDecision::Halt)]);

    let core = CoreRuntime::new(plan_for(Task::Compile), TriggerWhileRunningBehaviour::Queue, 1);
    let summary = with_timeout(Runtime::new(core, rx, backend).run()).await?;

    assert!(summary.halted);
    assert_eq!(summary.failures, 1);
    Ok(())
}

#[tokio::test]
async fn failed_init_aborts_with_init_error() {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched))
        .failing_init("could not run `elm --version`");

    let core = CoreRuntime::new(plan_for(Task::Default), TriggerWhileRunningBehaviour::Queue, 1);
    let result = with_timeout(Runtime::new(core, rx, backend).run()).await;

    match result {
        Err(PipelineError::InitFailed(msg)) => assert!(msg.contains("elm --version")),
        other => panic!("Expected InitFailed, got: {other:?}"),
    }
    assert!(dispatched.lock().unwrap().is_empty());
}

#[tokio::test]
async fn watch_mode_queues_one_follow_up_for_a_burst_of_triggers() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched)).holding();

    let core = CoreRuntime::new(plan_for(Task::Default), TriggerWhileRunningBehaviour::Queue, 1);
    let handle = tokio::spawn(Runtime::new(core, rx, backend).run());

    wait_for_dispatches(&dispatched, 1).await;

    for _ in 0..3 {
        tx.send(RuntimeEvent::CompileRequested {
            reason: TriggerReason::FileWatch,
        })
        .await?;
    }
    tx.send(RuntimeEvent::CompileFinished {
        run_id: 1,
        report: failed(StageDecision::Continue),
    })
    .await?;

    wait_for_dispatches(&dispatched, 2).await;
    tx.send(RuntimeEvent::CompileFinished {
        run_id: 2,
        report: written_report(),
    })
    .await?;

    // Idle in Watching: a fresh change starts another compile.
    tx.send(RuntimeEvent::CompileRequested {
        reason: TriggerReason::FileWatch,
    })
    .await?;
    wait_for_dispatches(&dispatched, 3).await;
    tx.send(RuntimeEvent::CompileFinished {
        run_id: 3,
        report: written_report(),
    })
    .await?;

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    let summary = with_timeout(handle).await??;

    assert_eq!(*dispatched.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(summary.compiles, 3);
    assert_eq!(summary.failures, 1);
    assert!(!summary.halted);
    Ok(())
}

#[tokio::test]
async fn drop_mode_ignores_triggers_while_compiling() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched)).holding();

    let core = CoreRuntime::new(plan_for(Task::Default), TriggerWhileRunningBehaviour::Drop, 1);
    let handle = tokio::spawn(Runtime::new(core, rx, backend).run());

    wait_for_dispatches(&dispatched, 1).await;
    tx.send(RuntimeEvent::CompileRequested {
        reason: TriggerReason::FileWatch,
    })
    .await?;
    tx.send(RuntimeEvent::CompileFinished {
        run_id: 1,
        report: written_report(),
    })
    .await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    let summary = with_timeout(handle).await??;
    assert_eq!(*dispatched.lock().unwrap(), vec![1]);
    assert_eq!(summary.compiles, 1);
    Ok(())
}

#[tokio::test]
async fn halt_decision_never_stops_watch_mode() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&dispatched))
        .with_reports([failed(StageDecision::Halt)]);

    let core = CoreRuntime::new(plan_for(Task::Default), TriggerWhileRunningBehaviour::Queue, 1);
    let handle = tokio::spawn(Runtime::new(core, rx, backend).run());

    wait_for_dispatches(&dispatched, 1).await;
    tx.send(RuntimeEvent::CompileRequested {
        reason: TriggerReason::FileWatch,
    })
    .await?;
    wait_for_dispatches(&dispatched, 2).await;
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    let summary = with_timeout(handle).await??;
    assert!(!summary.halted);
    assert_eq!(summary.compiles, 2);
    assert_eq!(summary.failures, 1);
    Ok(())
}
