// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, DEFAULT_CONFIG_FILE, load_or_default};
use crate::dag::{RunPlan, Task, TaskGraph};
use crate::engine::{CoreRuntime, RunSummary, Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::exec::RealPipelineBackend;
use crate::fs::RealFileSystem;
use crate::pipeline::{ErrorReporter, Initializer, Pipeline};
use crate::types::FailurePolicy;
use crate::watch::WatchProfile;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - task plan resolution
/// - pipeline + backend + runtime
/// - (for the default task) the file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let explicit = args.config.is_some();
    let config_path = PathBuf::from(args.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE));
    let cfg = load_or_default(&config_path, explicit)?;
    let root = project_root(&config_path);

    let graph = TaskGraph::new()?;
    let tasks = graph.plan(args.task);
    let plan = RunPlan::from_tasks(&tasks);

    if args.dry_run {
        print_dry_run(&cfg, &root, args.task, &tasks);
        return Ok(RunSummary::default());
    }

    let policy = failure_policy(plan, args.fail_on_error || cfg.config.fail_on_error);

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let fs = Arc::new(RealFileSystem);
    let pipeline = Pipeline::from_config(&cfg, &root, fs, ErrorReporter::stdout(policy));
    let initializer = Initializer::from_config(&cfg, &root);
    let backend = RealPipelineBackend::new(pipeline, initializer, rt_tx.clone());

    // The watcher lives only as long as this handle.
    let _watcher_handle = if plan.watch {
        let profile = WatchProfile::from_config(&cfg.watch)?;
        Some(watch::spawn_watcher(
            root.clone(),
            profile,
            Duration::from_millis(cfg.config.debounce_ms),
            rt_tx.clone(),
        )?)
    } else {
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    info!(task = %args.task, ?tasks, "running task plan");

    let core = CoreRuntime::new(
        plan,
        cfg.config.triggered_while_running_behaviour,
        cfg.config.queue_length,
    );
    let runtime = Runtime::new(core, rt_rx, backend);
    let summary = runtime.run().await?;

    info!(
        compiles = summary.compiles,
        failures = summary.failures,
        halted = summary.halted,
        "done"
    );
    Ok(summary)
}

/// A failed compile may only stop a one-shot run.
pub fn failure_policy(plan: RunPlan, fail_on_error: bool) -> FailurePolicy {
    if fail_on_error && !plan.watch {
        FailurePolicy::Halt
    } else {
        FailurePolicy::Continue
    }
}

/// Project root: the directory holding the config file, or the working
/// directory for a bare file name like "Elmpipe.toml".
///
/// Always absolute, since the compiler runs with the root as its working
/// directory while receiving root-joined paths.
fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::path::absolute(parent).unwrap_or_else(|_| parent.to_path_buf())
        }
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn print_dry_run(cfg: &ConfigFile, root: &Path, target: Task, tasks: &[Task]) {
    println!("elmpipe dry-run");
    println!("  task = {target}");
    let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
    println!("  plan = {}", names.join(" -> "));
    println!();

    println!("  root = {}", root.display());
    println!(
        "  compile: {} {} {} --output=<staging>/{}.js {}",
        cfg.compiler.program,
        cfg.compiler.make_args.join(" "),
        cfg.pipeline.source.display(),
        cfg.pipeline
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        cfg.compiler.flags.join(" ")
    );
    println!("  init: {} {}", cfg.compiler.program, cfg.compiler.init_args.join(" "));
    println!("  output = {}", cfg.pipeline.output_path(root).display());
    println!("  staging_dir = {}", cfg.pipeline.staging_path(root).display());
    println!("  watch = {:?}", cfg.watch.patterns);
    if !cfg.watch.exclude.is_empty() {
        println!("  exclude = {:?}", cfg.watch.exclude);
    }
    println!(
        "  config.triggered_while_running_behaviour = {:?}",
        cfg.config.triggered_while_running_behaviour
    );
    println!("  config.queue_length = {}", cfg.config.queue_length);
    println!("  config.debounce_ms = {}", cfg.config.debounce_ms);

    debug!("dry-run complete (no execution)");
}
