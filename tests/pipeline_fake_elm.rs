// tests/pipeline_fake_elm.rs
//
// Drives the real `ElmCompiler` against a shell script that imitates `elm`.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use elmpipe::config::ConfigFile;
use elmpipe::fs::RealFileSystem;
use elmpipe::pipeline::{CompileReport, ErrorReporter, Initializer, Pipeline, StageDecision};
use elmpipe::types::FailurePolicy;
use elmpipe_test_utils::buffer::SharedBuffer;
use elmpipe_test_utils::builders::ConfigFileBuilder;
use elmpipe_test_utils::fake_compiler::{BROKEN_MAIN, VALID_MAIN, write_fake_elm};
use elmpipe_test_utils::init_tracing;

fn project(main: &str) -> (TempDir, ConfigFile) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Main.elm"), main).unwrap();
    let script = write_fake_elm(dir.path());
    let cfg = ConfigFileBuilder::new().fake_compiler(&script).build();
    (dir, cfg)
}

fn pipeline(cfg: &ConfigFile, root: &Path, sink: &SharedBuffer) -> Pipeline {
    Pipeline::from_config(
        cfg,
        root,
        Arc::new(RealFileSystem),
        ErrorReporter::new(Box::new(sink.clone()), FailurePolicy::Continue),
    )
}

#[tokio::test]
async fn valid_source_produces_main_js_and_leaves_source_alone() {
    init_tracing();
    let (dir, cfg) = project(VALID_MAIN);
    let sink = SharedBuffer::new();

    let report = pipeline(&cfg, dir.path(), &sink).run_once().await;

    let out = dir.path().join("main.js");
    assert!(report.is_success(), "unexpected report: {report:?}");
    let js = fs::read_to_string(&out).unwrap();
    assert!(!js.is_empty());
    assert!(js.contains("'use strict';"));
    assert_eq!(
        fs::read_to_string(dir.path().join("Main.elm")).unwrap(),
        VALID_MAIN
    );
    assert!(sink.is_empty());
}

#[tokio::test]
async fn output_name_does_not_depend_on_the_staged_name() {
    init_tracing();
    let (dir, cfg) = project(VALID_MAIN);
    let sink = SharedBuffer::new();

    pipeline(&cfg, dir.path(), &sink).run_once().await;

    // The compiler wrote `Main.js` into staging; only the renamed copy
    // lands in the destination.
    assert!(dir.path().join("elm-stuff/elmpipe/Main.js").is_file());
    assert!(dir.path().join("main.js").is_file());
    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!names.contains(&"Main.js".to_string()), "{names:?}");
}

#[tokio::test]
async fn custom_output_name_and_dest_are_honoured() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Main.elm"), VALID_MAIN).unwrap();
    let script = write_fake_elm(dir.path());
    let cfg = ConfigFileBuilder::new()
        .fake_compiler(&script)
        .output("app.js")
        .dest("public/js")
        .build();
    let sink = SharedBuffer::new();

    let report = pipeline(&cfg, dir.path(), &sink).run_once().await;

    assert_eq!(
        report,
        CompileReport::Written {
            path: dir.path().join("public/js/app.js"),
            bytes: fs::metadata(dir.path().join("public/js/app.js")).unwrap().len() as usize,
        }
    );
}

#[tokio::test]
async fn unchanged_input_compiles_to_identical_bytes() {
    init_tracing();
    let (dir, cfg) = project(VALID_MAIN);
    let sink = SharedBuffer::new();
    let pipeline = pipeline(&cfg, dir.path(), &sink);

    pipeline.run_once().await;
    let first = fs::read(dir.path().join("main.js")).unwrap();
    pipeline.run_once().await;
    let second = fs::read(dir.path().join("main.js")).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn syntax_error_is_reported_without_output() {
    init_tracing();
    let (dir, cfg) = project(BROKEN_MAIN);
    let sink = SharedBuffer::new();

    let report = pipeline(&cfg, dir.path(), &sink).run_once().await;

    match report {
        CompileReport::Failed {
            diagnostic,
            decision,
        } => {
            assert_eq!(decision, StageDecision::Continue);
            assert_eq!(diagnostic.exit_code(), Some(1));
            assert!(diagnostic.message().contains("SYNTAX PROBLEM"));
        }
        other => panic!("Expected Failed report, got: {other:?}"),
    }
    assert!(sink.contents().contains("-- SYNTAX PROBLEM"));
    assert!(sink.contents().contains("I got stuck"));
    assert!(!dir.path().join("main.js").exists());
}

#[tokio::test]
async fn failure_keeps_the_previous_output() {
    init_tracing();
    let (dir, cfg) = project(VALID_MAIN);
    let sink = SharedBuffer::new();
    let pipeline = pipeline(&cfg, dir.path(), &sink);

    pipeline.run_once().await;
    let good = fs::read(dir.path().join("main.js")).unwrap();

    fs::write(dir.path().join("Main.elm"), BROKEN_MAIN).unwrap();
    assert!(!pipeline.run_once().await.is_success());

    assert_eq!(fs::read(dir.path().join("main.js")).unwrap(), good);
}

#[tokio::test]
async fn missing_compiler_is_a_compile_failure() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Main.elm"), VALID_MAIN).unwrap();
    let cfg = ConfigFileBuilder::new()
        .program("elmpipe-no-such-compiler")
        .build();
    let sink = SharedBuffer::new();

    let report = pipeline(&cfg, dir.path(), &sink).run_once().await;

    assert!(!report.is_success());
    assert!(!sink.is_empty());
}

#[tokio::test]
async fn init_probe_reports_the_version() {
    init_tracing();
    let (dir, cfg) = project(VALID_MAIN);

    let version = Initializer::from_config(&cfg, dir.path()).run().await.unwrap();

    assert_eq!(version, "0.19.1");
}
