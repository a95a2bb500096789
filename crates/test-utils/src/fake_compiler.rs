use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use elmpipe::pipeline::{Artifact, CompileOutcome, Compiler, Diagnostic};

/// Compiler returning scripted outcomes, recording each source it was given.
#[derive(Debug, Default)]
pub struct CannedCompiler {
    outcomes: Mutex<VecDeque<CompileOutcome>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl CannedCompiler {
    pub fn new(outcomes: impl IntoIterator<Item = CompileOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Arc::default(),
        }
    }

    pub fn succeeding(name: &str, js: &str) -> Self {
        Self::new([CompileOutcome::Success(Artifact::new(name, js))])
    }

    pub fn failing(message: &str) -> Self {
        Self::new([CompileOutcome::Failure(
            Diagnostic::new(message).with_exit_code(1),
        )])
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Compiler for CannedCompiler {
    fn compile<'a>(
        &'a self,
        source: &'a Path,
    ) -> Pin<Box<dyn Future<Output = CompileOutcome> + Send + 'a>> {
        self.calls.lock().unwrap().push(source.to_path_buf());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CompileOutcome::Failure(Diagnostic::new("no canned outcome left")));
        Box::pin(async move { outcome })
    }
}

/// A shell script that behaves like a tiny `elm` binary:
///
/// - `--version` prints `0.19.1`
/// - `make <src> --output=<out> [flags]` fails with an Elm-style
///   `-- SYNTAX PROBLEM --` report unless the first line of `<src>` starts
///   with `module `; otherwise it writes deterministic JavaScript to `<out>`.
///
/// Run it through `sh` (see `ConfigFileBuilder::fake_compiler`), so the file
/// never needs to be executable.
pub const FAKE_ELM: &str = r#"
if [ "$1" = "--version" ]; then
  echo "0.19.1"
  exit 0
fi
if [ "$1" != "make" ]; then
  echo "unknown command: $1" >&2
  exit 2
fi
src="$2"
out=""
for arg in "$@"; do
  case "$arg" in
    --output=*) out="${arg#--output=}" ;;
  esac
done
if [ ! -f "$src" ]; then
  echo "-- FILE NOT FOUND ----------------------------------------------------------" >&2
  echo "I cannot find $src" >&2
  exit 1
fi
first=$(head -n 1 "$src")
case "$first" in
  "module "*) ;;
  *)
    echo "-- SYNTAX PROBLEM -------------------------------------------------- $src" >&2
    echo "" >&2
    echo "I got stuck while parsing the module declaration." >&2
    exit 1
    ;;
esac
mkdir -p "$(dirname "$out")"
{
  echo "(function(scope){"
  echo "'use strict';"
  sed 's|^|// |' "$src"
  echo "}(this));"
} > "$out"
echo "Success! Compiled 1 module."
"#;

/// Write [`FAKE_ELM`] into `dir` and return its path.
pub fn write_fake_elm(dir: &Path) -> PathBuf {
    let path = dir.join("fake-elm.sh");
    std::fs::write(&path, FAKE_ELM).expect("writing fake elm script");
    path
}

pub const VALID_MAIN: &str = "module Main exposing (main)\n\nimport Html\n\nmain =\n    Html.text \"Hello\"\n";

pub const BROKEN_MAIN: &str = "modul Main exposing (main\n\nmain = \n";
