//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const VALID_SPEC: &str = "openapi: 3.0.3\ninfo:\n  title: test\n  version: 1.0.0\npaths: {}\n";
/// The fake generator rejects any spec containing the word "invalid".
pub const INVALID_SPEC: &str = "openapi: 3.0.3\ninfo: invalid\n";

/// A throwaway source tree rooted at `<tmp>/shop-app` plus a fake generator.
pub struct Workspace {
    _temp: TempDir,
    pub root: PathBuf,
    pub generator: PathBuf,
    pub generator_log: PathBuf,
}

impl Workspace {
    pub fn create() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path().join("shop-app");
        fs::create_dir_all(root.join("modules")).expect("create modules dir");
        let generator_log = temp.path().join("generator.log");
        let generator = write_fake_generator(temp.path(), &generator_log);
        Self {
            _temp: temp,
            root,
            generator,
            generator_log,
        }
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(&path).expect("create dir");
        path
    }

    /// `specgen run` wired to the fake generator.
    pub fn run(&self, args: &[&str], project: &Path) -> Output {
        let generator = self.generator.to_str().expect("utf-8 path");
        let mut full = vec!["run", "--generator", generator];
        full.extend_from_slice(args);
        specgen(&full, project)
    }

    /// Lines the fake generator logged, one per invocation.
    pub fn generator_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.generator_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

pub fn specgen(args: &[&str], project: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_specgen"))
        .args(args)
        .arg("--project")
        .arg(project)
        .env_remove("SPECGEN_GENERATOR")
        .env("SPECGEN_LOG", "warn")
        .output()
        .expect("run specgen")
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "specgen failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("parse stdout as JSON")
}

/// Ids of the plan's tasks, in plan order.
pub fn task_ids(plan: &serde_json::Value) -> Vec<String> {
    plan["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["id"].as_str().expect("task id").to_string())
        .collect()
}

fn write_fake_generator(dir: &Path, log: &Path) -> PathBuf {
    let script = dir.join("fake-generator.sh");
    let body = format!(
        r#"#!/bin/sh
echo "$@" >> '{log}'
cmd="$1"
shift
spec=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -i) spec="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
if [ "$cmd" = "validate" ] && grep -q invalid "$spec"; then
  echo "spec is invalid: $spec" >&2
  exit 1
fi
if [ "$cmd" = "generate" ]; then
  mkdir -p "$out"
  touch "$out/.generated"
fi
exit 0
"#,
        log = log.display()
    );
    fs::write(&script, body).expect("write fake generator");
    make_executable(&script);
    script
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod script");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
