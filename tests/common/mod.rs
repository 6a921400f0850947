//! Shared harness for end-to-end tests of the `k` binary.
//!
//! Each test gets a scratch tree with a fake `kubectl` on `PATH`. The fake
//! records every invocation in a log file, answers `config ...` calls
//! silently and, when launched as the final tool, prints its arguments and
//! a few environment variables.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

const FAKE_KUBECTL: &str = r#"#!/bin/sh
tool="${0##*/}"
printf '%s %s\n' "$tool" "$*" >> "$K_TEST_LOG"
if [ "$1" = "config" ]; then
  if [ -n "$FAKE_FAIL" ] && [ "$2" = "$FAKE_FAIL" ]; then
    echo "fake $tool: refusing $2" >&2
    exit 1
  fi
  if [ "$2" = "view" ]; then
    echo "kind: Config"
  fi
  exit 0
fi
echo "args: $*"
echo "FOO=$FOO"
echo "KUBECONFIG=$KUBECONFIG"
exit "${FAKE_EXIT:-0}"
"#;

pub struct KWorkspace {
    pub temp: TempDir,
    pub root: PathBuf,
    pub bin: PathBuf,
    pub log: PathBuf,
}

impl KWorkspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("work");
        let bin = temp.path().join("bin");
        fs::create_dir_all(&root).expect("create work dir");
        fs::create_dir_all(&bin).expect("create bin dir");
        let log = temp.path().join("calls.log");
        let ws = Self {
            temp,
            root,
            bin,
            log,
        };
        ws.install_tool("kubectl");
        ws
    }

    /// Put another copy of the fake tool on `PATH` under `name`.
    pub fn install_tool(&self, name: &str) {
        self.install_tool_at(&self.bin.join(name));
    }

    /// Write the fake tool to `path`, outside of `PATH`.
    pub fn install_tool_at(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create tool dir");
        }
        fs::write(path, FAKE_KUBECTL).expect("write fake tool");
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod fake tool");
    }

    /// Directory `rel` under the work root, created if needed.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let dir = self.root.join(rel);
        fs::create_dir_all(&dir).expect("create dir");
        dir
    }

    /// Write a `.kubecontext` into `rel`.
    pub fn marker(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir(rel).join(".kubecontext");
        fs::write(&path, contents).expect("write marker");
        path
    }

    /// Invocations recorded by the fake tool, in order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|log| log.lines().map(|l| l.trim_end().to_string()).collect())
            .unwrap_or_default()
    }

    pub fn search_path(&self) -> String {
        format!("{}:/usr/bin:/bin", self.bin.display())
    }
}

pub struct KOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl KOutput {
    /// Value of `NAME=` as printed by the launched fake tool.
    pub fn printed(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.stdout
            .lines()
            .find_map(|l| l.strip_prefix(&prefix))
            .map(str::to_string)
    }
}

/// `k` prepared to run in `cwd` with a clean environment.
pub fn k_cmd(ws: &KWorkspace, cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("k").expect("k binary");
    cmd.current_dir(cwd)
        .env_clear()
        .env("PATH", ws.search_path())
        .env("HOME", ws.temp.path())
        .env("K_TEST_LOG", &ws.log);
    cmd
}

/// Run `k` in `cwd` with a clean environment plus `envs`.
pub fn run_k<I, S>(ws: &KWorkspace, cwd: &Path, args: I, envs: &[(&str, &str)]) -> KOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut cmd = k_cmd(ws, cwd);
    cmd.args(args);
    for (name, value) in envs {
        cmd.env(name, value);
    }
    let output = cmd.output().expect("run k");
    KOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
