#![cfg(unix)]

mod common;
use common::{KWorkspace, k_cmd, run_k};
use predicates::prelude::*;
use std::path::Path;

#[test]
fn test_no_markers_launches_default_tool_with_args() {
    let ws = KWorkspace::new();
    let cwd = ws.dir("plain");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("args: get pods"));
    assert_eq!(ws.calls(), vec!["kubectl get pods"]);
}

#[test]
fn test_nested_markers_switch_context_then_namespace() {
    let ws = KWorkspace::new();
    ws.marker("a/b", "context: staging\nnamespace: default\n");
    ws.marker("a/b/c", "namespace: dev\n");
    let cwd = ws.dir("a/b/c");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert_eq!(
        ws.calls(),
        vec![
            "kubectl config use-context staging",
            "kubectl config set-context --current --namespace dev",
            "kubectl get pods",
        ]
    );
}

#[test]
fn test_arguments_forwarded_verbatim() {
    let ws = KWorkspace::new();
    let cwd = ws.dir("args");

    let out = run_k(&ws, &cwd, ["--", "--help", "-n", "kube-system"], &[]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("args: -- --help -n kube-system"));
}

#[test]
fn test_environment_reaches_launched_tool() {
    let ws = KWorkspace::new();
    ws.marker("proj", "environment:\n  FOO: outer\n");
    ws.marker("proj/sub", "environment:\n  FOO: inner\n");
    let cwd = ws.dir("proj/sub");

    let out = run_k(&ws, &cwd, ["version"], &[]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert_eq!(out.printed("FOO").as_deref(), Some("inner"));
}

#[test]
fn test_relative_kubeconfig_resolves_against_marker_directory() {
    let ws = KWorkspace::new();
    let marker = ws.marker("cluster", "kubeconfig: creds/config\n");
    let cwd = ws.dir("cluster/deep/er");

    let out = run_k(&ws, &cwd, ["get", "ns"], &[]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    let expected = std::fs::canonicalize(marker.parent().unwrap())
        .unwrap()
        .join("creds/config");
    assert_eq!(
        out.printed("KUBECONFIG").as_deref(),
        Some(expected.to_str().unwrap())
    );
}

#[test]
fn test_exit_code_of_tool_is_propagated() {
    let ws = KWorkspace::new();
    let cwd = ws.dir("exit");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[("FAKE_EXIT", "42")]);
    assert_eq!(out.status.code(), Some(42));
}

#[test]
fn test_malformed_marker_aborts_before_any_invocation() {
    let ws = KWorkspace::new();
    ws.marker("proj", "context: staging\n");
    let bad = std::fs::canonicalize(ws.marker("proj/broken", "context: [unclosed\n")).unwrap();
    let cwd = ws.dir("proj/broken");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[]);
    assert!(!out.status.success());
    assert!(out.stderr.contains(bad.to_str().unwrap()), "stderr: {}", out.stderr);
    assert!(ws.calls().is_empty());
}

#[test]
fn test_missing_override_command_is_reported() {
    let ws = KWorkspace::new();
    ws.marker("proj", "context: staging\n");
    let cwd = ws.dir("proj");

    k_cmd(&ws, &cwd)
        .args(["get", "pods"])
        .env("K_COMMANDNAME", "oc")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("command not found: oc"));
    assert!(ws.calls().is_empty());
}

#[test]
fn test_quiet_by_default() {
    let ws = KWorkspace::new();
    ws.marker("proj", "context: staging\nnamespace: dev\n");
    let cwd = ws.dir("proj");

    k_cmd(&ws, &cwd)
        .args(["get", "pods"])
        .env("K_LOGLEVEL", "verbose")
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("args: get pods"));
}

#[test]
fn test_command_override_from_marker() {
    let ws = KWorkspace::new();
    ws.install_tool("oc");
    ws.marker("openshift", "command: oc\ncontext: osd\n");
    let cwd = ws.dir("openshift");

    let out = run_k(&ws, &cwd, ["get", "projects"], &[]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert_eq!(
        ws.calls(),
        vec!["oc config use-context osd", "oc get projects"]
    );
}

#[test]
fn test_failed_context_switch_stops_the_run() {
    let ws = KWorkspace::new();
    ws.marker("proj", "context: staging\nnamespace: dev\n");
    let cwd = ws.dir("proj");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[("FAKE_FAIL", "use-context")]);
    assert!(!out.status.success());
    assert!(out.stderr.contains("failed to set context"), "stderr: {}", out.stderr);
    assert_eq!(ws.calls(), vec!["kubectl config use-context staging"]);
}

#[test]
fn test_failed_namespace_keeps_context_and_stops() {
    let ws = KWorkspace::new();
    ws.marker("proj", "context: staging\nnamespace: dev\n");
    let cwd = ws.dir("proj");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[("FAKE_FAIL", "set-context")]);
    assert!(!out.status.success());
    assert!(out.stderr.contains("failed to set namespace"), "stderr: {}", out.stderr);
    assert_eq!(
        ws.calls(),
        vec![
            "kubectl config use-context staging",
            "kubectl config set-context --current --namespace dev",
        ]
    );
}

#[test]
fn test_snapshot_uses_temporary_kubeconfig_and_removes_it() {
    let ws = KWorkspace::new();
    ws.marker("proj", "context: staging\n");
    let cwd = ws.dir("proj");
    let tmpdir = ws.temp.path().join("tmp");
    std::fs::create_dir_all(&tmpdir).unwrap();

    let out = run_k(
        &ws,
        &cwd,
        ["get", "pods"],
        &[("K_SNAPSHOT", "1"), ("TMPDIR", tmpdir.to_str().unwrap())],
    );
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert_eq!(
        ws.calls(),
        vec![
            "kubectl config view --flatten --merge",
            "kubectl config use-context staging",
            "kubectl get pods",
        ]
    );

    let snapshot = out.printed("KUBECONFIG").expect("KUBECONFIG printed");
    assert!(Path::new(&snapshot).starts_with(&tmpdir));
    assert!(!Path::new(&snapshot).exists());
}

#[test]
fn test_debug_logging_goes_to_stderr() {
    let ws = KWorkspace::new();
    ws.marker("proj", "namespace: dev\n");
    let cwd = ws.dir("proj");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[("K_LOGLEVEL", "debug")]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("setting namespace to dev"));
    assert!(!out.stdout.contains("setting namespace"));
}

#[test]
fn test_relative_command_path_resolves_against_marker_directory() {
    let ws = KWorkspace::new();
    ws.marker("proj", "command: tools/oc\n");
    ws.install_tool_at(&ws.dir("proj").join("tools/oc"));
    let cwd = ws.dir("proj/sub");

    let out = run_k(&ws, &cwd, ["get", "pods"], &[]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert_eq!(ws.calls(), vec!["oc get pods"]);
}

#[test]
fn test_environment_kubeconfig_override_is_warned() {
    let ws = KWorkspace::new();
    ws.marker(
        "proj",
        "kubeconfig: /etc/kube/prod\ncontext: prod\nenvironment:\n  KUBECONFIG: /tmp/other\n",
    );
    let cwd = ws.dir("proj");

    k_cmd(&ws, &cwd)
        .args(["get", "pods"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KUBECONFIG=/tmp/other"))
        .stderr(predicate::str::contains("overrides /etc/kube/prod"));
}
