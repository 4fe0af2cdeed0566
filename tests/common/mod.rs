#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn run_hed(args: &[&str]) -> Output {
    run_hed_with_env(args, &[])
}

pub fn run_hed_with_env(args: &[&str], env: &[(&str, &Path)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hed"));
    command.env_remove("HED_CONFIG");
    command.env_remove("RUST_LOG");
    for (key, value) in env {
        command.env(key, value);
    }
    command.args(args);
    command.output().expect("failed to run hed binary")
}

pub fn write_file(directory: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = directory.path().join(name);
    fs::write(&path, content).expect("temp fixture write should succeed");
    path
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("path should be utf-8")
}

pub fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

pub fn stderr_error_type(output: &Output) -> String {
    assert!(
        !output.status.success(),
        "command should fail; stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let response: Value =
        serde_json::from_slice(&output.stderr).expect("stderr should be valid JSON");
    response["error"]["type"]
        .as_str()
        .expect("error type should be a string")
        .to_string()
}

pub fn group_names(response: &Value) -> Vec<String> {
    response["groups"]
        .as_array()
        .expect("groups should be an array")
        .iter()
        .map(|group| {
            group["group"]
                .as_str()
                .expect("group name should be a string")
                .to_string()
        })
        .collect()
}
