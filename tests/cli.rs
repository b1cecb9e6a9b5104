//! End-to-end tests of the `lambda_packager` binary.
//!
//! A shell script stands in for esbuild so the tests run without node.

#![cfg(unix)]

use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const FAKE_ESBUILD: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --nope)
      printf '✘ [ERROR] Invalid build flag: "--nope"\n\n1 error\n' >&2
      exit 1
      ;;
    --fail)
      printf '✘ [ERROR] Could not resolve "left-pad"\n\n    src/index.ts:1:20:\n      1 │ import leftPad from "left-pad";\n        ╵                     ~~~~~~~~~~\n\n  You can mark the path "left-pad" as external to exclude it from the bundle.\n\n1 error\n' >&2
      exit 1
      ;;
    --warn)
      printf '▲ [WARNING] Unused import [unused-import]\n\n1 warning\n' >&2
      ;;
  esac
done
printf 'exports.handler = async () => ({ statusCode: 200, body: "ok" });\n'
"#;

struct Workspace {
    dir: tempfile::TempDir,
    esbuild: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = dir.path().join("esbuild");
        std::fs::write(&esbuild, FAKE_ESBUILD).unwrap();
        std::fs::set_permissions(&esbuild, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::create_dir(dir.path().join("out")).unwrap();
        Self { dir, esbuild }
    }

    fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn package(&self, esbuild_args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("lambda_packager").unwrap();
        cmd.env_remove("LAMBDA_PACKAGER_ESBUILD_BINARY")
            .arg("package")
            .arg("--entrypoint")
            .arg(fixture().join("src/index.ts"))
            .arg("--working-directory")
            .arg(fixture())
            .arg("--esbuild-binary")
            .arg(&self.esbuild)
            .arg("--output-dir")
            .arg(self.out_dir())
            .arg("--")
            .args(esbuild_args);
        cmd
    }
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/lambda")
}

fn hash_of(path: &str) -> String {
    let bytes = std::fs::read(path).unwrap();
    base64::engine::general_purpose::STANDARD.encode(Sha256::digest(&bytes))
}

#[test]
fn schema_lists_the_data_source() {
    Command::cargo_bin("lambda_packager")
        .unwrap()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("lambdapackager_package"))
        .stdout(predicate::str::contains("source_code_hash"));
}

#[test]
fn package_reports_zip_and_matching_hash() {
    let ws = Workspace::new();

    let output = ws.package(&["--bundle", "--platform=node"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let filename = state["filename"].as_str().unwrap();
    let hash = state["source_code_hash"].as_str().unwrap();

    assert!(Path::new(filename).starts_with(ws.out_dir()));
    assert_eq!(hash, hash_of(filename));
    assert_eq!(state["args"][0], "--bundle");

    let mut archive = zip::ZipArchive::new(std::fs::File::open(filename).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
    let mut entry = archive.by_name("index.js").unwrap();
    let mut contents = String::new();
    entry.read_to_string(&mut contents).unwrap();
    assert!(contents.starts_with("exports.handler"));
}

#[test]
fn repeated_packaging_is_byte_identical() {
    let ws = Workspace::new();

    let run = || {
        let output = ws.package(&["--bundle"]).output().unwrap();
        assert!(output.status.success());
        let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        (
            state["filename"].as_str().unwrap().to_string(),
            state["source_code_hash"].as_str().unwrap().to_string(),
        )
    };

    let (first_file, first_hash) = run();
    let (second_file, second_hash) = run();

    assert_ne!(first_file, second_file);
    assert_eq!(first_hash, second_hash);
    assert_eq!(
        std::fs::read(first_file).unwrap(),
        std::fs::read(second_file).unwrap()
    );
}

#[test]
fn missing_entrypoint_names_both_paths() {
    let ws = Workspace::new();

    Command::cargo_bin("lambda_packager")
        .unwrap()
        .args([
            "package",
            "--entrypoint",
            "/does/not/exist/handler/src/index.ts",
            "--working-directory",
            "/does/not/exist",
            "--esbuild-binary",
        ])
        .arg(&ws.esbuild)
        .args(["--", "--bundle"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: Could not find entrypoint file"))
        .stderr(predicate::str::contains(
            "You specified the /does/not/exist/handler/src/index.ts entrypoint which was resolved to /does/not/exist/handler/src/index.ts",
        ))
        .stderr(predicate::str::contains("no such file or directory"));
}

#[test]
fn unknown_flag_is_a_parse_error() {
    let ws = Workspace::new();

    ws.package(&["--nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to parse build options"))
        .stderr(predicate::str::contains("Invalid build flag: \"--nope\""));
}

#[test]
fn build_errors_are_relayed_with_location() {
    let ws = Workspace::new();

    ws.package(&["--bundle", "--fail"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Error: esbuild error: Could not resolve \"left-pad\"",
        ))
        .stderr(predicate::str::contains("src/index.ts:1 - suggestion: "))
        .stderr(predicate::str::contains("You can mark the path"));
}

#[test]
fn warnings_do_not_fail_the_build() {
    let ws = Workspace::new();

    ws.package(&["--bundle", "--warn"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: esbuild warning: Unused import",
        ))
        .stdout(predicate::str::contains("source_code_hash"));
}

#[test]
fn external_protocol_round_trip() {
    let ws = Workspace::new();
    let query = serde_json::json!({
        "args": serde_json::to_string(&["--bundle", "--platform=node"]).unwrap(),
        "entrypoint": fixture().join("src/index.ts"),
        "working_directory": fixture(),
    });

    let output = Command::cargo_bin("lambda_packager")
        .unwrap()
        .env("LAMBDA_PACKAGER_ESBUILD_BINARY", &ws.esbuild)
        .arg("external")
        .arg("--output-dir")
        .arg(ws.out_dir())
        .write_stdin(query.to_string())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let result: std::collections::BTreeMap<String, String> =
        serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result["source_code_hash"], hash_of(&result["filename"]));
}

#[test]
fn read_reports_configuration_diagnostics_as_json() {
    let ws = Workspace::new();
    let request = serde_json::json!({
        "provider": { "esbuild_binary": ws.dir.path() },
        "config": {
            "args": ["--bundle"],
            "entrypoint": fixture().join("src/index.ts"),
            "working_directory": fixture(),
        }
    });

    let output = Command::cargo_bin("lambda_packager")
        .unwrap()
        .arg("read")
        .write_stdin(request.to_string())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(response.get("state").is_none());
    assert_eq!(
        response["diagnostics"][0]["summary"],
        "An override esbuild_binary was set and is invalid"
    );
}
