//! Tests for the `scigraph-codegen` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../client/spec/scigraph.json")
}

fn codegen() -> Command {
    let mut cmd = Command::cargo_bin("scigraph-codegen").unwrap();
    cmd.env_remove("SCIGRAPH_SPEC").env_remove("RUST_LOG");
    cmd
}

/// Writes a copy of the fixture with `edit` applied.
fn edited_fixture(dir: &Path, edit: impl FnOnce(&mut Value)) -> PathBuf {
    let mut document: Value = serde_json::from_slice(&fs::read(fixture()).unwrap()).unwrap();
    edit(&mut document);
    let path = dir.join("edited.json");
    fs::write(&path, serde_json::to_vec_pretty(&document).unwrap()).unwrap();
    path
}

#[test]
fn generate_writes_sources_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("scigraph-client/src");

    codegen()
        .args(["generate", "--manifest", "--runtime-path", "../runtime", "-s"])
        .arg(fixture())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"));

    for file in ["lib.rs", "types.rs", "client.rs", "term.rs", "graph.rs"] {
        assert!(out.join(file).is_file(), "{file} was not written");
    }
    let manifest = fs::read_to_string(dir.path().join("scigraph-client/Cargo.toml")).unwrap();
    assert!(manifest.contains("name = \"sci-graph-client\""));
    assert!(manifest.contains("scigraph-runtime = { path = \"../runtime\" }"));
}

#[test]
fn dry_run_prints_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("src");

    codegen()
        .args(["generate", "--dry-run", "-s"])
        .arg(fixture())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== client.rs ==="))
        .stdout(predicate::str::contains("pub struct SciGraphClient"));

    assert!(!out.exists());
}

#[test]
fn spec_location_can_come_from_the_environment() {
    codegen()
        .env("SCIGRAPH_SPEC", fixture())
        .args(["inspect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("search_by_term"))
        .stdout(predicate::str::contains("GraphNeighborsResponse"));
}

#[test]
fn inspect_json_prints_the_model() {
    let output = codegen()
        .args(["inspect", "--json", "-s"])
        .arg(fixture())
        .output()
        .unwrap();
    assert!(output.status.success());

    let model: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(model["title"], "SciGraph");
    assert_eq!(model["base_url"], "https://scicrunch.org/api/1/scigraph");
    assert_eq!(model["resources"].as_array().map(Vec::len), Some(5));
}

#[test]
fn malformed_document_exits_with_2() {
    let dir = tempfile::tempdir().unwrap();
    let spec = edited_fixture(dir.path(), |doc| {
        doc["apis"][0]["apis"][0]["path"] = json!("/term/{curie}");
    });
    let out = dir.path().join("src");

    codegen()
        .args(["generate", "-s"])
        .arg(&spec)
        .arg("-o")
        .arg(&out)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[malformed spec]"))
        .stderr(predicate::str::contains("{curie}"));

    assert!(!out.exists(), "nothing is written for a rejected document");
}

#[test]
fn unsupported_feature_exits_with_3() {
    let dir = tempfile::tempdir().unwrap();
    let spec = edited_fixture(dir.path(), |doc| {
        doc["apis"][0]["apis"][0]["operations"][0]["parameters"]
            .as_array_mut()
            .unwrap()
            .push(json!({"name": "label", "paramType": "form", "type": "string"}));
    });

    codegen()
        .args(["generate", "-s"])
        .arg(&spec)
        .arg("-o")
        .arg(dir.path().join("src"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error[unsupported feature]"));
}

#[test]
fn unresolved_reference_exits_with_4() {
    let dir = tempfile::tempdir().unwrap();
    let spec = edited_fixture(dir.path(), |doc| {
        doc["apis"][0]["apis"][0]["operations"][0]["type"] = json!("Concept");
    });

    codegen()
        .args(["generate", "-s"])
        .arg(&spec)
        .arg("-o")
        .arg(dir.path().join("src"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("'Concept'"));
}

#[test]
fn missing_file_exits_with_1() {
    codegen()
        .args(["inspect", "-s", "/definitely/not/here.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/definitely/not/here.json"));
}
