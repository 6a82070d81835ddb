//! CLI integration tests.
//!
//! These tests invoke the `graph-verify` binary via `std::process::Command`
//! against the fixture files and check exit codes and report output.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_graph-verify"))
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .arg("-q")
        .output()
        .expect("failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("invalid UTF-8")
}

#[test]
fn valid_graph_exits_zero_with_empty_report() {
    let output = run(&[&fixture("museum_valid.json"), "-s", &fixture("crm_schema.json")]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output), "");
}

#[test]
fn invalid_graph_exits_one_and_lists_violations() {
    let output = run(&[
        &fixture("museum_invalid.json"),
        "--schema",
        &fixture("crm_schema.json"),
        "--prefix",
        "ex=http://example.org/museum/",
    ]);
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 8, "unexpected report:\n{out}");
    assert_eq!(
        lines[0],
        "[ERROR] UnknownClass at entity ex:louvre: asserted class <http://erlangen-crm.org/240307/E99_Museum> is not declared in the schema"
    );
    for line in &lines {
        assert!(line.starts_with("[ERROR] "), "bad line: {line}");
    }
}

#[test]
fn missing_input_exits_two() {
    let output = run(&["/nonexistent/graph.json", "-s", &fixture("crm_schema.json")]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: loading graph from /nonexistent/graph.json"), "{stderr}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn unknown_extension_needs_explicit_format() {
    let dir = tempfile::tempdir().unwrap();
    let graph = dir.path().join("graph.data");
    fs::copy(fixture("museum_valid.json"), &graph).unwrap();
    let graph = graph.to_string_lossy().into_owned();

    let output = run(&[&graph, "-s", &fixture("crm_schema.json")]);
    assert_eq!(output.status.code(), Some(2));

    let output = run(&[
        &graph,
        "-s",
        &fixture("crm_schema.json"),
        "--graph-format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn json_output_parses() {
    let output = run(&[
        &fixture("museum_invalid.json"),
        "-s",
        &fixture("crm_schema.json"),
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["summary"]["errors"], 8);
    assert_eq!(value["summary"]["validEdges"], 4);
    assert_eq!(value["violations"][4]["kind"], "UnknownProperty");
}

#[test]
fn turtle_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("report.ttl");
    let output = run(&[
        &fixture("museum_graph.nt"),
        "-s",
        &fixture("crm_schema.nt"),
        "-f",
        "ttl",
        "-o",
        out_path.to_str().unwrap(),
        "--base-uri",
        "http://example.org/run/",
        "--prefix",
        "ex=http://example.org/museum/",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());

    let ttl = fs::read_to_string(&out_path).unwrap();
    assert!(ttl.contains("@prefix gv: <http://graph-verify.example/report/> ."));
    assert!(ttl.contains("<http://example.org/run/report> a gv:ValidationReport ;"));
    assert!(ttl.contains("gv:conforms false"));
    assert!(ttl.contains("gv:kind \"CardinalityViolation\""));
    assert!(ttl.contains("gv:focusNode ex:march"));
}

#[test]
fn ntriples_output_is_line_based() {
    let output = run(&[
        &fixture("museum_valid.json"),
        "-s",
        &fixture("crm_schema.json"),
        "--format",
        "ntriples",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 4);
    for line in out.lines() {
        assert!(line.starts_with('<') && line.ends_with(" ."), "bad line: {line}");
    }
    assert!(out.contains("\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>"));
}

#[test]
fn annotations_are_validated_when_kept() {
    let args = [fixture("museum_graph.nt"), "-s".into(), fixture("crm_schema.nt")];
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let output = run(&args);
    assert_eq!(stdout(&output).lines().count(), 1);

    let mut with_flag = args.clone();
    with_flag.push("--keep-annotations");
    let output = run(&with_flag);
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("UnknownProperty at edge[0]"));
}

#[test]
fn triplets_input() {
    let output = run(&[&fixture("museum_triplets.jsonl"), "-s", &fixture("crm_schema.json")]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with("[ERROR] RangeMismatch at edge[2] "));
    assert!(out.contains("<http://graph-verify.example/entity/Mona%20Lisa>"));
    assert!(out.contains(" (from c3): "));
}

#[test]
fn triplets_json_tallies_chunks() {
    let output = run(&[
        &fixture("museum_triplets.jsonl"),
        "-s",
        &fixture("crm_schema.json"),
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let by_origin = &value["summary"]["byOrigin"];
    assert_eq!(by_origin["c1"]["valid"], 2);
    assert_eq!(by_origin["c1"]["total"], 2);
    assert_eq!(by_origin["c3"]["valid"], 0);
    assert_eq!(by_origin["c3"]["total"], 1);
    assert!(by_origin.get("c2").is_none());
    assert_eq!(value["violations"][0]["subject"]["origin"], "c3");
    assert!(value.get("schemaDiagnostics").is_none());
}

#[test]
fn strict_fails_on_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    let graph = dir.path().join("graph.json");
    fs::write(
        &schema,
        r#"{"classes": [{"id": "crm:E21_Person", "subClassOf": ["crm:E39_Actor"]}]}"#,
    )
    .unwrap();
    fs::write(&graph, "{}").unwrap();
    let schema = schema.to_string_lossy().into_owned();
    let graph = graph.to_string_lossy().into_owned();

    let output = run(&[&graph, "-s", &schema]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("[WARNING] UnknownClass at class crm:E21_Person"));

    let output = run(&[&graph, "-s", &schema, "--strict"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(&[&graph, "-s", &schema, "--format", "json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["violations"].as_array().unwrap().len(), 0);
    assert_eq!(value["schemaDiagnostics"][0]["kind"], "UnknownClass");
}

#[test]
fn schema_cycle_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    let graph = dir.path().join("graph.json");
    fs::write(
        &schema,
        r#"{"classes": [{"id": "A", "subClassOf": ["B"]}, {"id": "B", "subClassOf": ["A"]}]}"#,
    )
    .unwrap();
    fs::write(&graph, r#"{"entities": [{"id": "x", "types": ["A"]}]}"#).unwrap();

    let output = run(&[graph.to_str().unwrap(), "-s", schema.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "[ERROR] SchemaCycle at class <A>: superclass cycle: <A> -> <B> -> <A>\n"
    );
}

#[test]
fn bad_prefix_binding_is_rejected_by_clap() {
    let output = run(&[
        &fixture("museum_valid.json"),
        "-s",
        &fixture("crm_schema.json"),
        "--prefix",
        "no-equals-sign",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected PREFIX=IRI"));
}
