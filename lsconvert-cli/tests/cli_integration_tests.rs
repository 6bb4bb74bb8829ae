//! Integration tests for the lsconvert CLI
//!
//! Tests command-line interface functionality including:
//! - Conversion of each input format from files
//! - Batch manifests
//! - Error reporting and exit codes

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lsconvert"))
}

/// Test helper to create a temporary directory
fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

/// Test helper to run CLI command and return output
fn run_cli_command(args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new(get_cli_path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()?;
    Ok(output)
}

/// Test helper to write a fixture and return its path as a string
fn write_fixture(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path.to_str().unwrap().to_string()
}

fn tesseract_fixture() -> Value {
    json!({
        "level": [1, 2, 5, 5],
        "page_num": [1, 1, 1, 1],
        "block_num": [0, 1, 1, 1],
        "par_num": [0, 1, 1, 1],
        "line_num": [0, 1, 1, 1],
        "word_num": [0, 0, 1, 2],
        "left": [0, 100, 100, 250],
        "top": [0, 100, 100, 100],
        "width": [1000, 300, 100, 150],
        "height": [500, 50, 50, 50],
        "conf": ["-1", "-1", 90, 80],
        "text": ["", "", "foo", "bar"]
    })
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON task")
}

#[test]
fn test_cli_convert_tesseract_to_stdout() {
    let temp_dir = setup_temp_dir();
    let input = write_fixture(
        temp_dir.path(),
        "page.json",
        &tesseract_fixture().to_string(),
    );

    let output = run_cli_command(&[
        "convert",
        "--format",
        "tesseract",
        "--size",
        "1000x500",
        "--input",
        &input,
        "--url",
        "https://example.com/page.png",
        "--sequential-ids",
    ])
    .expect("CLI command should run");

    assert!(output.status.success(), "Command should succeed");
    let task = stdout_json(&output);
    assert_eq!(task["data"]["ocr"], "https://example.com/page.png");

    let prediction = &task["predictions"][0];
    let results = prediction["result"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "region-0");
    assert_eq!(results[1]["id"], "region-0");
    assert_eq!(results[0]["type"], "rectangle");
    assert_eq!(results[1]["value"]["text"], json!(["foo bar"]));
    assert_eq!(results[0]["value"]["x"], json!(10.0));
    assert_eq!(results[0]["value"]["y"], json!(20.0));

    let score = prediction["score"].as_f64().unwrap();
    assert!((score - 0.85).abs() < 1e-9);
}

#[test]
fn test_cli_convert_word_level() {
    let temp_dir = setup_temp_dir();
    let input = write_fixture(
        temp_dir.path(),
        "page.json",
        &tesseract_fixture().to_string(),
    );

    let output = run_cli_command(&[
        "convert", "-f", "tabular", "-s", "1000x500", "-n", &input, "-l", "word",
    ])
    .expect("CLI command should run");

    assert!(output.status.success());
    let task = stdout_json(&output);
    let texts: Vec<&Value> = task["predictions"][0]["result"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["type"] == "textarea")
        .map(|entry| &entry["value"]["text"][0])
        .collect();
    assert_eq!(texts, vec![&json!("foo"), &json!("bar")]);
    assert_eq!(task["data"]["ocr"], Value::Null);
}

#[test]
fn test_cli_convert_tsv_input() {
    let temp_dir = setup_temp_dir();
    let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
               2\t1\t1\t0\t0\t0\t10\t10\t100\t20\t-1\t\n\
               5\t1\t1\t1\t1\t1\t10\t10\t40\t20\t96\tHello\n\
               5\t1\t1\t1\t1\t2\t60\t10\t50\t20\t88\tworld\n";
    let input = write_fixture(temp_dir.path(), "page.tsv", tsv);

    let output = run_cli_command(&["convert", "-f", "tesseract", "-s", "200x100", "-n", &input])
        .expect("CLI command should run");

    assert!(output.status.success());
    let task = stdout_json(&output);
    assert_eq!(
        task["predictions"][0]["result"][1]["value"]["text"],
        json!(["Hello world"])
    );
    let score = task["predictions"][0]["score"].as_f64().unwrap();
    assert!((score - 0.92).abs() < 1e-9);
}

#[test]
fn test_cli_convert_alto_xml() {
    let temp_dir = setup_temp_dir();
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<alto xmlns="http://www.loc.gov/standards/alto/ns-v4#">
  <Layout>
    <Page ID="page_1" WIDTH="2000" HEIGHT="1000">
      <PrintSpace>
        <TextBlock ID="r1" HPOS="200" VPOS="100" WIDTH="1000" HEIGHT="200">
          <TextLine ID="l1"><String CONTENT="Dear Sir,"/></TextLine>
          <TextLine ID="l2"><String CONTENT="with regards"/></TextLine>
        </TextBlock>
      </PrintSpace>
    </Page>
  </Layout>
</alto>"#;
    let input = write_fixture(temp_dir.path(), "page.xml", xml);

    let output = run_cli_command(&["convert", "-f", "transkribus", "-s", "2000x1000", "-n", &input])
        .expect("CLI command should run");

    assert!(output.status.success());
    let task = stdout_json(&output);
    let transcription = &task["predictions"][0]["result"][1];
    assert_eq!(transcription["value"]["text"], json!(["Dear Sir,\nwith regards"]));
    assert_eq!(transcription["score"], json!(0.0));
    assert_eq!(task["predictions"][0]["result"][0]["value"]["width"], json!(50.0));
}

#[test]
fn test_cli_convert_to_file() {
    let temp_dir = setup_temp_dir();
    let input = write_fixture(
        temp_dir.path(),
        "page.json",
        &tesseract_fixture().to_string(),
    );
    let output_path = temp_dir.path().join("tasks").join("page.json");

    let output = run_cli_command(&[
        "convert",
        "-f",
        "tesseract",
        "-s",
        "1000x500",
        "-n",
        &input,
        "-o",
        output_path.to_str().unwrap(),
        "--pretty",
    ])
    .expect("CLI command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task written to"), "Should show success message");

    let written = fs::read_to_string(&output_path).expect("task file should exist");
    assert!(written.contains('\n'), "Pretty output spans several lines");
    let task: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(task["predictions"][0]["result"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_id_length() {
    let temp_dir = setup_temp_dir();
    let input = write_fixture(
        temp_dir.path(),
        "page.json",
        &tesseract_fixture().to_string(),
    );

    let output = run_cli_command(&[
        "convert", "-f", "tesseract", "-s", "1000x500", "-n", &input, "--id-length", "6",
    ])
    .expect("CLI command should run");

    assert!(output.status.success());
    let task = stdout_json(&output);
    let id = task["predictions"][0]["result"][0]["id"].as_str().unwrap();
    assert_eq!(id.len(), 6);
}

#[test]
fn test_cli_unknown_format() {
    let temp_dir = setup_temp_dir();
    let input = write_fixture(temp_dir.path(), "page.json", "{}");

    let output = run_cli_command(&["convert", "-f", "hocr", "-s", "10x10", "-n", &input])
        .expect("CLI command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Converter is not implemented: hocr"));
}

#[test]
fn test_cli_empty_input() {
    let temp_dir = setup_temp_dir();
    let input = write_fixture(temp_dir.path(), "page.json", "{}");

    let output = run_cli_command(&["convert", "-f", "abbyy", "-s", "10x10", "-n", &input])
        .expect("CLI command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("looks empty"));
}

#[test]
fn test_cli_missing_input_file() {
    let temp_dir = setup_temp_dir();
    let missing = temp_dir.path().join("missing.json");

    let output = run_cli_command(&[
        "convert",
        "-f",
        "abbyy",
        "-s",
        "10x10",
        "-n",
        missing.to_str().unwrap(),
    ])
    .expect("CLI command should run");

    assert!(!output.status.success());
}

#[test]
fn test_cli_requires_image_or_size() {
    let output = run_cli_command(&["convert", "-f", "abbyy", "-n", "page.json"])
        .expect("CLI command should run");
    assert!(!output.status.success());
}

#[test]
fn test_cli_batch() {
    let temp_dir = setup_temp_dir();
    let abbyy = json!({
        "layout": {"pages": [{"texts": [
            {"id": "b1", "position": {"l": 0, "t": 0, "r": 50, "b": 50}, "confidence": 0.75}
        ]}]},
        "content": {"paragraphs": [
            {"text": "Heading", "role": "heading", "layoutReferences": [{"blockId": "b1"}]}
        ]}
    });
    let abbyy_path = write_fixture(temp_dir.path(), "abbyy.json", &abbyy.to_string());

    let manifest = json!([
        {
            "format": "abbyy",
            "image": {"width": 100, "height": 100},
            "input": abbyy_path,
            "url": "https://example.com/1.png"
        },
        {
            "format": "tesseract",
            "image": {"width": 1000, "height": 500},
            "input": tesseract_fixture(),
            "options": {"per_level": 5}
        },
        {
            "format": "hocr",
            "image": {"width": 100, "height": 100},
            "input": {}
        }
    ]);
    let manifest_path = write_fixture(temp_dir.path(), "manifest.json", &manifest.to_string());
    let output_dir = temp_dir.path().join("out");

    let output = run_cli_command(&[
        "batch",
        &manifest_path,
        "--output-dir",
        output_dir.to_str().unwrap(),
    ])
    .expect("CLI command should run");

    assert!(!output.status.success(), "One request fails");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Converted 2 of 3 requests"));

    let first: Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("0.json")).unwrap()).unwrap();
    assert_eq!(first["data"]["ocr"], "https://example.com/1.png");
    assert_eq!(first["predictions"][0]["score"], json!(0.75));

    let second: Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("1.json")).unwrap()).unwrap();
    assert_eq!(second["predictions"][0]["result"].as_array().unwrap().len(), 4);

    assert!(!output_dir.join("2.json").exists());
}

#[test]
fn test_cli_batch_invalid_manifest() {
    let temp_dir = setup_temp_dir();
    let manifest_path = write_fixture(temp_dir.path(), "manifest.json", "{\"not\": \"a list\"}");
    let output_dir = temp_dir.path().join("out");

    let output = run_cli_command(&["batch", &manifest_path, "-d", output_dir.to_str().unwrap()])
        .expect("CLI command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid manifest"));
}

#[test]
fn test_cli_levels() {
    let output = run_cli_command(&["levels"]).expect("CLI command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "1\tpage\tpage_num");
    assert_eq!(lines[4], "5\tword\tword_num");
}

#[test]
fn test_cli_formats() {
    let output = run_cli_command(&["formats"]).expect("CLI command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tabular\tTesseract"));
    assert!(stdout.contains("hierarchical\tABBYY"));
    assert!(stdout.contains("alto\tTranskribus"));
}

#[test]
fn test_cli_help() {
    let output = run_cli_command(&["--help"]).expect("CLI command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("convert"));
    assert!(stdout.contains("batch"));
}

#[test]
fn test_cli_version() {
    let output = run_cli_command(&["--version"]).expect("CLI command should run");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("lsconvert"));
}
