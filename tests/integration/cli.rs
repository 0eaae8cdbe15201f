//! Integration tests for the `webpad` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use webpad::preview::decode_data_uri;

fn write_sources(dir: &TempDir) -> [String; 3] {
    let html = dir.path().join("index.html");
    let css = dir.path().join("style.css");
    let js = dir.path().join("script.js");
    fs::write(&html, "<p id=\"out\"></p>").unwrap();
    fs::write(&css, "p { margin: 0; }").unwrap();
    fs::write(&js, "console.log('ready')").unwrap();
    [html, css, js].map(|p| p.to_string_lossy().to_string())
}

#[test]
fn test_compose_prints_document() {
    let dir = TempDir::new().unwrap();
    let [html, css, js] = write_sources(&dir);

    Command::cargo_bin("webpad")
        .unwrap()
        .args(["compose", "--html", &html, "--css", &css, "--js", &js])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<style>p { margin: 0; }</style>"))
        .stdout(predicate::str::contains("<body><p id=\"out\"></p></body>"))
        .stdout(predicate::str::contains(
            "<script>console.log('ready')</script>\n</html>",
        ));
}

#[test]
fn test_compose_data_uri() {
    let dir = TempDir::new().unwrap();
    let [html, _, _] = write_sources(&dir);

    let output = Command::cargo_bin("webpad")
        .unwrap()
        .args(["compose", "--html", &html, "--data-uri"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let document = decode_data_uri(stdout.trim_end()).unwrap();
    assert!(document.contains("<body><p id=\"out\"></p></body>"));
    assert!(document.contains("<style></style>"));
}

#[test]
fn test_compose_missing_file_fails() {
    Command::cargo_bin("webpad")
        .unwrap()
        .args(["compose", "--html", "/nonexistent/webpad/index.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("webpad")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("compose"));
}
