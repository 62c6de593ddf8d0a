use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn cli_describes_the_data_folder() {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::copy("tests/fixtures/sales.csv", data.join("sales.csv")).unwrap();
    fs::write(data.join("notes.md"), "# notes\n").unwrap();

    Command::cargo_bin("data-ingestor")
        .unwrap()
        .arg("--root")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingestion process finished."))
        .stdout(predicate::str::contains("1 file(s) described, 1 warning(s), 0 failure(s)"));

    let text = fs::read_to_string(root.path().join("metadata").join("metadata.json")).unwrap();
    assert!(text.contains("\"file_name\": \"sales.csv\""));
}

#[test]
fn cli_honors_directory_overrides_and_log_file() {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("in");
    let meta = root.path().join("out");
    let log = root.path().join("ingest.log");
    fs::create_dir_all(&data).unwrap();
    fs::copy("tests/fixtures/people.txt", data.join("people.txt")).unwrap();

    Command::cargo_bin("data-ingestor")
        .unwrap()
        .arg("--root")
        .arg(root.path())
        .arg("--data-dir")
        .arg(&data)
        .arg("--metadata-dir")
        .arg(&meta)
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();

    assert!(meta.join("metadata.json").is_file());
    assert!(fs::read_to_string(&log).unwrap().contains("people.txt"));
}

#[test]
fn cli_fails_when_source_folder_is_missing() {
    let root = tempfile::tempdir().unwrap();

    Command::cargo_bin("data-ingestor")
        .unwrap()
        .arg("--root")
        .arg(root.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn cli_fail_fast_stops_on_bad_file() {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("broken.json"), "{\"id\": 1,").unwrap();

    Command::cargo_bin("data-ingestor")
        .unwrap()
        .arg("--root")
        .arg(root.path())
        .arg("--fail-fast")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"));
}
