use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use data_ingestor::ingestion::{IngestionOptions, IngestionWarning, ReaderId, ZipIngestor};
use data_ingestor::types::FileType;
use data_ingestor::IngestionError;

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, contents) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, opts).unwrap();
            continue;
        }
        zip.start_file(*name, opts).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn ingestor(extraction_dir: &Path) -> ZipIngestor {
    ZipIngestor::new(extraction_dir, IngestionOptions::default())
}

#[test]
fn supported_members_are_described_and_others_warned() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    let extracted = dir.path().join("extracted_data");
    write_zip(&archive, &[("a.csv", "x,y\n1,2\n3,4\n"), ("notes.md", "# notes\n")]);

    let out = ingestor(&extracted).ingest_archive(&archive).unwrap();

    assert_eq!(out.members.len(), 1);
    let md = &out.members[0];
    assert_eq!(md.file_name, "a.csv");
    assert_eq!(md.file_type, FileType::Csv);
    assert_eq!(md.columns, vec!["x", "y"]);
    assert_eq!(md.row_count, 2);
    assert_eq!(md.reload_recipe.reader_id, ReaderId::CsvReader);
    assert_eq!(md.reload_recipe.path().unwrap(), extracted.join("a.csv"));
    assert!(extracted.join("a.csv").is_file());

    assert_eq!(
        out.warnings,
        vec![IngestionWarning::UnsupportedFormat {
            path: extracted.join("notes.md"),
            extension: ".md".to_string(),
        }]
    );
}

#[test]
fn members_keep_archive_order_and_nested_paths() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    let extracted = dir.path().join("out");
    write_zip(
        &archive,
        &[
            ("z.txt", "k\tv\n1\t2\n"),
            ("nested/", ""),
            ("nested/b.json", r#"[{"k":1},{"k":2},{"k":3}]"#),
        ],
    );

    let out = ingestor(&extracted).ingest_archive(&archive).unwrap();
    let names: Vec<&str> = out.members.iter().map(|m| m.file_name.as_str()).collect();
    assert_eq!(names, vec!["z.txt", "b.json"]);
    assert_eq!(out.members[1].row_count, 3);
    assert_eq!(out.members[1].reload_recipe.path().unwrap(), extracted.join("nested").join("b.json"));
    assert!(out.warnings.is_empty());
}

#[test]
fn hidden_and_reserved_entries_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("mac.zip");
    let extracted = dir.path().join("out");
    write_zip(
        &archive,
        &[
            ("a.csv", "id\n1\n"),
            ("__MACOSX/", ""),
            ("__MACOSX/._a.csv", "garbage"),
            (".DS_Store", "garbage"),
        ],
    );

    let out = ingestor(&extracted).ingest_archive(&archive).unwrap();
    assert_eq!(out.members.len(), 1);
    assert!(out.warnings.is_empty());
    assert!(!extracted.join(".DS_Store").exists());
}

#[test]
fn archive_without_eligible_members_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("empty.zip");
    write_zip(&archive, &[("__MACOSX/", ""), (".DS_Store", "x")]);

    let err = ingestor(&dir.path().join("out")).ingest_archive(&archive).unwrap_err();
    assert!(matches!(err, IngestionError::EmptyArchive { .. }));
    assert!(err.to_string().contains("empty.zip"));
}

#[test]
fn failing_member_becomes_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("mixed.zip");
    let extracted = dir.path().join("out");
    write_zip(&archive, &[("bad.json", "{\"id\": 1,"), ("good.csv", "id\n1\n")]);

    let out = ingestor(&extracted).ingest_archive(&archive).unwrap();
    assert_eq!(out.members.len(), 1);
    assert_eq!(out.members[0].file_name, "good.csv");
    assert_eq!(out.warnings.len(), 1);
    match &out.warnings[0] {
        IngestionWarning::MemberFailed { path, message } => {
            assert_eq!(path, &extracted.join("bad.json"));
            assert!(message.contains("bad.json"));
        }
        other => panic!("expected MemberFailed, got {other:?}"),
    }
}

#[test]
fn encrypted_member_fails_alone() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("mixed.zip");
    let extracted = dir.path().join("out");

    let mut zip = ZipWriter::new(File::create(&archive).unwrap());
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file("good.csv", opts).unwrap();
    zip.write_all(b"id\n1\n2\n").unwrap();
    zip.start_file("locked.csv", opts.with_deprecated_encryption(b"secret")).unwrap();
    zip.write_all(b"id\n9\n").unwrap();
    zip.finish().unwrap();

    let out = ingestor(&extracted).ingest_archive(&archive).unwrap();
    assert_eq!(out.members.len(), 1);
    assert_eq!(out.members[0].file_name, "good.csv");
    assert_eq!(out.members[0].row_count, 2);
    assert_eq!(out.warnings.len(), 1);
    assert!(matches!(
        &out.warnings[0],
        IngestionWarning::MemberFailed { path, .. } if path == &extracted.join("locked.csv")
    ));
    assert!(!extracted.join("locked.csv").exists());
}

#[test]
fn rerun_overwrites_and_ignores_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    let extracted = dir.path().join("out");
    fs::create_dir_all(&extracted).unwrap();
    fs::write(extracted.join("leftover.csv"), "id\n1\n").unwrap();

    write_zip(&archive, &[("a.csv", "id\n1\n")]);
    let first = ingestor(&extracted).ingest_archive(&archive).unwrap();
    assert_eq!(first.members[0].row_count, 1);

    write_zip(&archive, &[("a.csv", "id\n1\n2\n3\n")]);
    let second = ingestor(&extracted).ingest_archive(&archive).unwrap();
    assert_eq!(second.members.len(), 1);
    assert_eq!(second.members[0].row_count, 3);
    assert_eq!(fs::read_to_string(extracted.join("a.csv")).unwrap(), "id\n1\n2\n3\n");
}

#[test]
fn non_zip_content_is_an_archive_error() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("fake.zip");
    fs::write(&archive, "this is not a zip archive").unwrap();

    let err = ingestor(&dir.path().join("out")).ingest_archive(&archive).unwrap_err();
    assert!(matches!(err, IngestionError::Archive { .. }));
}

#[test]
fn missing_archive_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = ingestor(dir.path())
        .ingest_archive(dir.path().join("missing.zip"))
        .unwrap_err();
    assert!(matches!(err, IngestionError::FileNotFound { .. }));
}
