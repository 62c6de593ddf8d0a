use std::fs;

use data_ingestor::ingestion::{CsvIngestor, TxtIngestor};
use data_ingestor::metadata::{load_metadata, save_metadata, MetadataBatch, METADATA_FILE_NAME};
use data_ingestor::IngestionError;

fn sample_batch() -> MetadataBatch {
    let mut batch = MetadataBatch::new();
    batch.push(CsvIngestor::default().ingest_file("tests/fixtures/sales.csv").unwrap());
    batch.push(TxtIngestor::default().ingest_file("tests/fixtures/people.txt").unwrap());
    batch
}

#[test]
fn artifact_is_a_four_space_indented_array() {
    let dir = tempfile::tempdir().unwrap();
    let written = save_metadata(&sample_batch(), dir.path().join("metadata")).unwrap();

    assert_eq!(written, dir.path().join("metadata").join(METADATA_FILE_NAME));
    let text = fs::read_to_string(&written).unwrap();
    let expected_head = concat!(
        "[\n",
        "    {\n",
        "        \"file_name\": \"sales.csv\",\n",
        "        \"file_type\": \".csv\",\n",
        "        \"columns\": [\n",
        "            \"id\",\n",
        "            \"amount\"\n",
        "        ],\n",
        "        \"row_count\": 3,\n",
        "        \"import_instructions\": {\n",
        "            \"function\": \"csv_reader\",\n",
        "            \"arguments\": {\n",
        "                \"path\": \"tests/fixtures/sales.csv\"\n",
        "            }\n",
        "        }\n",
        "    },\n",
    );
    assert!(text.starts_with(expected_head), "{text}");
    assert!(text.contains("\"delimiter\": \"\\t\""));
    assert!(text.ends_with("]\n"));
}

#[test]
fn saved_batch_loads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let batch = sample_batch();
    let written = save_metadata(&batch, dir.path()).unwrap();

    let loaded = load_metadata(&written).unwrap();
    assert_eq!(loaded, batch);
}

#[test]
fn loaded_recipes_reproduce_the_row_counts() {
    let dir = tempfile::tempdir().unwrap();
    let written = save_metadata(&sample_batch(), dir.path()).unwrap();

    for md in &load_metadata(&written).unwrap() {
        let table = md.reload_recipe.execute().unwrap();
        assert_eq!(table.row_count(), md.row_count, "{}", md.file_name);
        assert_eq!(table.columns, md.columns);
    }
}

#[test]
fn saving_replaces_previous_artifact_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    save_metadata(&sample_batch(), dir.path()).unwrap();
    let written = save_metadata(&MetadataBatch::new(), dir.path()).unwrap();

    assert_eq!(fs::read_to_string(&written).unwrap(), "[]\n");
    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![METADATA_FILE_NAME.to_string()]);
}

#[test]
fn unknown_reader_tag_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(METADATA_FILE_NAME);
    fs::write(
        &path,
        r#"[{"file_name":"a.csv","file_type":".csv","columns":[],"row_count":0,
            "import_instructions":{"function":"os_system","arguments":{"path":"a.csv"}}}]"#,
    )
    .unwrap();

    let err = load_metadata(&path).unwrap_err();
    assert!(matches!(err, IngestionError::Metadata(_)));
}

#[test]
fn unwritable_metadata_dir_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("metadata");
    fs::write(&blocker, "not a directory").unwrap();

    let err = save_metadata(&sample_batch(), &blocker).unwrap_err();
    assert!(matches!(err, IngestionError::Io(_)));
}
