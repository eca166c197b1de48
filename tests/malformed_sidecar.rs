//! Tests for import from missing or corrupt sidecar files.
//!
//! A sidecar that cannot be decoded in full must abort the import; no
//! partially valid metadata is ever turned into an archive.

use guitar::{Error, ImportOptions, TypeFlag};

mod common;

use common::tree_with_sidecar;

fn import_err(root: &std::path::Path) -> Error {
    let mut out = Vec::new();
    guitar::import_to_writer(&mut out, root, &ImportOptions::default()).unwrap_err()
}

#[test]
fn test_missing_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let err = guitar::import_to_writer(&mut out, dir.path(), &ImportOptions::default())
        .unwrap_err();

    match err {
        Error::MissingMetadata { path } => assert!(path.ends_with(".guitar")),
        other => panic!("expected MissingMetadata, got {:?}", other),
    }
    assert!(out.is_empty());
}

#[test]
fn test_custom_sidecar_name_missing() {
    let dir = tree_with_sidecar("{\"Name\":\"d\",\"Type\":\"D\",\"Mode\":755}\n");
    let options = ImportOptions::new().sidecar_name("other.ndjson");
    let result = guitar::import_to_writer(Vec::new(), dir.path(), &options);
    assert!(matches!(result, Err(Error::MissingMetadata { .. })));
}

#[test]
fn test_invalid_json_reports_line() {
    let dir = tree_with_sidecar(concat!(
        "{\"Name\":\"a\",\"Type\":\"D\",\"Mode\":755}\n",
        "{\"Name\":\"b\",\"Type\":\"D\",\"Mode\":755}\n",
        "{\"Name\":\"c\",\"Type\":\"D\",\"Mode\":\n",
    ));
    match import_err(dir.path()) {
        Error::MetadataCodec { line, .. } => assert_eq!(line, 3),
        other => panic!("expected MetadataCodec, got {:?}", other),
    }
}

#[test]
fn test_truncated_final_line() {
    let dir = tree_with_sidecar("{\"Name\":\"a\",\"Type\":\"D\",\"Mode\":755}\n{\"Name\":\"b\",\"Ty");
    assert!(matches!(
        import_err(dir.path()),
        Error::MetadataCodec { line: 2, .. }
    ));
}

#[test]
fn test_final_line_without_newline_is_imported() {
    let dir = tree_with_sidecar(
        "{\"Name\":\"a\",\"Type\":\"D\",\"Mode\":755}\n{\"Name\":\"b\",\"Type\":\"D\",\"Mode\":700}",
    );
    let entries = common::read_entries(&common::import(dir.path()));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].path, "b/");
    assert_eq!(entries[1].mode, 0o700);
}

#[test]
fn test_unknown_type_letter() {
    let dir = tree_with_sidecar("{\"Name\":\"odd\",\"Type\":\"X\",\"Mode\":644}\n");
    match import_err(dir.path()) {
        Error::UnrecognizedEntryType { entry, found } => {
            assert_eq!(entry, "odd");
            assert_eq!(found, TypeFlag::Code("X".into()));
        }
        other => panic!("expected UnrecognizedEntryType, got {:?}", other),
    }
}

#[test]
fn test_lowercase_letter_rejected() {
    let dir = tree_with_sidecar("{\"Name\":\"f\",\"Type\":\"f\",\"Mode\":644}\n");
    assert!(matches!(
        import_err(dir.path()),
        Error::UnrecognizedEntryType { .. }
    ));
}

#[test]
fn test_non_octal_mode() {
    let dir = tree_with_sidecar("{\"Name\":\"d\",\"Type\":\"D\",\"Mode\":789}\n");
    assert!(matches!(
        import_err(dir.path()),
        Error::ModeConversion { value: 789, .. }
    ));
}

#[test]
fn test_negative_mode() {
    let dir = tree_with_sidecar("{\"Name\":\"d\",\"Type\":\"D\",\"Mode\":-1}\n");
    assert!(matches!(
        import_err(dir.path()),
        Error::ModeConversion { .. }
    ));
}

#[test]
fn test_pre_epoch_mod_time() {
    let dir = tree_with_sidecar(
        "{\"Name\":\"d\",\"Type\":\"D\",\"Mode\":755,\"ModTime\":\"1969-12-31T23:59:59Z\"}\n",
    );
    assert!(matches!(
        import_err(dir.path()),
        Error::InvalidTimestamp { secs: -1, .. }
    ));
}

#[test]
fn test_unparseable_mod_time() {
    let dir = tree_with_sidecar("{\"Name\":\"d\",\"Type\":\"D\",\"ModTime\":\"last tuesday\"}\n");
    assert!(matches!(
        import_err(dir.path()),
        Error::MetadataCodec { line: 1, .. }
    ));
}

#[test]
fn test_wrong_field_type() {
    let dir = tree_with_sidecar("{\"Name\":\"d\",\"Type\":\"D\",\"Mode\":\"755\"}\n");
    assert!(matches!(
        import_err(dir.path()),
        Error::MetadataCodec { .. }
    ));
}

#[test]
fn test_empty_sidecar_gives_empty_archive() {
    let dir = tree_with_sidecar("");
    let data = common::import(dir.path());
    assert_eq!(data.len(), 1024);
    assert!(data.iter().all(|&b| b == 0));
}
