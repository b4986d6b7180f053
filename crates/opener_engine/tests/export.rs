use std::fs;

use opener_engine::{ensure_output_dir, ExportError, ExportWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn export_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = ExportWriter::new(temp.path());

    let first = writer.write("urls.txt", "https://a.com\n").unwrap();
    assert_eq!(first.file_name().unwrap(), "urls.txt");
    assert_eq!(fs::read_to_string(&first).unwrap(), "https://a.com\n");

    let second = writer.write("urls.txt", "https://b.com\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "https://b.com\n");
}

#[test]
fn file_in_place_of_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = ExportWriter::new(file_path.clone());
    let result = writer.write("urls.txt", "data");
    assert!(matches!(result, Err(ExportError::OutputDir(_))));
    assert!(!file_path.with_file_name("urls.txt").exists());
}

#[test]
fn path_like_file_names_are_rejected() {
    let temp = TempDir::new().unwrap();
    let writer = ExportWriter::new(temp.path());

    for name in ["", "..", "../urls.txt", "sub/urls.txt"] {
        assert!(
            matches!(writer.write(name, "x"), Err(ExportError::InvalidFilename(_))),
            "{name:?}"
        );
    }
}
