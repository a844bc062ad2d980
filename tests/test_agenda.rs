use std::path::PathBuf;

use meeting_minutes_rs::agenda::{AgendaLoader, AGENDA_PLACEHOLDER};
use meeting_minutes_rs::types::{AgendaOutcome, MeetingError};

fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn plain_text_agenda_is_loaded_in_full() {
    let content = "1. Welcome\n2. Project status\n";
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "agenda.txt", content);

    let mut loader = AgendaLoader::new();
    assert!(!loader.has_agenda());

    let outcome = loader.load(&path).await.unwrap();
    assert_eq!(outcome, AgendaOutcome::Loaded(content.len()));
    assert_eq!(loader.agenda(), content);
    assert!(loader.has_agenda());
}

#[tokio::test]
async fn last_upload_wins() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_fixture(&dir, "first.txt", "old agenda");
    let second = write_fixture(&dir, "second.txt", "new agenda");

    let mut loader = AgendaLoader::new();
    loader.load(&first).await.unwrap();
    loader.load(&second).await.unwrap();

    assert_eq!(loader.agenda(), "new agenda");
}

#[tokio::test]
async fn binary_document_formats_install_the_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let text = write_fixture(&dir, "agenda.txt", "real agenda text");
    let pdf = write_fixture(&dir, "agenda.pdf", "%PDF-1.4 not actually parsed");

    let mut loader = AgendaLoader::new();
    loader.load(&text).await.unwrap();
    assert_eq!(loader.agenda(), "real agenda text");

    // Recognized-but-unsupported formats overwrite the previous agenda
    let outcome = loader.load(&pdf).await.unwrap();
    assert_eq!(outcome, AgendaOutcome::Placeholder);
    assert_eq!(loader.agenda(), AGENDA_PLACEHOLDER);
}

#[tokio::test]
async fn unknown_extension_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let text = write_fixture(&dir, "agenda.txt", "kept agenda");
    let weird = write_fixture(&dir, "agenda.xyz", "whatever");

    let mut loader = AgendaLoader::new();
    loader.load(&text).await.unwrap();

    // Unlike pdf/docx, an unrecognized extension leaves the agenda untouched
    let outcome = loader.load(&weird).await.unwrap();
    assert_eq!(outcome, AgendaOutcome::Ignored("xyz".to_string()));
    assert_eq!(loader.agenda(), "kept agenda");
}

#[tokio::test]
async fn failed_read_leaves_agenda_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let text = write_fixture(&dir, "agenda.txt", "kept agenda");
    let missing = dir.path().join("does_not_exist.txt");

    let mut loader = AgendaLoader::new();
    loader.load(&text).await.unwrap();

    let err = loader.load(&missing).await.unwrap_err();
    assert!(matches!(err, MeetingError::FileRead(_)));
    assert_eq!(loader.agenda(), "kept agenda");
}

#[tokio::test]
async fn whitespace_only_file_counts_as_no_agenda() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "agenda.txt", "   \n\t\n");

    let mut loader = AgendaLoader::new();
    loader.load(&path).await.unwrap();

    assert!(!loader.has_agenda());
}
