// tests/preferences_tests.rs
use autoupdater::preferences::{AutoUpdatePreference, MemoryPreferenceStore, TomlPreferenceStore};
use std::fs;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = TomlPreferenceStore::open(&dir.path().join("preferences.toml"));
    assert!(store.auto_update_enabled());
    assert!(store.skipped_version().is_none());
}

#[test]
fn toggle_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");

    let store = TomlPreferenceStore::open(&path);
    store.set_auto_update_enabled(false).unwrap();
    assert!(!store.auto_update_enabled());

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[update]"));
    assert!(content.contains("auto = false"));

    let reopened = TomlPreferenceStore::open(&path);
    assert!(!reopened.auto_update_enabled());
}

#[test]
fn skipped_version_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");

    let store = TomlPreferenceStore::open(&path);
    store.set_auto_update_enabled(false).unwrap();
    store.skip_version("1.11.0").unwrap();

    let reopened = TomlPreferenceStore::open(&path);
    assert_eq!(reopened.skipped_version().as_deref(), Some("1.11.0"));
    assert!(!reopened.auto_update_enabled());
}

#[test]
fn creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("preferences.toml");

    let store = TomlPreferenceStore::open(&path);
    store.set_auto_update_enabled(true).unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn corrupt_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");
    fs::write(&path, "this is = = not toml").unwrap();

    let store = TomlPreferenceStore::open(&path);
    assert!(store.auto_update_enabled());
}

#[test]
fn failed_write_keeps_previous_value() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the file should be makes the write fail
    let path = dir.path().join("preferences.toml");
    fs::create_dir(&path).unwrap();

    let store = TomlPreferenceStore::open(&path);
    assert!(store.set_auto_update_enabled(false).is_err());
    assert!(store.auto_update_enabled());
}

#[test]
fn memory_store_records_writes() {
    let store = MemoryPreferenceStore::new(false);
    store.set_auto_update_enabled(true).unwrap();
    store.set_auto_update_enabled(false).unwrap();
    assert_eq!(store.writes(), vec![true, false]);

    store.set_fail_writes(true);
    assert!(store.set_auto_update_enabled(true).is_err());
    assert!(!store.auto_update_enabled());
    assert_eq!(store.writes().len(), 2);
}
