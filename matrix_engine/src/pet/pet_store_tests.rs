/// Tests for PetStore file handling

use super::*;
use crate::error::Error;
use tempfile::tempdir;

#[test]
fn test_missing_file_is_created_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("matrix_cat.data");

    let store = PetStore::load(&path, 1000.0).unwrap();

    assert_eq!(store.state(), &PetState::new(1000.0));
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), PET_STATE_SIZE);
    assert_eq!(bytes, PetState::new(1000.0).to_bytes());
}

#[test]
fn test_load_reads_saved_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pet.data");

    let mut store = PetStore::load(&path, 10.0).unwrap();
    store.state_mut().affection = 99.0;
    store.save(20.0).unwrap();

    let reloaded = PetStore::load(&path, 30.0).unwrap();
    assert_eq!(reloaded.state().affection, 99.0);
    assert_eq!(reloaded.state().last_update, 20.0);
}

#[test]
fn test_short_file_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pet.data");
    fs::write(&path, 12.0f32.to_ne_bytes()).unwrap();

    let store = PetStore::load(&path, 50.0).unwrap();

    assert_eq!(store.state().hunger, 12.0);
    assert_eq!(store.state().energy, 75.0);
    assert_eq!(store.state().last_update, 50.0);
    // A short file is read, not rewritten
    assert_eq!(fs::read(&path).unwrap().len(), 4);
}

#[test]
fn test_unreadable_path_is_io_error() {
    let dir = tempdir().unwrap();
    // A directory cannot be read as a file
    let result = PetStore::load(dir.path(), 0.0);
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pet.data");

    let mut store = PetStore::load(&path, 0.0).unwrap();
    store.save(1.0).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![OsString::from("pet.data")]);
}

#[test]
fn test_save_threshold() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pet.data");
    let mut store = PetStore::load(&path, 0.0).unwrap();

    assert!(!store.save_if_due(99.0).unwrap());
    assert!(store.save_if_due(100.0).unwrap());
    assert!(!store.save_if_due(150.0).unwrap());
    assert!(store.save_if_due(200.0).unwrap());
    assert_eq!(store.state().last_update, 200.0);
}

#[test]
fn test_unix_now_is_recent() {
    // 2020-01-01T00:00:00Z
    assert!(unix_now() > 1_577_836_800.0);
}
