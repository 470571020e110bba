use super::*;
use tempfile::tempdir;

#[test]
fn test_json_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let store = JsonFileStore::open(&path);
    assert_eq!(store.get("workspace.root"), None);
    store.set("workspace.root", "/ws").unwrap();
    store.set("workspace.selected_file", "/ws/a.md").unwrap();
    store.remove("workspace.selected_file").unwrap();

    let reopened = JsonFileStore::open(&path);
    assert_eq!(reopened.get("workspace.root").as_deref(), Some("/ws"));
    assert_eq!(reopened.get("workspace.selected_file"), None);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn test_json_store_ignores_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFileStore::open(&path);
    assert_eq!(store.get("workspace.root"), None);
    store.set("workspace.root", "/ws").unwrap();
    assert_eq!(
        JsonFileStore::open(&path).get("workspace.root").as_deref(),
        Some("/ws")
    );
}

#[test]
fn test_memory_store() {
    let store = MemoryStore::new().with_value("k", "v");
    assert_eq!(store.get("k").as_deref(), Some("v"));
    store.remove("k").unwrap();
    assert_eq!(store.get("k"), None);
}
