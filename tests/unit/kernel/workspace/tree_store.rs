use super::*;

fn snapshot(extra: &str) -> TreeNode {
    TreeNode::root(
        "/ws",
        vec![
            TreeNode::file("/ws", "a.md"),
            TreeNode::dir(
                "/ws",
                "notes",
                vec![TreeNode::dir("/ws/notes", "deep", Vec::new())],
            ),
            TreeNode::file("/ws", extra),
        ],
    )
}

fn loaded() -> TreeStore {
    let mut store = TreeStore::new();
    let seq = store.begin_reload();
    store.apply(seq, snapshot("x.md")).unwrap();
    store
}

#[test]
fn test_latest_reload_wins_regardless_of_arrival_order() {
    let mut store = TreeStore::new();
    let first = store.begin_reload();
    let second = store.begin_reload();

    assert!(matches!(
        store.apply(second, snapshot("second.md")),
        Ok(Reload::Applied(_))
    ));
    assert_eq!(store.apply(first, snapshot("first.md")), Ok(Reload::Stale));

    assert!(store.node("/ws/second.md").is_some());
    assert!(store.node("/ws/first.md").is_none());
}

#[test]
fn test_reset_makes_in_flight_reload_stale() {
    let mut store = loaded();
    let seq = store.begin_reload();
    store.reset();
    assert_eq!(store.apply(seq, snapshot("late.md")), Ok(Reload::Stale));
    assert!(store.tree().is_none());
    assert!(store.rows().is_empty());
}

#[test]
fn test_malformed_tree_is_rejected_without_mutation() {
    let mut store = loaded();
    let seq = store.begin_reload();
    let bad = TreeNode::root(
        "/ws",
        vec![TreeNode::file("/ws", "a.md"), TreeNode::file("/ws", "a.md")],
    );
    assert!(store.apply(seq, bad).is_err());
    assert!(store.node("/ws/x.md").is_some());
}

#[test]
fn test_toggle_expand_only_for_directories() {
    let mut store = loaded();
    assert_eq!(store.toggle_expand("/ws/notes"), Some(true));
    assert!(store.is_expanded("/ws/notes"));
    assert_eq!(store.toggle_expand("/ws/notes"), Some(false));
    assert!(!store.is_expanded("/ws/notes"));

    assert_eq!(store.toggle_expand("/ws/a.md"), None);
    assert_eq!(store.toggle_expand("/ws/gone"), None);
    assert!(store.expanded().is_empty());
}

#[test]
fn test_expand_all_and_collapse_all() {
    let mut store = loaded();
    store.expand_all();
    assert_eq!(store.expanded().len(), 3);
    assert!(store.is_expanded("/ws/notes/deep"));

    let names: Vec<String> = store.rows().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["ws", "notes", "deep", "a.md", "x.md"]);

    store.collapse_all();
    assert!(store.expanded().is_empty());
    assert_eq!(store.rows().len(), 1);
}

#[test]
fn test_apply_prunes_vanished_expansions() {
    let mut store = loaded();
    store.expand_all();
    let seq = store.begin_reload();
    store
        .apply(seq, TreeNode::root("/ws", vec![TreeNode::file("/ws", "a.md")]))
        .unwrap();
    let mut expanded: Vec<&String> = store.expanded().iter().collect();
    expanded.sort();
    assert_eq!(expanded, vec!["/ws"]);
}

#[test]
fn test_rename_and_remove_paths() {
    let mut store = loaded();
    store.expand("/ws/notes");
    store.expand("/ws/notes/deep");
    store.set_selected(Some("/ws/notes/deep/n.md".into()));

    store.rename_paths("/ws/notes", "/ws/journal");
    assert_eq!(store.selected(), Some("/ws/journal/deep/n.md"));
    assert!(store.is_expanded("/ws/journal"));
    assert!(store.is_expanded("/ws/journal/deep"));
    assert!(!store.is_expanded("/ws/notes"));

    store.remove_paths("/ws/journal");
    assert_eq!(store.selected(), None);
    assert!(store.expanded().is_empty());
}

#[test]
fn test_remove_paths_keeps_unrelated_selection() {
    let mut store = loaded();
    store.set_selected(Some("/ws/a.md".into()));
    store.remove_paths("/ws/a");
    assert_eq!(store.selected(), Some("/ws/a.md"));
}
