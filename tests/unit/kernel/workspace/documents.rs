use super::*;
use crate::kernel::error::FsOp;
use crate::kernel::services::ports::FileError;

fn with_tabs(paths: &[&str]) -> DocumentSet {
    let mut set = DocumentSet::new();
    for path in paths {
        let rev = {
            set.open(path);
            set.mark_loading(path).unwrap()
        };
        set.finish_load(path, rev, Ok(format!("content of {path}")));
    }
    set
}

#[test]
fn test_open_appends_once_and_activates() {
    let mut set = DocumentSet::new();
    let doc = set.open("/ws/a.md");
    assert_eq!(doc.load, LoadState::Unloaded);
    assert!(!doc.is_dirty);
    assert!(doc.content.is_empty());

    set.open("/ws/b.md");
    set.open("/ws/a.md");
    assert_eq!(set.order(), ["/ws/a.md", "/ws/b.md"]);
    assert_eq!(set.active(), Some("/ws/a.md"));
}

#[test]
fn test_edit_sets_dirty_and_requires_open() {
    let mut set = with_tabs(&["/ws/a.md"]);
    set.edit("/ws/a.md", "x".into()).unwrap();
    set.edit("/ws/a.md", "x".into()).unwrap();
    let doc = set.get("/ws/a.md").unwrap();
    assert!(doc.is_dirty);
    assert_eq!(doc.revision, 2);

    assert_eq!(
        set.edit("/ws/nope.md", "x".into()),
        Err(WorkspaceError::NotOpen {
            path: "/ws/nope.md".into()
        })
    );
}

#[test]
fn test_finish_save_respects_later_edits() {
    let mut set = with_tabs(&["/ws/a.md"]);
    set.edit("/ws/a.md", "one".into()).unwrap();
    let rev = set.get("/ws/a.md").unwrap().revision;
    set.edit("/ws/a.md", "two".into()).unwrap();

    assert!(!set.finish_save("/ws/a.md", rev));
    assert!(set.get("/ws/a.md").unwrap().is_dirty);

    let rev = set.get("/ws/a.md").unwrap().revision;
    assert!(set.finish_save("/ws/a.md", rev));
    assert!(!set.get("/ws/a.md").unwrap().is_dirty);
}

#[test]
fn test_load_failure_leaves_empty_clean_tab() {
    let mut set = DocumentSet::new();
    set.open("/ws/a.md");
    let rev = set.mark_loading("/ws/a.md").unwrap();
    let err = WorkspaceError::io(
        FsOp::ReadFile,
        "/ws/a.md",
        FileError::NotFound("/ws/a.md".into()),
    );
    assert!(set.finish_load("/ws/a.md", rev, Err(err.clone())));

    let doc = set.get("/ws/a.md").unwrap();
    assert_eq!(doc.load, LoadState::Failed(err));
    assert!(doc.content.is_empty());
    assert!(!doc.is_dirty);
    assert_eq!(set.order(), ["/ws/a.md"]);
}

#[test]
fn test_load_does_not_overwrite_edits_or_closed_docs() {
    let mut set = DocumentSet::new();
    set.open("/ws/a.md");
    let rev = set.mark_loading("/ws/a.md").unwrap();
    set.edit("/ws/a.md", "typed".into()).unwrap();
    assert!(!set.finish_load("/ws/a.md", rev, Ok("disk".into())));
    assert_eq!(set.get("/ws/a.md").unwrap().content, "typed");
    assert!(set.get("/ws/a.md").unwrap().is_dirty);

    set.open("/ws/b.md");
    let rev = set.mark_loading("/ws/b.md").unwrap();
    set.close("/ws/b.md");
    assert!(!set.finish_load("/ws/b.md", rev, Ok("disk".into())));
    assert!(!set.contains("/ws/b.md"));
}

#[test]
fn test_close_active_prefers_left_neighbor() {
    let mut set = with_tabs(&["/a", "/b", "/c"]);
    set.open("/b");
    set.edit("/b", "unsaved".into()).unwrap();
    assert!(set.close("/b"));
    assert_eq!(set.active(), Some("/a"));
    assert_eq!(set.order(), ["/a", "/c"]);

    set.open("/a");
    set.close("/a");
    assert_eq!(set.active(), Some("/c"));

    set.close("/c");
    assert_eq!(set.active(), None);
    assert!(set.is_empty());
    assert!(!set.close("/c"));
}

#[test]
fn test_close_inactive_keeps_active() {
    let mut set = with_tabs(&["/a", "/b", "/c"]);
    set.close("/a");
    assert_eq!(set.active(), Some("/c"));
}

#[test]
fn test_rename_within_rekeys_subtree() {
    let mut set = with_tabs(&["/ws/notes/a.md", "/ws/b.md", "/ws/notes/deep/c.md"]);
    set.open("/ws/notes/deep/c.md");
    set.edit("/ws/notes/a.md", "edited".into()).unwrap();

    assert_eq!(set.rename_within("/ws/notes", "/ws/journal"), 2);
    assert_eq!(
        set.order(),
        ["/ws/journal/a.md", "/ws/b.md", "/ws/journal/deep/c.md"]
    );
    assert_eq!(set.active(), Some("/ws/journal/deep/c.md"));
    let doc = set.get("/ws/journal/a.md").unwrap();
    assert_eq!(doc.path, "/ws/journal/a.md");
    assert_eq!(doc.content, "edited");
    assert!(doc.is_dirty);
    assert!(!set.contains("/ws/notes/a.md"));
}

#[test]
fn test_dirty_document_is_not_fetched_again() {
    let mut set = DocumentSet::new();
    set.open("/ws/a.md");
    let rev = set.mark_loading("/ws/a.md").unwrap();
    let err = WorkspaceError::io(
        FsOp::ReadFile,
        "/ws/a.md",
        FileError::NotFound("/ws/a.md".into()),
    );
    set.finish_load("/ws/a.md", rev, Err(err));
    set.edit("/ws/a.md", "typed".into()).unwrap();

    assert_eq!(set.mark_loading("/ws/a.md"), None);
    assert_eq!(set.get("/ws/a.md").unwrap().content, "typed");
}

#[test]
fn test_rename_within_closes_tabs_at_destination() {
    let mut set = with_tabs(&["/ws/b.md", "/ws/a.md", "/ws/dir/x.md", "/ws/c.md"]);
    set.open("/ws/b.md");

    assert_eq!(set.rename_within("/ws/a.md", "/ws/b.md"), 1);
    assert_eq!(set.order(), ["/ws/b.md", "/ws/dir/x.md", "/ws/c.md"]);
    assert_eq!(set.get("/ws/b.md").unwrap().content, "content of /ws/a.md");
    assert_eq!(set.active(), Some("/ws/b.md"));

    assert_eq!(set.rename_within("/ws/c.md", "/ws/dir"), 1);
    assert_eq!(set.order(), ["/ws/b.md", "/ws/dir"]);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_close_within_closes_subtree() {
    let mut set = with_tabs(&["/ws/a.md", "/ws/notes/x.md", "/ws/notes/y.md"]);
    let closed = set.close_within("/ws/notes");
    assert_eq!(closed, vec!["/ws/notes/x.md", "/ws/notes/y.md"]);
    assert_eq!(set.order(), ["/ws/a.md"]);
    assert_eq!(set.active(), Some("/ws/a.md"));
}

#[test]
fn test_restore_does_not_activate() {
    let mut set = DocumentSet::new();
    set.restore("/ws/a.md");
    set.restore("/ws/a.md");
    assert_eq!(set.len(), 1);
    assert_eq!(set.active(), None);
    set.set_active(Some("/ws/missing.md".into()));
    assert_eq!(set.active(), None);
    set.set_active(Some("/ws/a.md".into()));
    assert_eq!(set.active(), Some("/ws/a.md"));
}
