//! Workspace core: one root directory mirrored as a tree, plus the documents
//! open from it.
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`; filesystem calls are the only suspension points. Every result that
//! arrives after a suspension is checked against the root epoch (bumped on each
//! root change) and dropped if the root moved on meanwhile.

pub mod documents;
mod mutation;
pub mod tree_store;

pub use documents::{Document, DocumentSet, LoadState};
pub use mutation::EntryKind;
pub use tree_store::{Reload, TreeStore};

use crate::kernel::error::{FsOp, WorkspaceError};
use crate::kernel::services::ports::{
    decode_path_list, encode_path_list, FileSystem, KeyValueStore, WorkspaceConfig,
    OPEN_FILES_KEY, ROOT_KEY, SELECTED_FILE_KEY,
};
use crate::models::{is_strictly_within, normalize_path, FileTreeRow, NodeKind, TreeNode};
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

type LoadOutcome = Result<(), WorkspaceError>;

pub struct Workspace {
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn KeyValueStore>,
    config: WorkspaceConfig,
    state: Mutex<WorkspaceState>,
}

#[derive(Default)]
struct WorkspaceState {
    root: Option<String>,
    epoch: u64,
    tree: TreeStore,
    documents: DocumentSet,
    /// In-flight content fetches by path; later `open` calls join these.
    loads: FxHashMap<String, watch::Receiver<Option<LoadOutcome>>>,
}

impl WorkspaceState {
    fn switch_root(&mut self, root: String) {
        self.epoch += 1;
        self.root = Some(root);
        self.tree.reset();
        self.documents.clear();
        self.loads.clear();
    }

    fn session(&self) -> Session {
        Session {
            open: self.documents.order().to_vec(),
            selected: self.tree.selected().map(str::to_string),
        }
    }
}

/// Open tabs and selection as they are written to the key-value store.
struct Session {
    open: Vec<String>,
    selected: Option<String>,
}

enum LoadPlan {
    Resident,
    Join(watch::Receiver<Option<LoadOutcome>>),
    Fetch {
        tx: watch::Sender<Option<LoadOutcome>>,
        epoch: u64,
        revision: u64,
    },
}

impl Workspace {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn KeyValueStore>,
        config: WorkspaceConfig,
    ) -> Self {
        Self {
            fs,
            store,
            config,
            state: Mutex::new(WorkspaceState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WorkspaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ---- Workspace Controller ----

    /// Establishes the root at startup: the persisted one if any, else the
    /// filesystem's default folder. Restores the previous session's tabs and
    /// selection when they lie under that root.
    pub async fn load_initial_root(&self) -> Result<String, WorkspaceError> {
        let root = match self.store.get(ROOT_KEY) {
            Some(persisted) => normalize_path(&persisted),
            None => {
                let default = self
                    .fs
                    .root_folder()
                    .await
                    .map_err(|e| WorkspaceError::io(FsOp::RootFolder, "", e))?;
                normalize_path(&default)
            }
        };

        let (session, active) = {
            let mut st = self.lock();
            st.switch_root(root.clone());
            if self.config.restore_session {
                self.restore_session(&mut st, &root);
            }
            (st.session(), st.documents.active().map(str::to_string))
        };
        tracing::info!(root = %root, restored = session.open.len(), "workspace root loaded");
        self.persist(ROOT_KEY, Some(&root));
        self.persist_session(&session);

        self.reload().await?;

        if let Some(active) = active {
            if let Err(e) = self.open(&active).await {
                tracing::warn!(path = %active, error = %e, "restored document failed to load");
            }
        }
        Ok(root)
    }

    fn restore_session(&self, st: &mut WorkspaceState, root: &str) {
        let open = self
            .store
            .get(OPEN_FILES_KEY)
            .map(|value| decode_path_list(&value))
            .unwrap_or_default();
        for path in open {
            let path = normalize_path(&path);
            if is_strictly_within(&path, root) {
                st.documents.restore(&path);
            } else {
                tracing::debug!(path = %path, "skipping restored file outside root");
            }
        }

        let selected = self
            .store
            .get(SELECTED_FILE_KEY)
            .map(|value| normalize_path(&value))
            .filter(|path| is_strictly_within(path, root));
        if let Some(selected) = &selected {
            st.documents.restore(selected);
        }
        let active = selected
            .clone()
            .or_else(|| st.documents.order().last().cloned());
        st.tree.set_selected(selected);
        st.documents.set_active(active);
    }

    /// Switches to a new root after checking it is a directory. Every open
    /// document and the whole selection state are dropped.
    pub async fn set_root(&self, path: &str) -> Result<(), WorkspaceError> {
        let path = normalize_path(path);
        match self.fs.stat(&path).await {
            Ok(NodeKind::Dir) => {}
            Ok(NodeKind::File) => {
                return Err(WorkspaceError::InvalidRoot {
                    path,
                    reason: "not a directory".to_string(),
                })
            }
            Err(e) => {
                return Err(WorkspaceError::InvalidRoot {
                    path,
                    reason: e.to_string(),
                })
            }
        }

        let session = {
            let mut st = self.lock();
            st.switch_root(path.clone());
            st.session()
        };
        tracing::info!(root = %path, "workspace root changed");
        self.persist(ROOT_KEY, Some(&path));
        self.persist_session(&session);

        self.reload().await.map(|_| ())
    }

    /// Fetches the full tree of the current root and swaps it in, unless a
    /// newer reload or a root change overtook it.
    pub async fn reload(&self) -> Result<Reload, WorkspaceError> {
        let (root, seq, epoch) = {
            let mut st = self.lock();
            let root = st.root.clone().ok_or(WorkspaceError::NoRoot)?;
            (root, st.tree.begin_reload(), st.epoch)
        };
        tracing::debug!(root = %root, seq, "reload issued");

        let tree = self
            .fs
            .file_tree(&root)
            .await
            .map_err(|e| WorkspaceError::io(FsOp::GetFileTree, &root, e))?;

        let mut st = self.lock();
        if st.epoch != epoch {
            tracing::debug!(root = %root, seq, "root changed during reload");
            return Ok(Reload::Stale);
        }
        st.tree.apply(seq, tree).map_err(|e| {
            tracing::warn!(root = %root, error = %e, "rejecting malformed tree");
            WorkspaceError::MalformedTree { path: root.clone() }
        })
    }

    // ---- Selection ----

    /// A directory toggles its expansion; a file becomes the selection and is
    /// opened.
    pub async fn select(&self, path: &str) -> Result<(), WorkspaceError> {
        let path = normalize_path(path);
        let session = {
            let mut st = self.lock();
            let is_dir = match st.tree.node(&path) {
                Some(node) => node.is_dir,
                None => return Err(WorkspaceError::StaleReference { path }),
            };
            if is_dir {
                st.tree.toggle_expand(&path);
                return Ok(());
            }
            st.tree.set_selected(Some(path.clone()));
            st.session()
        };
        self.persist_session(&session);
        self.open(&path).await
    }

    pub fn toggle_expand(&self, path: &str) -> Result<bool, WorkspaceError> {
        let path = normalize_path(path);
        let mut st = self.lock();
        match st.tree.node(&path).map(|node| node.is_dir) {
            None => Err(WorkspaceError::StaleReference { path }),
            Some(false) => Ok(false),
            Some(true) => Ok(st.tree.toggle_expand(&path).unwrap_or(false)),
        }
    }

    pub fn expand_all(&self) {
        self.lock().tree.expand_all();
    }

    pub fn collapse_all(&self) {
        self.lock().tree.collapse_all();
    }

    // ---- Document Set ----

    /// Opens (or re-activates) a document and makes sure its content is
    /// resident. A concurrent `open` of the same path joins the fetch already
    /// in flight instead of reading the file again.
    pub async fn open(&self, path: &str) -> Result<(), WorkspaceError> {
        let path = normalize_path(path);
        loop {
            let (plan, session) = {
                let mut st = self.lock();
                if st.root.is_none() {
                    return Err(WorkspaceError::NoRoot);
                }
                let added = !st.documents.contains(&path);
                // Unsaved edits are the resident content even if the last
                // fetch failed or never ran.
                let resident = {
                    let doc = st.documents.open(&path);
                    doc.is_loaded() || doc.is_dirty
                };
                let session = added.then(|| st.session());
                let live = st
                    .loads
                    .get(&path)
                    .filter(|rx| rx.has_changed().is_ok())
                    .cloned();
                let plan = if let Some(rx) = live {
                    LoadPlan::Join(rx)
                } else if resident {
                    LoadPlan::Resident
                } else {
                    match st.documents.mark_loading(&path) {
                        Some(revision) => {
                            let (tx, rx) = watch::channel(None);
                            st.loads.insert(path.clone(), rx);
                            LoadPlan::Fetch {
                                tx,
                                epoch: st.epoch,
                                revision,
                            }
                        }
                        None => LoadPlan::Resident,
                    }
                };
                (plan, session)
            };
            if let Some(session) = session {
                self.persist_session(&session);
            }

            match plan {
                LoadPlan::Resident => return Ok(()),
                LoadPlan::Join(mut rx) => {
                    tracing::debug!(path = %path, "joining in-flight load");
                    let joined = rx
                        .wait_for(|outcome| outcome.is_some())
                        .await
                        .ok()
                        .and_then(|outcome| outcome.clone());
                    match joined {
                        Some(outcome) => return outcome,
                        // The loading caller went away before finishing.
                        None => continue,
                    }
                }
                LoadPlan::Fetch {
                    tx,
                    epoch,
                    revision,
                } => return self.fetch(&path, tx, epoch, revision).await,
            }
        }
    }

    async fn fetch(
        &self,
        path: &str,
        tx: watch::Sender<Option<LoadOutcome>>,
        epoch: u64,
        revision: u64,
    ) -> LoadOutcome {
        let result = self
            .fs
            .read_file(path)
            .await
            .map_err(|e| WorkspaceError::io(FsOp::ReadFile, path, e));
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());

        {
            let mut st = self.lock();
            if st
                .loads
                .get(path)
                .is_some_and(|rx| rx.same_channel(&tx.subscribe()))
            {
                st.loads.remove(path);
            }
            if st.epoch == epoch {
                st.documents.finish_load(path, revision, result);
            } else {
                tracing::debug!(path, "root changed during load, discarding");
            }
        }
        if let Err(e) = &outcome {
            tracing::warn!(path, error = %e, "document load failed");
        }
        tx.send_replace(Some(outcome.clone()));
        outcome
    }

    pub fn edit(&self, path: &str, content: impl Into<String>) -> Result<(), WorkspaceError> {
        let path = normalize_path(path);
        self.lock().documents.edit(&path, content.into())
    }

    /// Closes a tab without saving. Returns `false` if it was not open.
    pub fn close(&self, path: &str) -> bool {
        let path = normalize_path(path);
        let (closed, session) = {
            let mut st = self.lock();
            (st.documents.close(&path), st.session())
        };
        if closed {
            self.persist_session(&session);
        }
        closed
    }

    // ---- Snapshots ----

    pub fn root(&self) -> Option<String> {
        self.lock().root.clone()
    }

    pub fn tree(&self) -> Option<Arc<TreeNode>> {
        self.lock().tree.tree().cloned()
    }

    pub fn node(&self, path: &str) -> Option<TreeNode> {
        self.lock().tree.node(&normalize_path(path)).cloned()
    }

    pub fn rows(&self) -> Vec<FileTreeRow> {
        self.lock().tree.rows()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.lock().tree.is_expanded(&normalize_path(path))
    }

    pub fn selected(&self) -> Option<String> {
        self.lock().tree.selected().map(str::to_string)
    }

    pub fn open_paths(&self) -> Vec<String> {
        self.lock().documents.order().to_vec()
    }

    pub fn active(&self) -> Option<String> {
        self.lock().documents.active().map(str::to_string)
    }

    pub fn document(&self, path: &str) -> Option<Document> {
        self.lock().documents.get(&normalize_path(path)).cloned()
    }

    // ---- Persistence ----

    fn persist(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "failed to persist workspace state");
        }
    }

    fn persist_session(&self, session: &Session) {
        self.persist(OPEN_FILES_KEY, Some(&encode_path_list(&session.open)));
        self.persist(SELECTED_FILE_KEY, session.selected.as_deref());
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/workspace.rs"]
mod tests;
