use anyhow::Context as _;
use std::collections::HashMap;
use std::path::Path;
use threadbar_domain::{
    ParentLinks, ThreadId, ThreadListSource, ThreadPage, ThreadStatus, ThreadSummary, Workspace,
    WorkspaceId, WorkspaceKind, system_time_from_unix_seconds,
};

const UNTITLED_THREAD_NAME: &str = "Untitled thread";

/// On-disk picture of what the thread source and status source would report.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct SidebarSnapshot {
    #[serde(default)]
    pub workspaces: Vec<SnapshotWorkspace>,
    /// Owner id -> threads, newest first.
    #[serde(default)]
    pub threads: HashMap<String, Vec<SnapshotThread>>,
    #[serde(default)]
    pub statuses: HashMap<String, ThreadStatus>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct SnapshotWorkspace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: Option<u32>,
    #[serde(default)]
    pub connected: bool,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct SnapshotThread {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub updated_at: Option<u64>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl SidebarSnapshot {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("failed to parse sidebar snapshot")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid snapshot {}", path.display()))
    }

    pub fn thread_statuses(&self) -> HashMap<ThreadId, ThreadStatus> {
        self.statuses
            .iter()
            .map(|(id, status)| (ThreadId::new(id.as_str()), *status))
            .collect()
    }
}

impl SnapshotWorkspace {
    fn to_workspace(&self) -> Workspace {
        let parent_id = self
            .parent_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(WorkspaceId::new);
        Workspace {
            id: WorkspaceId::new(self.id.as_str()),
            name: self.name.clone(),
            kind: if parent_id.is_some() {
                WorkspaceKind::Worktree
            } else {
                WorkspaceKind::Main
            },
            parent_id,
            sort_order: self.sort_order,
            connected: self.connected,
        }
    }
}

impl SnapshotThread {
    fn to_summary(&self) -> ThreadSummary {
        let name = self.name.trim();
        ThreadSummary {
            id: ThreadId::new(self.id.as_str()),
            name: if name.is_empty() {
                UNTITLED_THREAD_NAME.to_owned()
            } else {
                name.to_owned()
            },
            updated_at: self.updated_at.map(system_time_from_unix_seconds),
        }
    }
}

/// Serves a snapshot in fixed-size pages. Cursors are offsets into the
/// owner's thread list.
pub struct SnapshotThreadSource {
    snapshot: SidebarSnapshot,
    page_size: usize,
}

impl SnapshotThreadSource {
    pub fn new(snapshot: SidebarSnapshot, page_size: usize) -> Self {
        Self {
            snapshot,
            page_size: page_size.max(1),
        }
    }

    pub fn snapshot(&self) -> &SidebarSnapshot {
        &self.snapshot
    }
}

impl ThreadListSource for SnapshotThreadSource {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, String> {
        Ok(self
            .snapshot
            .workspaces
            .iter()
            .map(SnapshotWorkspace::to_workspace)
            .collect())
    }

    fn list_threads(
        &self,
        owner: &WorkspaceId,
        cursor: Option<&str>,
    ) -> Result<ThreadPage, String> {
        let all = self
            .snapshot
            .threads
            .get(owner.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let start = match cursor {
            None => 0,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| format!("invalid cursor {raw:?} for {owner}"))?,
        };
        let start = start.min(all.len());
        let end = start.saturating_add(self.page_size).min(all.len());
        let page = &all[start..end];

        let parent_of: ParentLinks = page
            .iter()
            .filter_map(|thread| {
                let parent = thread.parent_id.as_deref()?.trim();
                (!parent.is_empty())
                    .then(|| (ThreadId::new(thread.id.as_str()), ThreadId::new(parent)))
            })
            .collect();

        Ok(ThreadPage {
            threads: page.iter().map(SnapshotThread::to_summary).collect(),
            parent_of,
            next_cursor: (end < all.len()).then(|| end.to_string()),
        })
    }
}
