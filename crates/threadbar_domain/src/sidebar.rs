use crate::time::unix_seconds;
use crate::{
    Action, CollapsedGroups, Effect, ExpandedThreadLists, LoadOlder, ParentLinks, ThreadId,
    ThreadListPage, ThreadStatus, ThreadStatusLabel, ThreadSummary, Workspace, WorkspaceId,
    build_thread_rows, format_relative_age, group_workspaces, resolve_thread_status,
    sort_workspaces,
};
use std::collections::{HashMap, HashSet};
use std::time::SystemTime;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ThreadList {
    pub threads: Vec<ThreadSummary>,
    pub parent_of: ParentLinks,
    pub page: ThreadListPage,
}

#[derive(Clone, Debug, Default)]
pub struct SidebarState {
    pub workspaces: Vec<Workspace>,
    pub thread_lists: HashMap<WorkspaceId, ThreadList>,
    /// First-page load failures, keyed by list owner. Cleared by a later load.
    pub load_errors: HashMap<WorkspaceId, String>,
    pub statuses: HashMap<ThreadId, ThreadStatus>,
    pub expanded_lists: ExpandedThreadLists,
    pub collapsed_groups: CollapsedGroups,
    pub last_error: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct SidebarThreadRow {
    pub id: ThreadId,
    pub name: String,
    pub depth: usize,
    pub status: ThreadStatusLabel,
    pub age_label: Option<String>,
    pub updated_at_unix_seconds: Option<u64>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct ThreadSectionModel {
    pub owner: WorkspaceId,
    pub label: String,
    pub is_loaded: bool,
    pub load_error: Option<String>,
    pub rows: Vec<SidebarThreadRow>,
    pub total_roots: usize,
    pub has_more_roots: bool,
    pub is_expanded: bool,
    pub load_older: LoadOlder,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct SidebarGroupModel {
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub connected: bool,
    pub is_collapsed: bool,
    pub threads: ThreadSectionModel,
    pub worktrees: Vec<ThreadSectionModel>,
}

fn dedup_threads(threads: Vec<ThreadSummary>) -> Vec<ThreadSummary> {
    let mut seen = HashSet::with_capacity(threads.len());
    threads
        .into_iter()
        .filter(|thread| seen.insert(thread.id.clone()))
        .collect()
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_list(&self, owner: &WorkspaceId) -> Option<&ThreadList> {
        self.thread_lists.get(owner)
    }

    fn has_workspace(&self, id: &WorkspaceId) -> bool {
        self.workspaces.iter().any(|w| &w.id == id)
    }

    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::AppStarted => vec![Effect::LoadCollapsedGroups, Effect::LoadWorkspaces],

            Action::WorkspacesLoaded { mut workspaces } => {
                sort_workspaces(&mut workspaces);
                let known: HashSet<&WorkspaceId> = workspaces.iter().map(|w| &w.id).collect();
                self.thread_lists.retain(|owner, _| known.contains(owner));
                self.load_errors.retain(|owner, _| known.contains(owner));

                let effects = workspaces
                    .iter()
                    .filter(|w| !self.thread_lists.contains_key(&w.id))
                    .map(|w| Effect::LoadThreads {
                        owner: w.id.clone(),
                    })
                    .collect();
                self.workspaces = workspaces;
                effects
            }
            Action::WorkspacesLoadFailed { message } => {
                tracing::warn!(%message, "failed to load workspaces");
                self.last_error = Some(message);
                Vec::new()
            }

            Action::ThreadsLoaded {
                owner,
                threads,
                parent_of,
                next_cursor,
            } => {
                if !self.has_workspace(&owner) {
                    tracing::debug!(%owner, "ignoring threads for unknown workspace");
                    return Vec::new();
                }
                self.load_errors.remove(&owner);
                self.thread_lists.insert(
                    owner,
                    ThreadList {
                        threads: dedup_threads(threads),
                        parent_of,
                        page: ThreadListPage {
                            next_cursor,
                            is_paging: false,
                        },
                    },
                );
                Vec::new()
            }
            Action::ThreadsLoadFailed { owner, message } => {
                tracing::warn!(%owner, %message, "failed to load threads");
                if self.has_workspace(&owner) && !self.thread_lists.contains_key(&owner) {
                    self.load_errors.insert(owner, message.clone());
                }
                self.last_error = Some(message);
                Vec::new()
            }
            Action::LoadOlderThreadsRequested { owner } => {
                let Some(list) = self.thread_lists.get_mut(&owner) else {
                    return Vec::new();
                };
                if list.page.load_older() != LoadOlder::Available {
                    return Vec::new();
                }
                let Some(cursor) = list.page.next_cursor.clone() else {
                    return Vec::new();
                };
                list.page.is_paging = true;
                vec![Effect::LoadOlderThreads { owner, cursor }]
            }
            Action::ThreadsPageLoaded {
                owner,
                threads,
                parent_of,
                next_cursor,
            } => {
                let Some(list) = self.thread_lists.get_mut(&owner) else {
                    tracing::debug!(%owner, "dropping thread page for unknown list");
                    return Vec::new();
                };
                let mut seen: HashSet<ThreadId> =
                    list.threads.iter().map(|t| t.id.clone()).collect();
                for thread in threads {
                    if seen.insert(thread.id.clone()) {
                        list.threads.push(thread);
                    }
                }
                for (child, parent) in parent_of {
                    list.parent_of.entry(child).or_insert(parent);
                }
                list.page = ThreadListPage {
                    next_cursor,
                    is_paging: false,
                };
                Vec::new()
            }
            Action::ThreadsPageFailed { owner, message } => {
                if let Some(list) = self.thread_lists.get_mut(&owner) {
                    list.page.is_paging = false;
                }
                tracing::warn!(%owner, %message, "failed to load older threads");
                self.last_error = Some(message);
                Vec::new()
            }

            Action::ThreadListExpansionToggled { owner } => {
                self.expanded_lists.toggle(&owner);
                Vec::new()
            }
            Action::GroupCollapseToggled { group_id } => {
                self.collapsed_groups.toggle(group_id.as_str());
                vec![Effect::SaveCollapsedGroups {
                    serialized: self.collapsed_groups.to_stored(),
                }]
            }
            Action::CollapsedGroupsLoaded { stored } => {
                self.collapsed_groups = CollapsedGroups::from_stored(stored.as_deref());
                Vec::new()
            }

            Action::ThreadStatusesUpdated { statuses } => {
                self.statuses = statuses;
                Vec::new()
            }
            Action::ThreadStatusChanged { thread_id, status } => {
                if status == ThreadStatus::default() {
                    self.statuses.remove(&thread_id);
                } else {
                    self.statuses.insert(thread_id, status);
                }
                Vec::new()
            }
        }
    }

    pub fn sidebar_model(&self, now: SystemTime) -> Vec<SidebarGroupModel> {
        group_workspaces(&self.workspaces)
            .into_iter()
            .map(|group| {
                let is_collapsed = self
                    .collapsed_groups
                    .is_collapsed(group.workspace.id.as_str());
                SidebarGroupModel {
                    workspace_id: group.workspace.id.clone(),
                    name: group.workspace.name.clone(),
                    connected: group.workspace.connected,
                    is_collapsed,
                    threads: self.thread_section(group.workspace, is_collapsed, now),
                    worktrees: group
                        .worktrees
                        .iter()
                        .map(|worktree| self.thread_section(worktree, is_collapsed, now))
                        .collect(),
                }
            })
            .collect()
    }

    /// Workspace and worktree thread lists both render through here.
    fn thread_section(
        &self,
        owner: &Workspace,
        hide_rows: bool,
        now: SystemTime,
    ) -> ThreadSectionModel {
        let is_expanded = self.expanded_lists.is_expanded(&owner.id);
        let Some(list) = self.thread_lists.get(&owner.id) else {
            return ThreadSectionModel {
                owner: owner.id.clone(),
                label: owner.name.clone(),
                is_loaded: false,
                load_error: self.load_errors.get(&owner.id).cloned(),
                rows: Vec::new(),
                total_roots: 0,
                has_more_roots: false,
                is_expanded,
                load_older: LoadOlder::Hidden,
            };
        };

        let built = build_thread_rows(&list.threads, &list.parent_of, is_expanded);
        let rows = if hide_rows {
            Vec::new()
        } else {
            built
                .rows
                .iter()
                .map(|row| SidebarThreadRow {
                    id: row.thread.id.clone(),
                    name: row.thread.name.clone(),
                    depth: row.depth,
                    status: resolve_thread_status(&row.thread.id, &self.statuses),
                    age_label: format_relative_age(row.thread.updated_at, now),
                    updated_at_unix_seconds: row.thread.updated_at.and_then(unix_seconds),
                })
                .collect()
        };

        ThreadSectionModel {
            owner: owner.id.clone(),
            label: owner.name.clone(),
            is_loaded: true,
            load_error: None,
            rows,
            total_roots: built.total_roots,
            has_more_roots: built.has_more_roots,
            is_expanded,
            load_older: list.page.load_older(),
        }
    }
}
