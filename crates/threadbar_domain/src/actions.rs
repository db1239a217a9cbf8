use crate::{ParentLinks, ThreadId, ThreadStatus, ThreadSummary, Workspace, WorkspaceId};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub enum Action {
    AppStarted,

    WorkspacesLoaded {
        workspaces: Vec<Workspace>,
    },
    WorkspacesLoadFailed {
        message: String,
    },

    ThreadsLoaded {
        owner: WorkspaceId,
        threads: Vec<ThreadSummary>,
        parent_of: ParentLinks,
        next_cursor: Option<String>,
    },
    ThreadsLoadFailed {
        owner: WorkspaceId,
        message: String,
    },
    LoadOlderThreadsRequested {
        owner: WorkspaceId,
    },
    ThreadsPageLoaded {
        owner: WorkspaceId,
        threads: Vec<ThreadSummary>,
        parent_of: ParentLinks,
        next_cursor: Option<String>,
    },
    ThreadsPageFailed {
        owner: WorkspaceId,
        message: String,
    },

    ThreadListExpansionToggled {
        owner: WorkspaceId,
    },
    GroupCollapseToggled {
        group_id: WorkspaceId,
    },
    CollapsedGroupsLoaded {
        stored: Option<String>,
    },

    ThreadStatusesUpdated {
        statuses: HashMap<ThreadId, ThreadStatus>,
    },
    ThreadStatusChanged {
        thread_id: ThreadId,
        status: ThreadStatus,
    },
}
