mod ids;
pub use ids::{ThreadId, WorkspaceId};

mod thread;
pub use thread::ThreadSummary;

mod hierarchy;
pub use hierarchy::{COLLAPSED_ROOT_LIMIT, ParentLinks, ThreadRow, ThreadRows, build_thread_rows};

mod expansion;
pub use expansion::ExpandedThreadLists;

mod status;
pub use status::{ThreadStatus, ThreadStatusLabel, resolve_thread_status};

mod pagination;
pub use pagination::{LoadOlder, ThreadListPage};

mod collapsed_groups;
pub use collapsed_groups::{COLLAPSED_GROUPS_STORAGE_KEY, CollapsedGroups};

mod time;
pub use time::{format_relative_age, system_time_from_unix_seconds};

mod workspace;
pub use workspace::{Workspace, WorkspaceGroup, WorkspaceKind, group_workspaces, sort_workspaces};

mod adapters;
pub use adapters::{CollapsedGroupStore, MemoryCollapsedGroupStore, ThreadListSource, ThreadPage};

mod actions;
pub use actions::Action;
mod effects;
pub use effects::Effect;

mod sidebar;
pub use sidebar::{
    SidebarGroupModel, SidebarState, SidebarThreadRow, ThreadList, ThreadSectionModel,
};
