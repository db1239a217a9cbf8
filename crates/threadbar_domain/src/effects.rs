use crate::WorkspaceId;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    LoadWorkspaces,
    LoadCollapsedGroups,
    SaveCollapsedGroups { serialized: String },

    LoadThreads { owner: WorkspaceId },
    LoadOlderThreads { owner: WorkspaceId, cursor: String },
}
