use crate::WorkspaceId;
use std::collections::HashSet;

/// Thread lists currently in show-all mode, keyed by the workspace or worktree
/// that owns them. Lives only for the session.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExpandedThreadLists {
    owners: HashSet<WorkspaceId>,
}

impl ExpandedThreadLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, owner: &WorkspaceId) -> bool {
        self.owners.contains(owner)
    }

    /// Flips the flag for `owner` and returns the new value.
    pub fn toggle(&mut self, owner: &WorkspaceId) -> bool {
        if self.owners.remove(owner) {
            false
        } else {
            self.owners.insert(owner.clone());
            true
        }
    }

    pub fn set(&mut self, owner: &WorkspaceId, expanded: bool) {
        if expanded {
            self.owners.insert(owner.clone());
        } else {
            self.owners.remove(owner);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
