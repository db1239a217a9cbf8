use crate::{ParentLinks, ThreadSummary, Workspace, WorkspaceId};
use std::sync::Mutex;

/// One page of a thread list, newest first, as returned by the thread source.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ThreadPage {
    pub threads: Vec<ThreadSummary>,
    pub parent_of: ParentLinks,
    pub next_cursor: Option<String>,
}

pub trait ThreadListSource: Send + Sync {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, String>;

    /// `cursor` is the opaque token from the previous page, `None` for the first page.
    fn list_threads(
        &self,
        owner: &WorkspaceId,
        cursor: Option<&str>,
    ) -> Result<ThreadPage, String>;
}

/// Storage for the collapsed-group set, kept as its serialized form.
pub trait CollapsedGroupStore: Send + Sync {
    fn load_collapsed_groups(&self) -> Result<Option<String>, String>;

    fn save_collapsed_groups(&self, serialized: &str) -> Result<(), String>;
}

#[derive(Debug, Default)]
pub struct MemoryCollapsedGroupStore {
    value: Mutex<Option<String>>,
}

impl MemoryCollapsedGroupStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            value: Mutex::new(initial),
        }
    }
}

impl CollapsedGroupStore for MemoryCollapsedGroupStore {
    fn load_collapsed_groups(&self) -> Result<Option<String>, String> {
        self.value
            .lock()
            .map(|value| value.clone())
            .map_err(|_| "collapsed group store poisoned".to_owned())
    }

    fn save_collapsed_groups(&self, serialized: &str) -> Result<(), String> {
        let mut value = self
            .value
            .lock()
            .map_err(|_| "collapsed group store poisoned".to_owned())?;
        *value = Some(serialized.to_owned());
        Ok(())
    }
}
