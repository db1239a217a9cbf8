use crate::ThreadId;
use std::time::SystemTime;

/// Read-only snapshot of a conversation thread as reported by the thread source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThreadSummary {
    pub id: ThreadId,
    pub name: String,
    pub updated_at: Option<SystemTime>,
}

impl ThreadSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ThreadId::new(id),
            name: name.into(),
            updated_at: None,
        }
    }

    pub fn with_updated_at(mut self, updated_at: SystemTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }
}
