use crate::ThreadId;
use std::collections::HashMap;

/// Activity flags reported by the status source for one thread.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThreadStatus {
    #[serde(default)]
    pub is_processing: bool,
    #[serde(default)]
    pub has_unread: bool,
    #[serde(default)]
    pub is_reviewing: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatusLabel {
    Reviewing,
    Processing,
    Unread,
    Ready,
}

impl ThreadStatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reviewing => "reviewing",
            Self::Processing => "processing",
            Self::Unread => "unread",
            Self::Ready => "ready",
        }
    }

    // Reviewing dominates activity, activity dominates unread.
    pub fn from_status(status: &ThreadStatus) -> Self {
        if status.is_reviewing {
            Self::Reviewing
        } else if status.is_processing {
            Self::Processing
        } else if status.has_unread {
            Self::Unread
        } else {
            Self::Ready
        }
    }
}

pub fn resolve_thread_status(
    thread_id: &ThreadId,
    statuses: &HashMap<ThreadId, ThreadStatus>,
) -> ThreadStatusLabel {
    statuses
        .get(thread_id)
        .map(ThreadStatusLabel::from_status)
        .unwrap_or(ThreadStatusLabel::Ready)
}
