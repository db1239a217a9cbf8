use std::collections::BTreeSet;

pub const COLLAPSED_GROUPS_STORAGE_KEY: &str = "sidebar_collapsed_groups";

const MAX_GROUP_ID_LEN: usize = 512;

/// Sidebar groups the user folded away. Unlike thread-list expansion this
/// survives restarts through [`crate::CollapsedGroupStore`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CollapsedGroups {
    ids: BTreeSet<String>,
}

impl CollapsedGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the stored JSON array. Anything unreadable yields an empty set.
    pub fn from_stored(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable collapsed groups");
                return Self::default();
            }
        };

        let Some(items) = value.as_array() else {
            tracing::warn!("ignoring collapsed groups that are not a list");
            return Self::default();
        };

        let ids = items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .filter(|id| id.len() <= MAX_GROUP_ID_LEN)
            .map(ToOwned::to_owned)
            .collect();
        Self { ids }
    }

    pub fn to_stored(&self) -> String {
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_owned())
    }

    pub fn is_collapsed(&self, group_id: &str) -> bool {
        self.ids.contains(group_id)
    }

    /// Flips the group and returns whether it is now collapsed.
    pub fn toggle(&mut self, group_id: &str) -> bool {
        if self.ids.remove(group_id) {
            false
        } else {
            self.ids.insert(group_id.to_owned());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
