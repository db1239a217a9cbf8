use crate::WorkspaceId;
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceKind {
    Main,
    Worktree,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub kind: WorkspaceKind,
    pub parent_id: Option<WorkspaceId>,
    pub sort_order: Option<u32>,
    pub connected: bool,
}

impl Workspace {
    pub fn main(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: WorkspaceId::new(id),
            name: name.into(),
            kind: WorkspaceKind::Main,
            parent_id: None,
            sort_order: None,
            connected: false,
        }
    }

    pub fn worktree(
        id: impl Into<String>,
        name: impl Into<String>,
        parent_id: impl Into<String>,
    ) -> Self {
        Self {
            id: WorkspaceId::new(id),
            name: name.into(),
            kind: WorkspaceKind::Worktree,
            parent_id: Some(WorkspaceId::new(parent_id)),
            sort_order: None,
            connected: false,
        }
    }
}

/// A top-level sidebar entry: one workspace and the worktrees checked out from it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkspaceGroup<'a> {
    pub workspace: &'a Workspace,
    pub worktrees: Vec<&'a Workspace>,
}

fn workspace_order(a: &Workspace, b: &Workspace) -> Ordering {
    let a_order = a.sort_order.unwrap_or(u32::MAX);
    let b_order = b.sort_order.unwrap_or(u32::MAX);
    a_order.cmp(&b_order).then_with(|| a.name.cmp(&b.name))
}

/// Explicit `sort_order` first (unset sorts last), then name.
pub fn sort_workspaces(list: &mut [Workspace]) {
    list.sort_by(workspace_order);
}

fn is_nested(workspace: &Workspace, parents: &HashSet<&WorkspaceId>) -> bool {
    workspace.kind == WorkspaceKind::Worktree
        && workspace
            .parent_id
            .as_ref()
            .is_some_and(|parent| parents.contains(parent))
}

/// Groups worktrees under their parent workspace. A worktree whose parent is
/// unknown gets a group of its own instead of disappearing.
pub fn group_workspaces(list: &[Workspace]) -> Vec<WorkspaceGroup<'_>> {
    let mut ordered: Vec<&Workspace> = list.iter().collect();
    ordered.sort_by(|a, b| workspace_order(a, b));

    let parents: HashSet<&WorkspaceId> = ordered
        .iter()
        .filter(|w| w.kind == WorkspaceKind::Main)
        .map(|w| &w.id)
        .collect();

    ordered
        .iter()
        .copied()
        .filter(|w| !is_nested(w, &parents))
        .map(|workspace| WorkspaceGroup {
            workspace,
            worktrees: ordered
                .iter()
                .copied()
                .filter(|w| {
                    is_nested(w, &parents) && w.parent_id.as_ref() == Some(&workspace.id)
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace(name: &str, sort_order: Option<u32>) -> Workspace {
        Workspace {
            sort_order,
            ..Workspace::main(name, name)
        }
    }

    #[test]
    fn sort_workspaces_orders_by_sort_then_name() {
        let mut items = vec![
            workspace("beta", None),
            workspace("alpha", None),
            workspace("delta", Some(2)),
            workspace("gamma", Some(1)),
        ];

        sort_workspaces(&mut items);

        let names: Vec<_> = items.into_iter().map(|item| item.name).collect();
        assert_eq!(names, vec!["gamma", "delta", "alpha", "beta"]);
    }

    #[test]
    fn worktrees_nest_under_their_parent() {
        let items = vec![
            Workspace::worktree("wt-b", "feature-b", "repo"),
            workspace("repo", None),
            Workspace::worktree("wt-a", "feature-a", "repo"),
            workspace("other", Some(0)),
        ];

        let groups = group_workspaces(&items);

        let shape: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|g| {
                (
                    g.workspace.name.as_str(),
                    g.worktrees.iter().map(|w| w.name.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            shape,
            vec![
                ("other", vec![]),
                ("repo", vec!["feature-a", "feature-b"]),
            ]
        );
    }

    #[test]
    fn orphan_worktree_becomes_its_own_group() {
        let items = vec![
            workspace("repo", None),
            Workspace::worktree("wt-x", "stray", "removed-repo"),
        ];

        let groups = group_workspaces(&items);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].workspace.name, "stray");
        assert!(groups[1].worktrees.is_empty());
    }
}
