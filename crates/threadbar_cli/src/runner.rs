use std::collections::VecDeque;
use threadbar_domain::{
    Action, CollapsedGroupStore, Effect, LoadOlder, SidebarState, ThreadListSource, WorkspaceId,
};

/// Executes effects against the collaborators, feeding their results back into
/// `state` until nothing is left to do.
pub fn run_effects(
    state: &mut SidebarState,
    effects: Vec<Effect>,
    source: &dyn ThreadListSource,
    store: &dyn CollapsedGroupStore,
) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let Some(action) = perform(effect, source, store) else {
            continue;
        };
        queue.extend(state.apply(action));
    }
}

fn perform(
    effect: Effect,
    source: &dyn ThreadListSource,
    store: &dyn CollapsedGroupStore,
) -> Option<Action> {
    match effect {
        Effect::LoadWorkspaces => Some(match source.list_workspaces() {
            Ok(workspaces) => Action::WorkspacesLoaded { workspaces },
            Err(message) => Action::WorkspacesLoadFailed { message },
        }),
        Effect::LoadCollapsedGroups => {
            let stored = store.load_collapsed_groups().unwrap_or_else(|message| {
                tracing::warn!(%message, "failed to load collapsed groups");
                None
            });
            Some(Action::CollapsedGroupsLoaded { stored })
        }
        Effect::SaveCollapsedGroups { serialized } => {
            if let Err(message) = store.save_collapsed_groups(&serialized) {
                tracing::warn!(%message, "failed to save collapsed groups");
            }
            None
        }
        Effect::LoadThreads { owner } => match source.list_threads(&owner, None) {
            Ok(page) => Some(Action::ThreadsLoaded {
                owner,
                threads: page.threads,
                parent_of: page.parent_of,
                next_cursor: page.next_cursor,
            }),
            Err(message) => Some(Action::ThreadsLoadFailed { owner, message }),
        },
        Effect::LoadOlderThreads { owner, cursor } => {
            tracing::debug!(%owner, %cursor, "loading older threads");
            Some(match source.list_threads(&owner, Some(&cursor)) {
                Ok(page) => Action::ThreadsPageLoaded {
                    owner,
                    threads: page.threads,
                    parent_of: page.parent_of,
                    next_cursor: page.next_cursor,
                },
                Err(message) => Action::ThreadsPageFailed { owner, message },
            })
        }
    }
}

/// Builds a sidebar from scratch the way the app does on launch.
pub fn start_sidebar(
    source: &dyn ThreadListSource,
    store: &dyn CollapsedGroupStore,
) -> SidebarState {
    let mut state = SidebarState::new();
    let effects = state.apply(Action::AppStarted);
    run_effects(&mut state, effects, source, store);
    state
}

/// Requests up to `pages` older pages for every list that still has a cursor.
pub fn load_older_pages(
    state: &mut SidebarState,
    pages: usize,
    source: &dyn ThreadListSource,
    store: &dyn CollapsedGroupStore,
) {
    for _ in 0..pages {
        let mut owners: Vec<WorkspaceId> = state
            .thread_lists
            .iter()
            .filter(|(_, list)| list.page.load_older() == LoadOlder::Available)
            .map(|(owner, _)| owner.clone())
            .collect();
        if owners.is_empty() {
            break;
        }
        owners.sort();
        for owner in owners {
            let effects = state.apply(Action::LoadOlderThreadsRequested { owner });
            run_effects(state, effects, source, store);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadbar_domain::{MemoryCollapsedGroupStore, ParentLinks, ThreadPage, Workspace};

    struct FailingSource;

    impl ThreadListSource for FailingSource {
        fn list_workspaces(&self) -> Result<Vec<Workspace>, String> {
            Ok(vec![Workspace::main("repo", "repo")])
        }

        fn list_threads(
            &self,
            _owner: &WorkspaceId,
            cursor: Option<&str>,
        ) -> Result<ThreadPage, String> {
            match cursor {
                None => Ok(ThreadPage {
                    threads: Vec::new(),
                    parent_of: ParentLinks::new(),
                    next_cursor: Some("older".to_owned()),
                }),
                Some(_) => Err("daemon disconnected".to_owned()),
            }
        }
    }

    #[test]
    fn failed_page_surfaces_error_and_keeps_cursor() {
        let store = MemoryCollapsedGroupStore::default();
        let mut state = start_sidebar(&FailingSource, &store);

        load_older_pages(&mut state, 1, &FailingSource, &store);

        assert_eq!(state.last_error.as_deref(), Some("daemon disconnected"));
        let list = state.thread_list(&WorkspaceId::from("repo")).unwrap();
        assert_eq!(list.page.load_older(), LoadOlder::Available);
    }

    struct DownSource;

    impl ThreadListSource for DownSource {
        fn list_workspaces(&self) -> Result<Vec<Workspace>, String> {
            Ok(vec![Workspace::main("repo", "repo")])
        }

        fn list_threads(
            &self,
            _owner: &WorkspaceId,
            _cursor: Option<&str>,
        ) -> Result<ThreadPage, String> {
            Err("daemon down".to_owned())
        }
    }

    #[test]
    fn failed_first_page_reaches_state() {
        let store = MemoryCollapsedGroupStore::default();
        let state = start_sidebar(&DownSource, &store);

        assert_eq!(state.last_error.as_deref(), Some("daemon down"));
        let model = state.sidebar_model(std::time::SystemTime::UNIX_EPOCH);
        assert!(!model[0].threads.is_loaded);
        assert_eq!(model[0].threads.load_error.as_deref(), Some("daemon down"));
    }

    #[test]
    fn collapse_toggle_is_written_to_store() {
        let store = MemoryCollapsedGroupStore::default();
        let mut state = start_sidebar(&FailingSource, &store);

        let effects = state.apply(Action::GroupCollapseToggled {
            group_id: WorkspaceId::from("repo"),
        });
        run_effects(&mut state, effects, &FailingSource, &store);

        assert_eq!(
            store.load_collapsed_groups().unwrap().as_deref(),
            Some(r#"["repo"]"#)
        );
    }
}
