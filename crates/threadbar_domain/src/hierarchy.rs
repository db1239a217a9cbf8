use crate::{ThreadId, ThreadSummary};
use std::collections::HashMap;

/// Number of root threads shown for a list that is not expanded.
pub const COLLAPSED_ROOT_LIMIT: usize = 3;

/// Child thread id -> parent thread id.
pub type ParentLinks = HashMap<ThreadId, ThreadId>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ThreadRow<'a> {
    pub thread: &'a ThreadSummary,
    pub depth: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ThreadRows<'a> {
    pub rows: Vec<ThreadRow<'a>>,
    pub total_roots: usize,
    pub has_more_roots: bool,
}

/// Flattens `threads` into display rows: each shown root followed by its
/// descendants in pre-order, children kept in input order.
///
/// A parent link only counts when it names another thread of the same
/// collection; anything else makes the thread a root. Threads that are only
/// reachable through a parent-link cycle are attached to the cycle member
/// that comes first in `threads`, which is then treated as a root.
pub fn build_thread_rows<'a>(
    threads: &'a [ThreadSummary],
    parent_of: &ParentLinks,
    expanded: bool,
) -> ThreadRows<'a> {
    let mut first_index: HashMap<&ThreadId, usize> = HashMap::with_capacity(threads.len());
    for (index, thread) in threads.iter().enumerate() {
        first_index.entry(&thread.id).or_insert(index);
    }

    let parent_index: Vec<Option<usize>> = threads
        .iter()
        .map(|thread| {
            parent_of
                .get(&thread.id)
                .filter(|parent| **parent != thread.id)
                .and_then(|parent| first_index.get(parent).copied())
        })
        .collect();

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); threads.len()];
    for (index, parent) in parent_index.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(index),
            None => roots.push(index),
        }
    }

    promote_cycle_roots(threads, &parent_index, &children, &mut roots);

    let total_roots = roots.len();
    let visible_root_count = if expanded {
        total_roots
    } else {
        COLLAPSED_ROOT_LIMIT
    };

    let mut rows = Vec::with_capacity(threads.len());
    let mut emitted = vec![false; threads.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for &root in roots.iter().take(visible_root_count) {
        stack.push((root, 0));
        while let Some((index, depth)) = stack.pop() {
            if std::mem::replace(&mut emitted[index], true) {
                continue;
            }
            rows.push(ThreadRow {
                thread: &threads[index],
                depth,
            });
            for &child in children[index].iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    ThreadRows {
        rows,
        total_roots,
        has_more_roots: total_roots > visible_root_count,
    }
}

fn promote_cycle_roots(
    threads: &[ThreadSummary],
    parent_index: &[Option<usize>],
    children: &[Vec<usize>],
    roots: &mut Vec<usize>,
) {
    let mut reached = vec![false; threads.len()];
    for &root in roots.iter() {
        mark_reachable(root, children, &mut reached);
    }

    let mut on_chain = vec![false; threads.len()];
    let mut promoted_any = false;
    for index in 0..threads.len() {
        if reached[index] {
            continue;
        }
        let promoted = cycle_entry(index, parent_index, &mut on_chain);
        tracing::debug!(
            thread_id = %threads[promoted].id,
            "parent links form a cycle, promoting thread to root"
        );
        mark_reachable(promoted, children, &mut reached);
        roots.push(promoted);
        promoted_any = true;
    }

    if promoted_any {
        roots.sort_unstable();
    }
}

fn mark_reachable(start: usize, children: &[Vec<usize>], reached: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(index) = stack.pop() {
        if std::mem::replace(&mut reached[index], true) {
            continue;
        }
        stack.extend(children[index].iter().copied());
    }
}

// Only called for unreachable threads, whose ancestor chain never ends at a
// root and therefore must loop. `on_chain` is all false on entry and on return.
fn cycle_entry(start: usize, parent_index: &[Option<usize>], on_chain: &mut [bool]) -> usize {
    let mut chain: Vec<usize> = Vec::new();
    let mut current = start;
    let entry = loop {
        if on_chain[current] {
            let cycle_start = chain
                .iter()
                .rposition(|&seen| seen == current)
                .unwrap_or_default();
            break chain[cycle_start..].iter().copied().min().unwrap_or(current);
        }
        on_chain[current] = true;
        chain.push(current);
        match parent_index[current] {
            Some(parent) => current = parent,
            None => break current,
        }
    };
    for &index in &chain {
        on_chain[index] = false;
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threads(ids: &[&str]) -> Vec<ThreadSummary> {
        ids.iter()
            .map(|id| ThreadSummary::new(*id, format!("Thread {id}")))
            .collect()
    }

    fn links(pairs: &[(&str, &str)]) -> ParentLinks {
        pairs
            .iter()
            .map(|(child, parent)| (ThreadId::from(*child), ThreadId::from(*parent)))
            .collect()
    }

    fn shape<'a>(rows: &ThreadRows<'a>) -> Vec<(&'a str, usize)> {
        rows.rows
            .iter()
            .map(|row| (row.thread.id.as_str(), row.depth))
            .collect()
    }

    #[test]
    fn truncates_to_first_three_roots_but_keeps_their_children() {
        let threads = threads(&["a", "b", "c", "d", "e"]);
        let parent_of = links(&[("b", "a")]);

        let out = build_thread_rows(&threads, &parent_of, false);

        assert_eq!(shape(&out), vec![("a", 0), ("b", 1), ("c", 0), ("d", 0)]);
        assert_eq!(out.total_roots, 4);
        assert!(out.has_more_roots);
    }

    #[test]
    fn empty_input_produces_no_rows() {
        let out = build_thread_rows(&[], &ParentLinks::new(), false);
        assert!(out.rows.is_empty());
        assert_eq!(out.total_roots, 0);
        assert!(!out.has_more_roots);
    }

    #[test]
    fn expansion_shows_every_root() {
        let threads = threads(&["a", "b", "c", "d", "e"]);

        let collapsed = build_thread_rows(&threads, &ParentLinks::new(), false);
        assert_eq!(collapsed.rows.len(), 3);
        assert_eq!(collapsed.total_roots, 5);
        assert!(collapsed.has_more_roots);

        let expanded = build_thread_rows(&threads, &ParentLinks::new(), true);
        assert_eq!(expanded.rows.len(), 5);
        assert_eq!(expanded.total_roots, 5);
        assert!(!expanded.has_more_roots);
    }

    #[test]
    fn exactly_three_roots_has_nothing_more() {
        let threads = threads(&["a", "b", "c"]);
        let out = build_thread_rows(&threads, &ParentLinks::new(), false);
        assert_eq!(out.rows.len(), 3);
        assert!(!out.has_more_roots);
    }

    #[test]
    fn root_cap_does_not_limit_descendants() {
        let threads = threads(&["a", "a1", "a2", "a3", "a4", "b"]);
        let parent_of = links(&[("a1", "a"), ("a2", "a"), ("a3", "a"), ("a4", "a")]);

        let out = build_thread_rows(&threads, &parent_of, false);

        assert_eq!(out.rows.len(), 6);
        assert_eq!(out.total_roots, 2);
        assert!(!out.has_more_roots);
    }

    #[test]
    fn children_follow_parent_in_pre_order_with_input_order_siblings() {
        let threads = threads(&["b2", "root", "b1", "b1x", "other"]);
        let parent_of = links(&[("b1", "root"), ("b2", "root"), ("b1x", "b1")]);

        let out = build_thread_rows(&threads, &parent_of, true);

        assert_eq!(
            shape(&out),
            vec![
                ("root", 0),
                ("b2", 1),
                ("b1", 1),
                ("b1x", 2),
                ("other", 0),
            ]
        );
    }

    #[test]
    fn dangling_and_self_links_become_roots() {
        let threads = threads(&["a", "b", "c"]);
        let parent_of = links(&[("a", "pruned"), ("b", "b"), ("c", "a")]);

        let out = build_thread_rows(&threads, &parent_of, true);

        assert_eq!(shape(&out), vec![("a", 0), ("c", 1), ("b", 0)]);
        assert_eq!(out.total_roots, 2);
    }

    #[test]
    fn parent_cycle_terminates_and_emits_each_thread_once() {
        let threads = threads(&["x", "a", "b", "c"]);
        let parent_of = links(&[("a", "b"), ("b", "a"), ("c", "b")]);

        let out = build_thread_rows(&threads, &parent_of, true);

        assert_eq!(shape(&out), vec![("x", 0), ("a", 0), ("b", 1), ("c", 2)]);
        assert_eq!(out.total_roots, 2);
    }

    #[test]
    fn descendant_of_cycle_listed_first_does_not_become_root() {
        let threads = threads(&["tail", "p", "q"]);
        let parent_of = links(&[("tail", "q"), ("p", "q"), ("q", "p")]);

        let out = build_thread_rows(&threads, &parent_of, true);

        assert_eq!(shape(&out), vec![("p", 0), ("q", 1), ("tail", 2)]);
        assert_eq!(out.total_roots, 1);
    }

    #[test]
    fn long_tail_into_cycle_emits_every_thread() {
        let count = 2000;
        let owned: Vec<String> = (0..count).map(|i| format!("n{i}")).collect();
        let ids: Vec<&str> = owned.iter().map(String::as_str).collect();
        let threads = threads(&ids);
        let mut parent_of: ParentLinks = (0..count - 1)
            .map(|i| (ThreadId::from(ids[i]), ThreadId::from(ids[i + 1])))
            .collect();
        parent_of.insert(ThreadId::from(ids[count - 1]), ThreadId::from(ids[count - 2]));

        let out = build_thread_rows(&threads, &parent_of, false);

        assert_eq!(out.rows.len(), count);
        assert_eq!(out.total_roots, 1);
        assert!(!out.has_more_roots);
        assert_eq!(out.rows[0].thread.id, ThreadId::from(ids[count - 2]));
        assert_eq!(out.rows[0].depth, 0);
    }

    #[test]
    fn depth_matches_nearest_true_parent() {
        let threads = threads(&["a", "b", "c", "d", "e", "f"]);
        let parent_of = links(&[("b", "a"), ("c", "b"), ("d", "a"), ("f", "e")]);

        let out = build_thread_rows(&threads, &parent_of, true);

        for (pos, row) in out.rows.iter().enumerate() {
            match parent_of.get(&row.thread.id) {
                None => assert_eq!(row.depth, 0),
                Some(parent) => {
                    let parent_row = out.rows[..pos]
                        .iter()
                        .rev()
                        .find(|r| &r.thread.id == parent)
                        .expect("parent precedes child");
                    assert_eq!(row.depth, parent_row.depth + 1);
                }
            }
        }
    }

    #[test]
    fn identical_inputs_produce_identical_rows() {
        let threads = threads(&["a", "b", "c", "d"]);
        let parent_of = links(&[("c", "a"), ("d", "c")]);

        let first = build_thread_rows(&threads, &parent_of, false);
        let second = build_thread_rows(&threads, &parent_of, false);

        assert_eq!(first, second);
    }
}
