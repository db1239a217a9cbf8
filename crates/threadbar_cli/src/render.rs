use std::fmt::Write as _;
use threadbar_domain::{
    COLLAPSED_ROOT_LIMIT, LoadOlder, SidebarGroupModel, ThreadSectionModel, ThreadStatusLabel,
};

const INDENT: &str = "  ";

pub fn render_text(groups: &[SidebarGroupModel]) -> String {
    let mut out = String::new();
    for group in groups {
        let marker = if group.is_collapsed { "+" } else { "-" };
        let _ = write!(out, "[{marker}] {}", group.name);
        if group.connected {
            out.push_str(" (connected)");
        }
        out.push('\n');

        if group.is_collapsed {
            continue;
        }
        render_section(&mut out, &group.threads, 1);
        for worktree in &group.worktrees {
            let _ = writeln!(out, "{INDENT}@ {}", worktree.label);
            render_section(&mut out, worktree, 2);
        }
    }
    out
}

fn render_section(out: &mut String, section: &ThreadSectionModel, level: usize) {
    let base = INDENT.repeat(level);
    if !section.is_loaded {
        match &section.load_error {
            Some(message) => {
                let _ = writeln!(out, "{base}(failed to load: {message})");
            }
            None => {
                let _ = writeln!(out, "{base}(loading)");
            }
        }
        return;
    }
    if section.rows.is_empty() {
        let _ = writeln!(out, "{base}(no threads)");
    }

    for row in &section.rows {
        let _ = write!(out, "{base}{}{}", INDENT.repeat(row.depth), row.name);
        if row.status != ThreadStatusLabel::Ready {
            let _ = write!(out, " [{}]", row.status.as_str());
        }
        if let Some(age) = &row.age_label {
            let _ = write!(out, " {age}");
        }
        out.push('\n');
    }

    if section.has_more_roots {
        let shown = section.rows.iter().filter(|r| r.depth == 0).count();
        let hidden = section.total_roots.saturating_sub(shown);
        let _ = writeln!(out, "{base}More... ({hidden} more)");
    } else if section.is_expanded && section.total_roots > COLLAPSED_ROOT_LIMIT {
        let _ = writeln!(out, "{base}Show less");
    }

    match section.load_older {
        LoadOlder::Hidden => {}
        LoadOlder::Loading => {
            let _ = writeln!(out, "{base}Loading older...");
        }
        LoadOlder::Available => {
            let _ = writeln!(out, "{base}Load older...");
        }
    }
}
