use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::SystemTime;
use threadbar_cli::config::CliConfig;
use threadbar_cli::render::render_text;
use threadbar_cli::snapshot::{SidebarSnapshot, SnapshotThreadSource};
use threadbar_cli::{load_older_pages, run_effects, start_sidebar};
use threadbar_domain::{Action, WorkspaceId};
use threadbar_store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "threadbar", about = "Workspace thread sidebar")]
struct Cli {
    /// SQLite database for persisted sidebar state. Overrides THREADBAR_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the sidebar built from a JSON snapshot.
    Render {
        snapshot: PathBuf,
        /// Show every root thread of this workspace or worktree.
        #[arg(long = "expand", value_name = "OWNER_ID")]
        expand: Vec<String>,
        #[arg(long)]
        expand_all: bool,
        /// Older pages to load for each thread list.
        #[arg(long, default_value_t = 0)]
        pages: usize,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Collapse or expand a sidebar group and remember the choice.
    ToggleGroup { group_id: String },
    /// List the groups that are currently collapsed.
    Collapsed,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = CliConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    tracing::debug!(db = %config.db_path.display(), "using sqlite store");
    let store = SqliteStore::new(config.db_path.clone())?;

    match cli.command {
        Command::Render {
            snapshot,
            expand,
            expand_all,
            pages,
            page_size,
            format,
        } => {
            let snapshot = SidebarSnapshot::load(&snapshot)?;
            let statuses = snapshot.thread_statuses();
            let source =
                SnapshotThreadSource::new(snapshot, page_size.unwrap_or(config.page_size));

            let mut state = start_sidebar(&source, &store);
            state.apply(Action::ThreadStatusesUpdated { statuses });
            load_older_pages(&mut state, pages, &source, &store);

            let owners: Vec<WorkspaceId> = if expand_all {
                state.workspaces.iter().map(|w| w.id.clone()).collect()
            } else {
                expand.iter().map(|id| WorkspaceId::new(id.trim())).collect()
            };
            for owner in &owners {
                state.expanded_lists.set(owner, true);
            }

            if let Some(err) = &state.last_error {
                tracing::warn!(error = %err, "sidebar rendered with errors");
            }

            let model = state.sidebar_model(SystemTime::now());
            match format {
                OutputFormat::Text => print!("{}", render_text(&model)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&model).context("failed to encode sidebar")?
                ),
            }
        }
        Command::ToggleGroup { group_id } => {
            let source = SnapshotThreadSource::new(SidebarSnapshot::default(), config.page_size);
            let mut state = start_sidebar(&source, &store);
            let group_id = WorkspaceId::new(group_id.trim());
            let effects = state.apply(Action::GroupCollapseToggled {
                group_id: group_id.clone(),
            });
            run_effects(&mut state, effects, &source, &store);

            let verb = if state.collapsed_groups.is_collapsed(group_id.as_str()) {
                "collapsed"
            } else {
                "expanded"
            };
            println!("{group_id} {verb}");
        }
        Command::Collapsed => {
            let source = SnapshotThreadSource::new(SidebarSnapshot::default(), config.page_size);
            let state = start_sidebar(&source, &store);
            for id in state.collapsed_groups.iter() {
                println!("{id}");
            }
        }
    }

    Ok(())
}
