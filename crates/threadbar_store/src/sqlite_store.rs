use anyhow::{Context as _, anyhow};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use threadbar_domain::{COLLAPSED_GROUPS_STORAGE_KEY, CollapsedGroupStore};

const LATEST_SCHEMA_VERSION: u32 = 1;

const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/migrations/0001_sidebar_state.sql"
    )),
)];

/// Persisted sidebar state in a SQLite file. The connection lives on a
/// dedicated worker thread; clones of the handle share it.
#[derive(Clone)]
pub struct SqliteStore {
    tx: mpsc::Sender<DbCommand>,
}

enum DbCommand {
    LoadCollapsedGroups {
        reply: mpsc::Sender<anyhow::Result<Option<String>>>,
    },
    SaveCollapsedGroups {
        serialized: String,
        reply: mpsc::Sender<anyhow::Result<()>>,
    },
}

impl DbCommand {
    fn fail(self, message: String) {
        match self {
            DbCommand::LoadCollapsedGroups { reply } => {
                let _ = reply.send(Err(anyhow!(message)));
            }
            DbCommand::SaveCollapsedGroups { reply, .. } => {
                let _ = reply.send(Err(anyhow!(message)));
            }
        }
    }
}

impl SqliteStore {
    pub fn new(db_path: PathBuf) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel::<DbCommand>();

        std::thread::Builder::new()
            .name("threadbar-sqlite".to_owned())
            .spawn(move || {
                let db = SidebarDb::open(&db_path);
                if let Err(err) = &db {
                    tracing::error!(path = %db_path.display(), "failed to open sqlite db: {err:#}");
                }
                while let Ok(cmd) = rx.recv() {
                    let db = match &db {
                        Ok(db) => db,
                        Err(err) => {
                            cmd.fail(format!("sqlite db is unavailable: {err:#}"));
                            continue;
                        }
                    };
                    match cmd {
                        DbCommand::LoadCollapsedGroups { reply } => {
                            let _ = reply.send(db.read(COLLAPSED_GROUPS_STORAGE_KEY));
                        }
                        DbCommand::SaveCollapsedGroups { serialized, reply } => {
                            let result = db.write(COLLAPSED_GROUPS_STORAGE_KEY, &serialized);
                            let _ = reply.send(result);
                        }
                    }
                }
            })
            .context("failed to spawn sqlite worker")?;

        Ok(Self { tx })
    }

    fn request<T>(
        &self,
        command: impl FnOnce(mpsc::Sender<anyhow::Result<T>>) -> DbCommand,
    ) -> anyhow::Result<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(command(reply_tx))
            .context("sqlite worker is not running")?;
        reply_rx.recv().context("sqlite worker terminated")?
    }
}

impl CollapsedGroupStore for SqliteStore {
    fn load_collapsed_groups(&self) -> Result<Option<String>, String> {
        self.request(|reply| DbCommand::LoadCollapsedGroups { reply })
            .map_err(|err| format!("{err:#}"))
    }

    fn save_collapsed_groups(&self, serialized: &str) -> Result<(), String> {
        self.request(|reply| DbCommand::SaveCollapsedGroups {
            serialized: serialized.to_owned(),
            reply,
        })
        .map_err(|err| format!("{err:#}"))
    }
}

struct SidebarDb {
    conn: Connection,
}

impl SidebarDb {
    fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut conn = Connection::open(db_path)
            .with_context(|| format!("failed to open sqlite db {}", db_path.display()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to apply sqlite PRAGMAs")?;
        migrate(&mut conn).context("failed to apply sqlite migrations")?;

        Ok(Self { conn })
    }

    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM sidebar_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read sidebar state {key}"))
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO sidebar_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = CAST(strftime('%s', 'now') AS INTEGER)",
                params![key, value],
            )
            .with_context(|| format!("failed to write sidebar state {key}"))?;
        Ok(())
    }
}

fn migrate(conn: &mut Connection) -> anyhow::Result<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;
    anyhow::ensure!(
        version <= LATEST_SCHEMA_VERSION,
        "sqlite schema v{version} is newer than this build (v{LATEST_SCHEMA_VERSION})"
    );

    let pending = MIGRATIONS.iter().filter(|(target, _)| *target > version);
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("failed to begin migration transaction")?;
    for &(target, sql) in pending {
        tx.execute_batch(sql)
            .with_context(|| format!("failed to apply migration v{target:04}"))?;
        tx.pragma_update(None, "user_version", target)
            .context("failed to update user_version")?;
        tracing::debug!(version = target, "applied sqlite migration");
    }
    tx.commit().context("failed to commit migrations")
}
