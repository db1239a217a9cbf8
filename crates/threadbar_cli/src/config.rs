use anyhow::anyhow;
use std::path::{Path, PathBuf};

pub const THREADBAR_ROOT_ENV: &str = "THREADBAR_ROOT";
pub const THREADBAR_DB_PATH_ENV: &str = "THREADBAR_DB_PATH";
pub const THREADBAR_PAGE_SIZE_ENV: &str = "THREADBAR_PAGE_SIZE";

pub const DEFAULT_PAGE_SIZE: usize = 20;

pub fn sqlite_path(root: &Path) -> PathBuf {
    root.join("threadbar.db")
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub page_size: usize,
}

impl CliConfig {
    /// Reads `THREADBAR_DB_PATH`, falling back to `$THREADBAR_ROOT/threadbar.db`
    /// and then `$HOME/.threadbar/threadbar.db`.
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = match non_empty_env(THREADBAR_DB_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => sqlite_path(&resolve_root()?),
        };

        let page_size = non_empty_env(THREADBAR_PAGE_SIZE_ENV)
            .and_then(|raw| match raw.parse::<usize>() {
                Ok(size) if size > 0 => Some(size),
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid {THREADBAR_PAGE_SIZE_ENV}");
                    None
                }
            })
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self { db_path, page_size })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var_os(key)
        .map(|v| v.to_string_lossy().trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn resolve_root() -> anyhow::Result<PathBuf> {
    if let Some(root) = std::env::var_os(THREADBAR_ROOT_ENV) {
        let root = root.to_string_lossy();
        let trimmed = root.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("{THREADBAR_ROOT_ENV} is set but empty"));
        }
        return Ok(PathBuf::from(trimmed));
    }

    let home = std::env::var_os("HOME").ok_or_else(|| anyhow!("HOME is not set"))?;
    Ok(PathBuf::from(home).join(".threadbar"))
}

#[cfg(test)]
mod tests {
    use super::*;

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    struct EnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
        prev: Vec<(&'static str, Option<std::ffi::OsString>)>,
    }

    impl EnvGuard {
        fn lock(keys: &[&'static str]) -> Self {
            let lock = ENV_LOCK.lock().expect("env lock poisoned");
            let prev = keys.iter().map(|key| (*key, std::env::var_os(key))).collect();
            Self { _lock: lock, prev }
        }

        fn set(&self, key: &'static str, value: &str) {
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&self, key: &'static str) {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, prev) in self.prev.drain(..) {
                unsafe {
                    match prev {
                        Some(prev) => std::env::set_var(key, prev),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const KEYS: &[&str] = &[
        THREADBAR_ROOT_ENV,
        THREADBAR_DB_PATH_ENV,
        THREADBAR_PAGE_SIZE_ENV,
    ];

    #[test]
    fn db_path_env_wins_over_root() {
        let env = EnvGuard::lock(KEYS);
        env.set(THREADBAR_ROOT_ENV, "/tmp/threadbar-root");
        env.set(THREADBAR_DB_PATH_ENV, "/tmp/custom.db");
        env.remove(THREADBAR_PAGE_SIZE_ENV);

        let config = CliConfig::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn root_env_places_db_inside_root() {
        let env = EnvGuard::lock(KEYS);
        env.set(THREADBAR_ROOT_ENV, " /tmp/threadbar-root ");
        env.remove(THREADBAR_DB_PATH_ENV);
        env.set(THREADBAR_PAGE_SIZE_ENV, "5");

        let config = CliConfig::from_env().unwrap();

        assert_eq!(
            config.db_path,
            PathBuf::from("/tmp/threadbar-root").join("threadbar.db")
        );
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn blank_root_is_an_error_and_bad_page_size_is_ignored() {
        let env = EnvGuard::lock(KEYS);
        env.set(THREADBAR_ROOT_ENV, "   ");
        env.remove(THREADBAR_DB_PATH_ENV);
        assert!(CliConfig::from_env().is_err());

        env.set(THREADBAR_DB_PATH_ENV, "/tmp/custom.db");
        env.set(THREADBAR_PAGE_SIZE_ENV, "0");
        assert_eq!(CliConfig::from_env().unwrap().page_size, DEFAULT_PAGE_SIZE);
    }
}
