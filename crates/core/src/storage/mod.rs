//! SQLite storage for client-side settings and the admin session token

mod migrations;
mod settings;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use directories::ProjectDirs;
use rusqlite::Connection;
use tracing::{debug, instrument};

use crate::error::Result;

pub use settings::SettingsStore;

/// Key the admin bearer token is persisted under
pub const TOKEN_KEY: &str = "adminToken";

/// Persistent home of the admin session token
///
/// At most one token is stored. Implementations must be shareable across
/// tasks since the API client clears the token on its own when the backend
/// rejects it.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Main database handle
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Platform data file, e.g. `~/.local/share/csquare/csquare.db`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "csquare", "csquare").map(|dirs| dirs.data_dir().join("csquare.db"))
    }

    fn init(mut conn: Connection) -> Result<Self> {
        migrations::run_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schema_version(&self) -> u32 {
        migrations::schema_version(&self.conn()).unwrap_or(0)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        SettingsStore::new(&self.conn()).get(key)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        SettingsStore::new(&self.conn()).set(key, value)
    }

    pub fn remove_setting(&self, key: &str) -> Result<bool> {
        SettingsStore::new(&self.conn()).remove(key)
    }
}

impl TokenStore for Database {
    fn load(&self) -> Result<Option<String>> {
        self.get_setting(TOKEN_KEY)
    }

    fn save(&self, token: &str) -> Result<()> {
        self.set_setting(TOKEN_KEY, token)
    }

    fn clear(&self) -> Result<()> {
        if self.remove_setting(TOKEN_KEY)? {
            debug!("Cleared stored admin token");
        }
        Ok(())
    }
}

/// Token store that forgets everything on exit
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.slot().take();
        Ok(())
    }
}
