use crate::persistence::{JsonFileStore, MemoryStore, PersistenceError};
use crate::tracker::BoxedStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const STORE_ENV: &str = "BUNK_TRACKER_STORE";
pub const DATA_ENV: &str = "BUNK_TRACKER_DATA";
pub const HTTP_ADDR_ENV: &str = "BUNK_TRACKER_HTTP_ADDR";

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown store kind '{0}' (expected json, sqlite or memory)")]
    UnknownStore(String),
    #[error("invalid BUNK_TRACKER_HTTP_ADDR '{0}'")]
    InvalidAddr(String),
    #[error("sqlite store requested but the `sqlite` feature is disabled")]
    SqliteDisabled,
    #[error(transparent)]
    Store(#[from] PersistenceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Json,
    Sqlite,
    Memory,
}

impl StoreKind {
    fn default_path(&self) -> &'static str {
        match self {
            StoreKind::Json | StoreKind::Memory => "subjects.json",
            StoreKind::Sqlite => "subjects.db",
        }
    }
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StoreKind::Json),
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreKind,
    pub data_path: PathBuf,
    pub http_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup(STORE_ENV) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => StoreKind::Json,
        };
        let data_path = lookup(DATA_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(store.default_path()));
        let raw_addr = lookup(HTTP_ADDR_ENV).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;
        Ok(Self {
            store,
            data_path,
            http_addr,
        })
    }

    pub fn open_store(&self) -> Result<BoxedStore, ConfigError> {
        let store: BoxedStore = match self.store {
            StoreKind::Json => Box::new(JsonFileStore::new(&self.data_path)),
            StoreKind::Memory => Box::new(MemoryStore::new()),
            StoreKind::Sqlite => Box::new(open_sqlite(self)?),
        };
        match self.store {
            StoreKind::Memory => tracing::info!(store = ?self.store, "store opened"),
            _ => tracing::info!(
                store = ?self.store,
                path = %self.data_path.display(),
                "store opened"
            ),
        }
        Ok(store)
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(
    config: &AppConfig,
) -> Result<crate::persistence::sqlite::SqliteSubjectStore, ConfigError> {
    Ok(crate::persistence::sqlite::SqliteSubjectStore::new(
        &config.data_path,
    )?)
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_config: &AppConfig) -> Result<MemoryStore, ConfigError> {
    Err(ConfigError::SqliteDisabled)
}
