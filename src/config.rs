//! Server configuration loaded from environment variables.

use std::path::PathBuf;

use crate::error::StoreError;
use crate::store::DocumentStore;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "127.0.0.1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listening port (from PORT)
    pub port: u16,
    /// Listening address (from LINECOOK_BIND)
    pub bind: String,
    /// Directory holding `doc.json` (from LINECOOK_DATA_DIR). Falls back to
    /// the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let bind = lookup("LINECOOK_BIND")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let data_dir = lookup("LINECOOK_DATA_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            port,
            bind,
            data_dir,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn open_store(&self) -> Result<DocumentStore, StoreError> {
        match &self.data_dir {
            Some(dir) => DocumentStore::open_in_dir(dir),
            None => DocumentStore::open_default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
