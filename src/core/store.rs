//! Store handle for an agora economy workspace.
//!
//! A Store is a directory owning the three logical tables of the economy
//! (accounts, activity log, price history) plus the broker audit log and the
//! optional `agora.toml` configuration file. All durable state lives here; no
//! other component holds authoritative copies.

use crate::core::schemas;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Store {
    /// Absolute or caller-relative path to the store root directory.
    pub root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(schemas::ECONOMY_DB_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(schemas::CONFIG_FILE_NAME)
    }
}

impl AsRef<Path> for Store {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}
