//! Storage backends for the light registry.
//!
//! The registry only ever talks to a [`LightStore`]: a flat collection of
//! light documents addressed by their `index`. Every method is a single
//! round-trip; none of them spans more than one document, so any policy that
//! needs a read followed by a write (capacity checks, index allocation) lives
//! in the registry, not here.

mod memory;
mod sqlite;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::db::Database;
use crate::error::StoreError;
use crate::model::Light;

pub use memory::MemoryStore;
pub use sqlite::LibsqlStore;

#[async_trait]
pub trait LightStore: Send + Sync {
    async fn count(&self) -> Result<i64, StoreError>;

    /// All stored lights, ascending by index.
    async fn find_all(&self) -> Result<Vec<Light>, StoreError>;

    async fn find_by_index(&self, index: i64) -> Result<Option<Light>, StoreError>;

    async fn insert(&self, light: &Light) -> Result<(), StoreError>;

    /// Returns the number of lights touched (0 or 1).
    async fn set_status(&self, index: i64, status: bool) -> Result<u64, StoreError>;

    /// Returns the number of lights removed (0 or 1).
    async fn delete_by_index(&self, index: i64) -> Result<u64, StoreError>;

    /// Pushes local writes upstream when the backend is a replica.
    async fn sync(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Libsql,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Libsql => "libsql",
            StoreKind::Memory => "memory",
        }
    }
}

/// Opens the backend named by `app.store`. Libsql databases are created under
/// `data_dir` and migrated before this returns.
pub async fn open(cfg: &Config, data_dir: &Path) -> anyhow::Result<Arc<dyn LightStore>> {
    tracing::info!(store = cfg.app.store.as_str(), "opening light store");
    let store: Arc<dyn LightStore> = match cfg.app.store {
        StoreKind::Libsql => Arc::new(LibsqlStore::new(Database::new(cfg, data_dir).await?)),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
