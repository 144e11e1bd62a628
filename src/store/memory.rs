use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::LightStore;
use crate::error::StoreError;
use crate::model::Light;

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lights: RwLock<BTreeMap<i64, Light>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LightStore for MemoryStore {
    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.lights.read().await.len() as i64)
    }

    async fn find_all(&self) -> Result<Vec<Light>, StoreError> {
        Ok(self.lights.read().await.values().cloned().collect())
    }

    async fn find_by_index(&self, index: i64) -> Result<Option<Light>, StoreError> {
        Ok(self.lights.read().await.get(&index).cloned())
    }

    async fn insert(&self, light: &Light) -> Result<(), StoreError> {
        let mut lights = self.lights.write().await;
        if lights.contains_key(&light.index) {
            return Err(StoreError::DuplicateIndex(light.index));
        }
        lights.insert(light.index, light.clone());
        Ok(())
    }

    async fn set_status(&self, index: i64, status: bool) -> Result<u64, StoreError> {
        match self.lights.write().await.get_mut(&index) {
            Some(light) => {
                light.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_index(&self, index: i64) -> Result<u64, StoreError> {
        Ok(self.lights.write().await.remove(&index).map_or(0, |_| 1))
    }
}
