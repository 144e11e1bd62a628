use async_trait::async_trait;
use libsql::Row;

use super::LightStore;
use crate::db::Database;
use crate::error::StoreError;
use crate::model::Light;

pub struct LibsqlStore {
    db: Database,
}

impl LibsqlStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_light(row: &Row) -> Result<Light, StoreError> {
        let index: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let status = match row.get::<i64>(2)? {
            0 => false,
            1 => true,
            other => return Err(StoreError::MalformedRow(format!("status {other} for light {index}"))),
        };
        Ok(Light { index, name, status })
    }
}

fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

#[async_trait]
impl LightStore for LibsqlStore {
    async fn count(&self) -> Result<i64, StoreError> {
        let mut rows = self.db.connection().query("SELECT COUNT(*) FROM lights", ()).await?;
        match rows.next().await? {
            Some(row) => Ok(row.get(0)?),
            None => Ok(0),
        }
    }

    async fn find_all(&self) -> Result<Vec<Light>, StoreError> {
        let query = "SELECT light_index, name, status FROM lights ORDER BY light_index";
        let mut rows = self.db.connection().query(query, ()).await?;

        let mut lights = vec![];
        while let Some(row) = rows.next().await? {
            lights.push(Self::row_to_light(&row)?);
        }
        Ok(lights)
    }

    async fn find_by_index(&self, index: i64) -> Result<Option<Light>, StoreError> {
        let query = "SELECT light_index, name, status FROM lights WHERE light_index = ?";
        let mut rows = self.db.connection().query(query, libsql::params![index]).await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_light(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, light: &Light) -> Result<(), StoreError> {
        let query = "INSERT INTO lights (light_index, name, status) VALUES (?, ?, ?)";
        self.db
            .connection()
            .execute(
                query,
                libsql::params![light.index, light.name.as_str(), light.status as i64],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateIndex(light.index)
                } else {
                    StoreError::from(e)
                }
            })?;
        Ok(())
    }

    async fn set_status(&self, index: i64, status: bool) -> Result<u64, StoreError> {
        let query = r#"
            UPDATE lights
            SET status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE light_index = ?
        "#;
        Ok(self
            .db
            .connection()
            .execute(query, libsql::params![status as i64, index])
            .await?)
    }

    async fn delete_by_index(&self, index: i64) -> Result<u64, StoreError> {
        Ok(self
            .db
            .connection()
            .execute("DELETE FROM lights WHERE light_index = ?", libsql::params![index])
            .await?)
    }

    async fn sync(&self) -> Result<(), StoreError> {
        self.db.sync().await.map_err(StoreError::Sync)
    }
}
