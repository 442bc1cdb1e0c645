use async_trait::async_trait;
use sqlx::PgPool;

use fleetops_core::types::{EntityId, Timestamp};
use fleetops_core::{StorageBroker, StorageError};

use crate::models::User;

use super::{concurrency_conflict, map_sqlx_error};

/// Column list for `users` queries.
const COLUMNS: &str = "id, first_name, last_name, email, created_at, updated_at";

pub struct UserBroker {
    pool: PgPool,
}

impl UserBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<User> for UserBroker {
    async fn insert(&self, entity: User) -> Result<User, StorageError> {
        let query = format!(
            "INSERT INTO users (id, first_name, last_name, email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(entity.id)
            .bind(&entity.first_name)
            .bind(&entity.last_name)
            .bind(&entity.email)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<User>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at");
        sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<User>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: User,
        expected_updated_at: Timestamp,
    ) -> Result<User, StorageError> {
        let query = format!(
            "UPDATE users \
             SET first_name = $2, last_name = $3, email = $4, updated_at = $5 \
             WHERE id = $1 AND updated_at = $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(entity.id)
            .bind(&entity.first_name)
            .bind(&entity.last_name)
            .bind(&entity.email)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("User", entity.id))
    }

    async fn delete(&self, entity: User) -> Result<User, StorageError> {
        let query =
            format!("DELETE FROM users WHERE id = $1 AND updated_at = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("User", entity.id))
    }
}
