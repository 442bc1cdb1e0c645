use async_trait::async_trait;
use sqlx::PgPool;

use fleetops_core::types::{EntityId, Timestamp};
use fleetops_core::{StorageBroker, StorageError};

use crate::models::Address;

use super::{concurrency_conflict, map_sqlx_error};

/// Column list for `addresses` queries.
const COLUMNS: &str = "id, user_id, street, city, postal_code, created_at, updated_at";

pub struct AddressBroker {
    pool: PgPool,
}

impl AddressBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<Address> for AddressBroker {
    async fn insert(&self, entity: Address) -> Result<Address, StorageError> {
        let query = format!(
            "INSERT INTO addresses (id, user_id, street, city, postal_code, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(entity.id)
            .bind(entity.user_id)
            .bind(&entity.street)
            .bind(&entity.city)
            .bind(&entity.postal_code)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<Address>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM addresses ORDER BY created_at");
        sqlx::query_as::<_, Address>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<Address>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM addresses WHERE id = $1");
        sqlx::query_as::<_, Address>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: Address,
        expected_updated_at: Timestamp,
    ) -> Result<Address, StorageError> {
        let query = format!(
            "UPDATE addresses \
             SET user_id = $2, street = $3, city = $4, postal_code = $5, updated_at = $6 \
             WHERE id = $1 AND updated_at = $7 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(entity.id)
            .bind(entity.user_id)
            .bind(&entity.street)
            .bind(&entity.city)
            .bind(&entity.postal_code)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Address", entity.id))
    }

    async fn delete(&self, entity: Address) -> Result<Address, StorageError> {
        let query = format!(
            "DELETE FROM addresses WHERE id = $1 AND updated_at = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Address", entity.id))
    }
}
