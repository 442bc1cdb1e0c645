use async_trait::async_trait;
use sqlx::PgPool;

use fleetops_core::types::{EntityId, Timestamp};
use fleetops_core::{StorageBroker, StorageError};

use crate::models::Penalty;

use super::{concurrency_conflict, map_sqlx_error};

/// Column list for `penalties` queries.
const COLUMNS: &str = "id, user_id, car_id, reason, amount_cents, created_at, updated_at";

pub struct PenaltyBroker {
    pool: PgPool,
}

impl PenaltyBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<Penalty> for PenaltyBroker {
    async fn insert(&self, entity: Penalty) -> Result<Penalty, StorageError> {
        let query = format!(
            "INSERT INTO penalties \
             (id, user_id, car_id, reason, amount_cents, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Penalty>(&query)
            .bind(entity.id)
            .bind(entity.user_id)
            .bind(entity.car_id)
            .bind(&entity.reason)
            .bind(entity.amount_cents)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<Penalty>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM penalties ORDER BY created_at");
        sqlx::query_as::<_, Penalty>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<Penalty>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM penalties WHERE id = $1");
        sqlx::query_as::<_, Penalty>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: Penalty,
        expected_updated_at: Timestamp,
    ) -> Result<Penalty, StorageError> {
        let query = format!(
            "UPDATE penalties \
             SET user_id = $2, car_id = $3, reason = $4, amount_cents = $5, updated_at = $6 \
             WHERE id = $1 AND updated_at = $7 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Penalty>(&query)
            .bind(entity.id)
            .bind(entity.user_id)
            .bind(entity.car_id)
            .bind(&entity.reason)
            .bind(entity.amount_cents)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Penalty", entity.id))
    }

    async fn delete(&self, entity: Penalty) -> Result<Penalty, StorageError> {
        let query =
            format!("DELETE FROM penalties WHERE id = $1 AND updated_at = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Penalty>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Penalty", entity.id))
    }
}
