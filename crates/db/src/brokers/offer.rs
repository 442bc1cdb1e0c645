//! Brokers for offers and offer types.

use async_trait::async_trait;
use sqlx::PgPool;

use fleetops_core::types::{EntityId, Timestamp};
use fleetops_core::{StorageBroker, StorageError};

use crate::models::{Offer, OfferType};

use super::{concurrency_conflict, map_sqlx_error};

const TYPE_COLUMNS: &str = "id, name, created_at, updated_at";
const OFFER_COLUMNS: &str =
    "id, offer_type_id, car_id, title, description, created_at, updated_at";

pub struct OfferTypeBroker {
    pool: PgPool,
}

impl OfferTypeBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<OfferType> for OfferTypeBroker {
    async fn insert(&self, entity: OfferType) -> Result<OfferType, StorageError> {
        let query = format!(
            "INSERT INTO offer_types (id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, OfferType>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<OfferType>, StorageError> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM offer_types ORDER BY created_at");
        sqlx::query_as::<_, OfferType>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<OfferType>, StorageError> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM offer_types WHERE id = $1");
        sqlx::query_as::<_, OfferType>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: OfferType,
        expected_updated_at: Timestamp,
    ) -> Result<OfferType, StorageError> {
        let query = format!(
            "UPDATE offer_types SET name = $2, updated_at = $3 \
             WHERE id = $1 AND updated_at = $4 \
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, OfferType>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("OfferType", entity.id))
    }

    async fn delete(&self, entity: OfferType) -> Result<OfferType, StorageError> {
        let query = format!(
            "DELETE FROM offer_types WHERE id = $1 AND updated_at = $2 RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, OfferType>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("OfferType", entity.id))
    }
}

pub struct OfferBroker {
    pool: PgPool,
}

impl OfferBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<Offer> for OfferBroker {
    async fn insert(&self, entity: Offer) -> Result<Offer, StorageError> {
        let query = format!(
            "INSERT INTO offers \
             (id, offer_type_id, car_id, title, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {OFFER_COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(entity.id)
            .bind(entity.offer_type_id)
            .bind(entity.car_id)
            .bind(&entity.title)
            .bind(&entity.description)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<Offer>, StorageError> {
        let query = format!("SELECT {OFFER_COLUMNS} FROM offers ORDER BY created_at");
        sqlx::query_as::<_, Offer>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<Offer>, StorageError> {
        let query = format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = $1");
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: Offer,
        expected_updated_at: Timestamp,
    ) -> Result<Offer, StorageError> {
        let query = format!(
            "UPDATE offers \
             SET offer_type_id = $2, car_id = $3, title = $4, description = $5, updated_at = $6 \
             WHERE id = $1 AND updated_at = $7 \
             RETURNING {OFFER_COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(entity.id)
            .bind(entity.offer_type_id)
            .bind(entity.car_id)
            .bind(&entity.title)
            .bind(&entity.description)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Offer", entity.id))
    }

    async fn delete(&self, entity: Offer) -> Result<Offer, StorageError> {
        let query = format!(
            "DELETE FROM offers WHERE id = $1 AND updated_at = $2 RETURNING {OFFER_COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Offer", entity.id))
    }
}
