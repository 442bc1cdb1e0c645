//! Brokers for services, service types, and categories.

use async_trait::async_trait;
use sqlx::PgPool;

use fleetops_core::types::{EntityId, Timestamp};
use fleetops_core::{StorageBroker, StorageError};

use crate::models::{Category, Service, ServiceType};

use super::{concurrency_conflict, map_sqlx_error};

const CATEGORY_COLUMNS: &str = "id, name, created_at, updated_at";
const TYPE_COLUMNS: &str = "id, name, created_at, updated_at";
const SERVICE_COLUMNS: &str =
    "id, category_id, name, certificate, owner, phone, created_at, updated_at";

pub struct CategoryBroker {
    pool: PgPool,
}

impl CategoryBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<Category> for CategoryBroker {
    async fn insert(&self, entity: Category) -> Result<Category, StorageError> {
        let query = format!(
            "INSERT INTO categories (id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<Category>, StorageError> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at");
        sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<Category>, StorageError> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: Category,
        expected_updated_at: Timestamp,
    ) -> Result<Category, StorageError> {
        let query = format!(
            "UPDATE categories SET name = $2, updated_at = $3 \
             WHERE id = $1 AND updated_at = $4 \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Category", entity.id))
    }

    async fn delete(&self, entity: Category) -> Result<Category, StorageError> {
        let query = format!(
            "DELETE FROM categories WHERE id = $1 AND updated_at = $2 RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Category", entity.id))
    }
}

pub struct ServiceTypeBroker {
    pool: PgPool,
}

impl ServiceTypeBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<ServiceType> for ServiceTypeBroker {
    async fn insert(&self, entity: ServiceType) -> Result<ServiceType, StorageError> {
        let query = format!(
            "INSERT INTO service_types (id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceType>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<ServiceType>, StorageError> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM service_types ORDER BY created_at");
        sqlx::query_as::<_, ServiceType>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<ServiceType>, StorageError> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM service_types WHERE id = $1");
        sqlx::query_as::<_, ServiceType>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: ServiceType,
        expected_updated_at: Timestamp,
    ) -> Result<ServiceType, StorageError> {
        let query = format!(
            "UPDATE service_types SET name = $2, updated_at = $3 \
             WHERE id = $1 AND updated_at = $4 \
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceType>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("ServiceType", entity.id))
    }

    async fn delete(&self, entity: ServiceType) -> Result<ServiceType, StorageError> {
        let query = format!(
            "DELETE FROM service_types WHERE id = $1 AND updated_at = $2 RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceType>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("ServiceType", entity.id))
    }
}

pub struct ServiceBroker {
    pool: PgPool,
}

impl ServiceBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<Service> for ServiceBroker {
    async fn insert(&self, entity: Service) -> Result<Service, StorageError> {
        let query = format!(
            "INSERT INTO services \
             (id, category_id, name, certificate, owner, phone, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(entity.id)
            .bind(entity.category_id)
            .bind(&entity.name)
            .bind(&entity.certificate)
            .bind(&entity.owner)
            .bind(&entity.phone)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<Service>, StorageError> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY created_at");
        sqlx::query_as::<_, Service>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<Service>, StorageError> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: Service,
        expected_updated_at: Timestamp,
    ) -> Result<Service, StorageError> {
        let query = format!(
            "UPDATE services \
             SET category_id = $2, name = $3, certificate = $4, owner = $5, phone = $6, \
                 updated_at = $7 \
             WHERE id = $1 AND updated_at = $8 \
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(entity.id)
            .bind(entity.category_id)
            .bind(&entity.name)
            .bind(&entity.certificate)
            .bind(&entity.owner)
            .bind(&entity.phone)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Service", entity.id))
    }

    async fn delete(&self, entity: Service) -> Result<Service, StorageError> {
        let query = format!(
            "DELETE FROM services WHERE id = $1 AND updated_at = $2 RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Service", entity.id))
    }
}
