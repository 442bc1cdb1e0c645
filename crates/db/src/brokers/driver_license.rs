use async_trait::async_trait;
use sqlx::PgPool;

use fleetops_core::types::{EntityId, Timestamp};
use fleetops_core::{StorageBroker, StorageError};

use crate::models::DriverLicense;

use super::{concurrency_conflict, map_sqlx_error};

/// Column list for `driver_licenses` queries.
const COLUMNS: &str = "id, user_id, license_number, issued_by, created_at, updated_at";

pub struct DriverLicenseBroker {
    pool: PgPool,
}

impl DriverLicenseBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<DriverLicense> for DriverLicenseBroker {
    async fn insert(&self, entity: DriverLicense) -> Result<DriverLicense, StorageError> {
        let query = format!(
            "INSERT INTO driver_licenses \
             (id, user_id, license_number, issued_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DriverLicense>(&query)
            .bind(entity.id)
            .bind(entity.user_id)
            .bind(&entity.license_number)
            .bind(&entity.issued_by)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<DriverLicense>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM driver_licenses ORDER BY created_at");
        sqlx::query_as::<_, DriverLicense>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<DriverLicense>, StorageError> {
        let query = format!("SELECT {COLUMNS} FROM driver_licenses WHERE id = $1");
        sqlx::query_as::<_, DriverLicense>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: DriverLicense,
        expected_updated_at: Timestamp,
    ) -> Result<DriverLicense, StorageError> {
        let query = format!(
            "UPDATE driver_licenses \
             SET user_id = $2, license_number = $3, issued_by = $4, updated_at = $5 \
             WHERE id = $1 AND updated_at = $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DriverLicense>(&query)
            .bind(entity.id)
            .bind(entity.user_id)
            .bind(&entity.license_number)
            .bind(&entity.issued_by)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("DriverLicense", entity.id))
    }

    async fn delete(&self, entity: DriverLicense) -> Result<DriverLicense, StorageError> {
        let query = format!(
            "DELETE FROM driver_licenses WHERE id = $1 AND updated_at = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DriverLicense>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("DriverLicense", entity.id))
    }
}
