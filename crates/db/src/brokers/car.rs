//! Brokers for the car family: types, models, cars.

use async_trait::async_trait;
use sqlx::PgPool;

use fleetops_core::types::{EntityId, Timestamp};
use fleetops_core::{StorageBroker, StorageError};

use crate::models::{Car, CarModel, CarType};

use super::{concurrency_conflict, map_sqlx_error};

const TYPE_COLUMNS: &str = "id, name, created_at, updated_at";
const MODEL_COLUMNS: &str = "id, car_type_id, name, created_at, updated_at";
const CAR_COLUMNS: &str = "id, car_model_id, plate_number, color, created_at, updated_at";

pub struct CarTypeBroker {
    pool: PgPool,
}

impl CarTypeBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<CarType> for CarTypeBroker {
    async fn insert(&self, entity: CarType) -> Result<CarType, StorageError> {
        let query = format!(
            "INSERT INTO car_types (id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, CarType>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<CarType>, StorageError> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM car_types ORDER BY created_at");
        sqlx::query_as::<_, CarType>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<CarType>, StorageError> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM car_types WHERE id = $1");
        sqlx::query_as::<_, CarType>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: CarType,
        expected_updated_at: Timestamp,
    ) -> Result<CarType, StorageError> {
        let query = format!(
            "UPDATE car_types SET name = $2, updated_at = $3 \
             WHERE id = $1 AND updated_at = $4 \
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, CarType>(&query)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("CarType", entity.id))
    }

    async fn delete(&self, entity: CarType) -> Result<CarType, StorageError> {
        let query = format!(
            "DELETE FROM car_types WHERE id = $1 AND updated_at = $2 RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, CarType>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("CarType", entity.id))
    }
}

pub struct CarModelBroker {
    pool: PgPool,
}

impl CarModelBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<CarModel> for CarModelBroker {
    async fn insert(&self, entity: CarModel) -> Result<CarModel, StorageError> {
        let query = format!(
            "INSERT INTO car_models (id, car_type_id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {MODEL_COLUMNS}"
        );
        sqlx::query_as::<_, CarModel>(&query)
            .bind(entity.id)
            .bind(entity.car_type_id)
            .bind(&entity.name)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<CarModel>, StorageError> {
        let query = format!("SELECT {MODEL_COLUMNS} FROM car_models ORDER BY created_at");
        sqlx::query_as::<_, CarModel>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<CarModel>, StorageError> {
        let query = format!("SELECT {MODEL_COLUMNS} FROM car_models WHERE id = $1");
        sqlx::query_as::<_, CarModel>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: CarModel,
        expected_updated_at: Timestamp,
    ) -> Result<CarModel, StorageError> {
        let query = format!(
            "UPDATE car_models SET car_type_id = $2, name = $3, updated_at = $4 \
             WHERE id = $1 AND updated_at = $5 \
             RETURNING {MODEL_COLUMNS}"
        );
        sqlx::query_as::<_, CarModel>(&query)
            .bind(entity.id)
            .bind(entity.car_type_id)
            .bind(&entity.name)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("CarModel", entity.id))
    }

    async fn delete(&self, entity: CarModel) -> Result<CarModel, StorageError> {
        let query = format!(
            "DELETE FROM car_models WHERE id = $1 AND updated_at = $2 RETURNING {MODEL_COLUMNS}"
        );
        sqlx::query_as::<_, CarModel>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("CarModel", entity.id))
    }
}

pub struct CarBroker {
    pool: PgPool,
}

impl CarBroker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBroker<Car> for CarBroker {
    async fn insert(&self, entity: Car) -> Result<Car, StorageError> {
        let query = format!(
            "INSERT INTO cars (id, car_model_id, plate_number, color, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CAR_COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(entity.id)
            .bind(entity.car_model_id)
            .bind(&entity.plate_number)
            .bind(&entity.color)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_all(&self) -> Result<Vec<Car>, StorageError> {
        let query = format!("SELECT {CAR_COLUMNS} FROM cars ORDER BY created_at");
        sqlx::query_as::<_, Car>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn select_by_id(&self, id: EntityId) -> Result<Option<Car>, StorageError> {
        let query = format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        entity: Car,
        expected_updated_at: Timestamp,
    ) -> Result<Car, StorageError> {
        let query = format!(
            "UPDATE cars \
             SET car_model_id = $2, plate_number = $3, color = $4, updated_at = $5 \
             WHERE id = $1 AND updated_at = $6 \
             RETURNING {CAR_COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(entity.id)
            .bind(entity.car_model_id)
            .bind(&entity.plate_number)
            .bind(&entity.color)
            .bind(entity.updated_at)
            .bind(expected_updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Car", entity.id))
    }

    async fn delete(&self, entity: Car) -> Result<Car, StorageError> {
        let query =
            format!("DELETE FROM cars WHERE id = $1 AND updated_at = $2 RETURNING {CAR_COLUMNS}");
        sqlx::query_as::<_, Car>(&query)
            .bind(entity.id)
            .bind(entity.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| concurrency_conflict("Car", entity.id))
    }
}
