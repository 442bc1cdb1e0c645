//! Car, car model, and car type rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetops_core::types::{unset_timestamp, EntityId, Timestamp};
use fleetops_core::{Entity, FieldCheck};

/// A row from the `car_types` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CarType {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for CarType {
    const NAME: &'static str = "CarType";

    fn id(&self) -> EntityId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn required_fields(&self) -> Vec<FieldCheck> {
        vec![FieldCheck::text("name", &self.name)]
    }
}

/// A row from the `car_models` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CarModel {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub car_type_id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for CarModel {
    const NAME: &'static str = "CarModel";

    fn id(&self) -> EntityId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn required_fields(&self) -> Vec<FieldCheck> {
        vec![
            FieldCheck::reference("car_type_id", self.car_type_id),
            FieldCheck::text("name", &self.name),
        ]
    }
}

/// A row from the `cars` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Car {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub car_model_id: EntityId,
    #[serde(default)]
    pub plate_number: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for Car {
    const NAME: &'static str = "Car";

    fn id(&self) -> EntityId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn required_fields(&self) -> Vec<FieldCheck> {
        vec![
            FieldCheck::reference("car_model_id", self.car_model_id),
            FieldCheck::text("plate_number", &self.plate_number),
            FieldCheck::text("color", &self.color),
        ]
    }
}
