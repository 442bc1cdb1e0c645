//! Offer and offer type rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetops_core::types::{unset_timestamp, EntityId, Timestamp};
use fleetops_core::{Entity, FieldCheck};

/// A row from the `offer_types` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OfferType {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for OfferType {
    const NAME: &'static str = "OfferType";

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

/// A row from the `offers` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub offer_type_id: EntityId,
    #[serde(default)]
    pub car_id: EntityId,
    #[serde(default)]
    pub title: String,
    /// Free-form detail text; not required.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for Offer {
    const NAME: &'static str = "Offer";

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
            FieldCheck::reference("offer_type_id", self.offer_type_id),
            FieldCheck::reference("car_id", self.car_id),
            FieldCheck::text("title", &self.title),
        ]
    }
}
