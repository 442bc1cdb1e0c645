//! Service, service type, and category rows.
//!
//! `Service` is the widest entity: besides its category link it carries the
//! certificate/owner/phone contact fields no other entity has.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetops_core::types::{unset_timestamp, EntityId, Timestamp};
use fleetops_core::{Entity, FieldCheck};

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for Category {
    const NAME: &'static str = "Category";

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

/// A row from the `service_types` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ServiceType {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for ServiceType {
    const NAME: &'static str = "ServiceType";

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

/// A row from the `services` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub category_id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub certificate: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for Service {
    const NAME: &'static str = "Service";

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
            FieldCheck::reference("category_id", self.category_id),
            FieldCheck::text("name", &self.name),
            FieldCheck::text("certificate", &self.certificate),
            FieldCheck::text("owner", &self.owner),
            FieldCheck::text("phone", &self.phone),
        ]
    }
}
