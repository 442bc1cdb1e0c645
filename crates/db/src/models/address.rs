use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetops_core::types::{unset_timestamp, EntityId, Timestamp};
use fleetops_core::{Entity, FieldCheck};

/// A row from the `addresses` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub user_id: EntityId,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for Address {
    const NAME: &'static str = "Address";

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
            FieldCheck::reference("user_id", self.user_id),
            FieldCheck::text("street", &self.street),
            FieldCheck::text("city", &self.city),
            FieldCheck::text("postal_code", &self.postal_code),
        ]
    }
}
