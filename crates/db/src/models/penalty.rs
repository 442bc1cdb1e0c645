use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetops_core::types::{unset_timestamp, EntityId, Timestamp};
use fleetops_core::{Entity, FieldCheck};

/// A row from the `penalties` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Penalty {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub user_id: EntityId,
    #[serde(default)]
    pub car_id: EntityId,
    #[serde(default)]
    pub reason: String,
    /// Fine amount in the smallest currency unit.
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for Penalty {
    const NAME: &'static str = "Penalty";

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
            FieldCheck::reference("car_id", self.car_id),
            FieldCheck::text("reason", &self.reason),
        ]
    }
}
