use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetops_core::types::{unset_timestamp, EntityId, Timestamp};
use fleetops_core::{Entity, FieldCheck};

/// A row from the `driver_licenses` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DriverLicense {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub user_id: EntityId,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub issued_by: String,
    #[serde(default = "unset_timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "unset_timestamp")]
    pub updated_at: Timestamp,
}

impl Entity for DriverLicense {
    const NAME: &'static str = "DriverLicense";

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
            FieldCheck::text("license_number", &self.license_number),
            FieldCheck::text("issued_by", &self.issued_by),
        ]
    }
}
