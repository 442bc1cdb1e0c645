//! Storage brokers: one [`fleetops_core::StorageBroker`] implementation per
//! entity, uniform shape, over a shared `PgPool`.
//!
//! Driver failures never leave this module as `sqlx::Error`; they are mapped
//! onto the explicit [`StorageError`] kinds the classifier dispatches on.

pub mod address;
pub mod car;
pub mod driver_license;
pub mod offer;
pub mod penalty;
pub mod service;
pub mod user;

pub use address::AddressBroker;
pub use car::{CarBroker, CarModelBroker, CarTypeBroker};
pub use driver_license::DriverLicenseBroker;
pub use offer::{OfferBroker, OfferTypeBroker};
pub use penalty::PenaltyBroker;
pub use service::{CategoryBroker, ServiceBroker, ServiceTypeBroker};
pub use user::UserBroker;

use fleetops_core::types::EntityId;
use fleetops_core::StorageError;

/// PostgreSQL unique constraint violation.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx failure onto the broker error kinds.
///
/// Pool, IO, TLS, and configuration faults mean the store itself is
/// unreachable; a database error is a unique conflict when Postgres says so
/// and a generic failure otherwise; anything else is unanticipated.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::RowNotFound => StorageError::not_found("no row matched the query"),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                StorageError::unique_conflict(db_err.to_string())
            } else {
                StorageError::other(db_err.to_string())
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Configuration(_) => StorageError::connectivity(err.to_string()),
        other => StorageError::unexpected(other.to_string()),
    }
}

/// The guarded `UPDATE`/`DELETE` matched no row: the record was changed or
/// removed by another writer between read and write.
pub(crate) fn concurrency_conflict(entity: &'static str, id: EntityId) -> StorageError {
    StorageError::concurrency_conflict(format!(
        "{entity} {id} was changed or removed by another writer"
    ))
}

#[cfg(test)]
mod tests {
    use fleetops_core::StorageErrorKind;

    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert_eq!(err.kind, StorageErrorKind::NotFound);
    }

    #[test]
    fn pool_faults_map_to_connectivity_failure() {
        for err in [sqlx::Error::PoolTimedOut, sqlx::Error::PoolClosed] {
            assert_eq!(
                map_sqlx_error(err).kind,
                StorageErrorKind::ConnectivityFailure
            );
        }
    }

    #[test]
    fn unrecognized_faults_map_to_unexpected() {
        let err = map_sqlx_error(sqlx::Error::ColumnNotFound("missing".into()));
        assert_eq!(err.kind, StorageErrorKind::Unexpected);
    }

    #[test]
    fn concurrency_conflict_names_the_entity() {
        let id = uuid::Uuid::now_v7();
        let err = concurrency_conflict("Car", id);
        assert_eq!(err.kind, StorageErrorKind::ConcurrencyConflict);
        assert!(err.message.contains("Car"));
        assert!(err.message.contains(&id.to_string()));
    }
}
