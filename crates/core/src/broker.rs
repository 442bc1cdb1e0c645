//! Storage broker seam.
//!
//! One broker implementation per entity, uniform shape. Storage failures come
//! back as explicit [`StorageErrorKind`] variants rather than driver error
//! types, so the classifier never has to pattern-match on a persistence
//! library's exceptions.

use async_trait::async_trait;
use thiserror::Error;

use crate::entity::Entity;
use crate::types::{EntityId, Timestamp};

/// Storage failure classes the broker is allowed to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// The addressed row does not exist.
    NotFound,
    /// A unique constraint rejected the write.
    UniqueConflict,
    /// The optimistic-concurrency check failed: another writer got there
    /// first (or the row vanished) between read and write.
    ConcurrencyConflict,
    /// The store itself is unreachable or misconfigured.
    ConnectivityFailure,
    /// A generic storage failure after the entity passed validation.
    Other,
    /// A driver fault the broker did not anticipate.
    Unexpected,
}

/// A storage failure: kind plus a human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::NotFound, message)
    }

    pub fn unique_conflict(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::UniqueConflict, message)
    }

    pub fn concurrency_conflict(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::ConcurrencyConflict, message)
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::ConnectivityFailure, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Other, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Unexpected, message)
    }
}

/// Uniform per-entity storage interface consumed by the foundation service.
///
/// Each operation is a single storage call; the service never issues more
/// than one mutating call per lifecycle operation.
#[async_trait]
pub trait StorageBroker<E: Entity>: Send + Sync {
    async fn insert(&self, entity: E) -> Result<E, StorageError>;

    async fn select_all(&self) -> Result<Vec<E>, StorageError>;

    async fn select_by_id(&self, id: EntityId) -> Result<Option<E>, StorageError>;

    /// Guarded update: `expected_updated_at` is the `updated_at` the caller
    /// read before modifying. A mismatch must surface as
    /// [`StorageErrorKind::ConcurrencyConflict`].
    async fn update(&self, entity: E, expected_updated_at: Timestamp) -> Result<E, StorageError>;

    /// Delete the given (previously fetched) row. Implementations use the
    /// row's own `updated_at` as the concurrency witness.
    async fn delete(&self, entity: E) -> Result<E, StorageError>;
}
