//! The foundation service: validation plus classification composed around a
//! storage broker, instantiated once per entity type.
//!
//! Each operation is a short-lived, stateless unit of work. Validation never
//! touches storage; every path in and out goes through [`classify`], so
//! exactly one classified, logged failure can escape per call. The service
//! stamps no timestamps itself; it only validates what the caller supplied.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::broker::StorageBroker;
use crate::classify::{classify, OperationError};
use crate::clock::Clock;
use crate::entity::Entity;
use crate::error::ServiceError;
use crate::logging::FailureLogger;
use crate::types::EntityId;
use crate::validation::{ValidationError, Validator};

/// Generic entity-lifecycle service.
///
/// Per-entity code reduces to implementing [`Entity`] and instantiating this
/// with the entity's broker.
pub struct FoundationService<E, B> {
    broker: B,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn FailureLogger>,
    validator: Validator,
    _entity: PhantomData<fn() -> E>,
}

impl<E, B> FoundationService<E, B>
where
    E: Entity,
    B: StorageBroker<E>,
{
    pub fn new(broker: B, clock: Arc<dyn Clock>, logger: Arc<dyn FailureLogger>) -> Self {
        Self {
            broker,
            clock,
            logger,
            validator: Validator::default(),
            _entity: PhantomData,
        }
    }

    /// Override the recency window for this entity's temporal rules.
    pub fn with_recency_window(mut self, window: chrono::Duration) -> Self {
        self.validator = Validator::new(window);
        self
    }

    /// Validate a new entity and persist it. The caller supplies both
    /// lifecycle timestamps; `created_at` must equal `updated_at` and be
    /// recent.
    pub async fn add(&self, entity: E) -> Result<E, ServiceError> {
        classify(E::NAME, self.logger.as_ref(), async {
            self.validator.validate_on_add(&entity, self.clock.now())?;
            Ok(self.broker.insert(entity).await?)
        })
        .await
    }

    /// Fetch every persisted entity. No validation states; storage failures
    /// still classify as usual.
    pub async fn retrieve_all(&self) -> Result<Vec<E>, ServiceError> {
        classify(E::NAME, self.logger.as_ref(), async {
            Ok(self.broker.select_all().await?)
        })
        .await
    }

    /// Fetch one entity after checking the identifier; absence is a
    /// validation failure (not-found), never a silent `None`.
    pub async fn retrieve_by_id(&self, id: EntityId) -> Result<E, ServiceError> {
        classify(E::NAME, self.logger.as_ref(), async {
            self.validator.validate_id(id)?;
            self.broker
                .select_by_id(id)
                .await?
                .ok_or_else(|| OperationError::from(ValidationError::NotFound(id)))
        })
        .await
    }

    /// Validate a modification, check it against the stored record, and
    /// persist it with the stored `updated_at` as concurrency witness.
    pub async fn modify(&self, entity: E) -> Result<E, ServiceError> {
        classify(E::NAME, self.logger.as_ref(), async {
            self.validator
                .validate_on_modify(&entity, self.clock.now())?;
            let stored = self.broker.select_by_id(entity.id()).await?;
            let witness = self
                .validator
                .validate_against_storage(&entity, stored.as_ref())?
                .updated_at();
            Ok(self.broker.update(entity, witness).await?)
        })
        .await
    }

    /// Confirm existence, then delete. Returns the removed entity.
    pub async fn remove_by_id(&self, id: EntityId) -> Result<E, ServiceError> {
        classify(E::NAME, self.logger.as_ref(), async {
            self.validator.validate_id(id)?;
            let stored = self
                .broker
                .select_by_id(id)
                .await?
                .ok_or_else(|| OperationError::from(ValidationError::NotFound(id)))?;
            Ok(self.broker.delete(stored).await?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::broker::StorageError;
    use crate::error::{FailureCause, FailureKind};
    use crate::test_support::{fixed_now, valid_entity, CountingLogger, FixedClock, TestEntity};
    use crate::types::{unset_timestamp, Timestamp};

    /// Scripted broker: preloaded rows, optional per-call failures, call
    /// counters.
    #[derive(Default)]
    struct MockBroker {
        stored: Mutex<Option<TestEntity>>,
        inserted: Mutex<Vec<TestEntity>>,
        insert_error: Mutex<Option<StorageError>>,
        select_error: Mutex<Option<StorageError>>,
        update_error: Mutex<Option<StorageError>>,
        insert_calls: AtomicUsize,
        update_calls: AtomicUsize,
        delete_calls: AtomicUsize,
        update_witness: Mutex<Option<Timestamp>>,
    }

    #[async_trait]
    impl StorageBroker<TestEntity> for Arc<MockBroker> {
        async fn insert(&self, entity: TestEntity) -> Result<TestEntity, StorageError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.insert_error.lock().unwrap().take() {
                return Err(err);
            }
            self.inserted.lock().unwrap().push(entity.clone());
            Ok(entity)
        }

        async fn select_all(&self) -> Result<Vec<TestEntity>, StorageError> {
            if let Some(err) = self.select_error.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self.stored.lock().unwrap().clone().into_iter().collect())
        }

        async fn select_by_id(&self, id: Uuid) -> Result<Option<TestEntity>, StorageError> {
            if let Some(err) = self.select_error.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self
                .stored
                .lock()
                .unwrap()
                .clone()
                .filter(|row| row.id == id))
        }

        async fn update(
            &self,
            entity: TestEntity,
            expected_updated_at: Timestamp,
        ) -> Result<TestEntity, StorageError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            *self.update_witness.lock().unwrap() = Some(expected_updated_at);
            if let Some(err) = self.update_error.lock().unwrap().take() {
                return Err(err);
            }
            Ok(entity)
        }

        async fn delete(&self, entity: TestEntity) -> Result<TestEntity, StorageError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            Ok(entity)
        }
    }

    struct Harness {
        broker: Arc<MockBroker>,
        logger: Arc<CountingLogger>,
        service: FoundationService<TestEntity, Arc<MockBroker>>,
    }

    fn harness() -> Harness {
        let broker = Arc::new(MockBroker::default());
        let logger = Arc::new(CountingLogger::default());
        let service = FoundationService::new(
            Arc::clone(&broker),
            Arc::new(FixedClock(fixed_now())),
            Arc::clone(&logger) as Arc<dyn FailureLogger>,
        );
        Harness {
            broker,
            logger,
            service,
        }
    }

    #[tokio::test]
    async fn add_passes_valid_entity_to_insert_exactly_once() {
        let h = harness();
        let entity = valid_entity(fixed_now());

        let returned = h.service.add(entity.clone()).await.unwrap();

        assert_eq!(returned, entity);
        assert_eq!(h.broker.insert_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*h.broker.inserted.lock().unwrap(), vec![entity]);
        assert_eq!(h.logger.error_count(), 0);
        assert_eq!(h.logger.critical_count(), 0);
    }

    #[tokio::test]
    async fn add_rejects_degenerate_entity_without_touching_storage() {
        let h = harness();
        let entity = TestEntity {
            id: Uuid::nil(),
            label: String::new(),
            owner_id: Uuid::nil(),
            created_at: unset_timestamp(),
            updated_at: unset_timestamp(),
        };

        let failure = h.service.add(entity).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert_matches!(failure.cause(), FailureCause::Invalid(report) => {
            let fields: Vec<_> = report.violations().iter().map(|v| v.field).collect();
            assert_eq!(
                fields,
                vec!["id", "label", "owner_id", "created_at", "updated_at", "created_at"]
            );
        });
        assert_eq!(h.broker.insert_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.logger.error_count(), 1);
    }

    #[tokio::test]
    async fn add_classifies_duplicate_key_as_dependency_validation() {
        let h = harness();
        *h.broker.insert_error.lock().unwrap() =
            Some(StorageError::unique_conflict("duplicate key"));

        let failure = h.service.add(valid_entity(fixed_now())).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::DependencyValidation);
        assert_eq!(h.logger.error_count(), 1);
        assert_eq!(h.logger.critical_count(), 0);
    }

    #[tokio::test]
    async fn modify_with_missing_stored_row_never_calls_update() {
        let h = harness();
        let now = fixed_now();
        let mut entity = valid_entity(now - Duration::days(1));
        entity.updated_at = now;

        let failure = h.service.modify(entity).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert!(failure.is_not_found());
        assert_eq!(h.broker.update_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.logger.error_count(), 1);
    }

    #[tokio::test]
    async fn modify_hands_stored_updated_at_to_update_as_witness() {
        let h = harness();
        let now = fixed_now();

        let stored = valid_entity(now - Duration::days(1));
        *h.broker.stored.lock().unwrap() = Some(stored.clone());

        let mut input = stored.clone();
        input.updated_at = now;

        let returned = h.service.modify(input.clone()).await.unwrap();

        assert_eq!(returned, input);
        assert_eq!(h.broker.update_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *h.broker.update_witness.lock().unwrap(),
            Some(stored.updated_at)
        );
        assert_eq!(h.logger.error_count(), 0);
    }

    #[tokio::test]
    async fn modify_classifies_concurrency_conflict_with_one_error_log() {
        let h = harness();
        let now = fixed_now();

        let stored = valid_entity(now - Duration::days(1));
        *h.broker.stored.lock().unwrap() = Some(stored.clone());
        *h.broker.update_error.lock().unwrap() =
            Some(StorageError::concurrency_conflict("row changed underneath"));

        let mut input = stored;
        input.updated_at = now;

        let failure = h.service.modify(input).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::DependencyValidation);
        assert_eq!(h.logger.error_count(), 1);
        assert_eq!(h.logger.critical_count(), 0);
    }

    #[tokio::test]
    async fn modify_rejects_unchanged_update_timestamp() {
        let h = harness();
        let now = fixed_now();

        // Stored row whose updated_at already diverged from created_at, so
        // the on-modify rule passes and the against-storage rule is what
        // fires.
        let mut stored = valid_entity(now - Duration::days(1));
        stored.updated_at = now;
        *h.broker.stored.lock().unwrap() = Some(stored.clone());

        let failure = h.service.modify(stored).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert_eq!(h.broker.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn retrieve_by_id_rejects_nil_identifier() {
        let h = harness();

        let failure = h.service.retrieve_by_id(Uuid::nil()).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert!(!failure.is_not_found());
        assert_eq!(h.logger.error_count(), 1);
    }

    #[tokio::test]
    async fn retrieve_by_id_maps_absence_to_not_found() {
        let h = harness();

        let failure = h.service.retrieve_by_id(Uuid::now_v7()).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert!(failure.is_not_found());
    }

    #[tokio::test]
    async fn retrieve_all_returns_rows_untouched() {
        let h = harness();
        let row = valid_entity(fixed_now());
        *h.broker.stored.lock().unwrap() = Some(row.clone());

        let rows = h.service.retrieve_all().await.unwrap();

        assert_eq!(rows, vec![row]);
        assert_eq!(h.logger.error_count(), 0);
    }

    #[tokio::test]
    async fn retrieve_all_classifies_connectivity_failure_as_critical() {
        let h = harness();
        *h.broker.select_error.lock().unwrap() =
            Some(StorageError::connectivity("connection refused"));

        let failure = h.service.retrieve_all().await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::CriticalDependency);
        assert_eq!(h.logger.critical_count(), 1);
        assert_eq!(h.logger.error_count(), 0);
    }

    #[tokio::test]
    async fn retrieve_classifies_unexpected_driver_fault_as_service() {
        let h = harness();
        *h.broker.select_error.lock().unwrap() =
            Some(StorageError::unexpected("column decode failed"));

        let failure = h.service.retrieve_by_id(Uuid::now_v7()).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Service);
        assert_eq!(h.logger.error_count(), 1);
    }

    #[tokio::test]
    async fn remove_by_id_confirms_existence_before_delete() {
        let h = harness();
        let row = valid_entity(fixed_now());
        *h.broker.stored.lock().unwrap() = Some(row.clone());

        let removed = h.service.remove_by_id(row.id).await.unwrap();

        assert_eq!(removed, row);
        assert_eq!(h.broker.delete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.logger.error_count(), 0);
    }

    #[tokio::test]
    async fn remove_by_id_of_absent_row_never_calls_delete() {
        let h = harness();

        let failure = h.service.remove_by_id(Uuid::now_v7()).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert!(failure.is_not_found());
        assert_eq!(h.broker.delete_calls.load(Ordering::SeqCst), 0);
    }
}
