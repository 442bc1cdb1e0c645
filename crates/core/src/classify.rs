//! Failure classifier: the single choke point every entity operation
//! executes through.
//!
//! [`classify`] runs an operation future to completion. A success passes
//! through untouched with no side effects. A failure is wrapped into exactly
//! one [`ServiceError`], logged exactly once at the severity its kind
//! demands, and returned. Nothing is ever caught and discarded.

use std::future::Future;

use crate::broker::StorageError;
use crate::error::{FailureCause, FailureKind, ServiceError};
use crate::logging::FailureLogger;
use crate::validation::ValidationError;

/// What an operation can fail with before classification: a validation-origin
/// failure or a storage-origin one.
#[derive(Debug)]
pub enum OperationError {
    Validation(ValidationError),
    Storage(StorageError),
}

impl From<ValidationError> for OperationError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StorageError> for OperationError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<OperationError> for FailureCause {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::Validation(ValidationError::NotFound(id)) => {
                FailureCause::NotFound(id)
            }
            OperationError::Validation(ValidationError::Invalid(report)) => {
                FailureCause::Invalid(report)
            }
            OperationError::Storage(storage) => FailureCause::Storage(storage),
        }
    }
}

/// Run `operation`, classifying any failure into the taxonomy.
///
/// The same operator serves the single-entity and the bulk return paths; the
/// bulk path simply never produces validation-origin failures.
pub async fn classify<T, Fut>(
    entity: &'static str,
    logger: &dyn FailureLogger,
    operation: Fut,
) -> Result<T, ServiceError>
where
    Fut: Future<Output = Result<T, OperationError>>,
{
    match operation.await {
        Ok(value) => Ok(value),
        Err(err) => {
            let failure = ServiceError::new(entity, err.into());
            match failure.kind() {
                FailureKind::CriticalDependency => logger.critical(&failure),
                _ => logger.error(&failure),
            }
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::broker::StorageError;
    use crate::error::ValidationReport;
    use crate::test_support::CountingLogger;

    async fn classify_storage(
        logger: &CountingLogger,
        err: StorageError,
    ) -> ServiceError {
        classify::<(), _>("TestEntity", logger, async { Err(err.into()) })
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn success_passes_through_without_logging() {
        let logger = CountingLogger::default();

        let value = classify("TestEntity", &logger, async { Ok::<_, OperationError>(7) })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(logger.error_count(), 0);
        assert_eq!(logger.critical_count(), 0);
    }

    #[tokio::test]
    async fn validation_failure_logs_once_at_error_severity() {
        let logger = CountingLogger::default();
        let mut report = ValidationReport::new();
        report.add("label", "value is required");

        let failure = classify::<(), _>("TestEntity", &logger, async {
            Err(ValidationError::Invalid(report).into())
        })
        .await
        .unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert_eq!(failure.entity(), "TestEntity");
        assert_eq!(logger.error_count(), 1);
        assert_eq!(logger.critical_count(), 0);
    }

    #[tokio::test]
    async fn conflict_kinds_take_precedence_over_generic_failure() {
        // Mutually exclusive scenarios: each storage kind classifies on its
        // own, conflicts never degrade to the generic Dependency kind.
        let logger = CountingLogger::default();

        let dup = classify_storage(&logger, StorageError::unique_conflict("duplicate key")).await;
        assert_eq!(dup.kind(), FailureKind::DependencyValidation);

        let locked =
            classify_storage(&logger, StorageError::concurrency_conflict("row changed")).await;
        assert_eq!(locked.kind(), FailureKind::DependencyValidation);

        let generic = classify_storage(&logger, StorageError::other("update failed")).await;
        assert_eq!(generic.kind(), FailureKind::Dependency);

        assert_eq!(logger.error_count(), 3);
        assert_eq!(logger.critical_count(), 0);
    }

    #[tokio::test]
    async fn connectivity_failure_logs_once_at_critical_severity() {
        let logger = CountingLogger::default();

        let failure =
            classify_storage(&logger, StorageError::connectivity("pool timed out")).await;

        assert_eq!(failure.kind(), FailureKind::CriticalDependency);
        assert_eq!(logger.critical_count(), 1);
        assert_eq!(logger.error_count(), 0);
    }

    #[tokio::test]
    async fn unanticipated_failure_maps_to_service_kind() {
        let logger = CountingLogger::default();

        let failure =
            classify_storage(&logger, StorageError::unexpected("decode fault")).await;

        assert_eq!(failure.kind(), FailureKind::Service);
        assert_eq!(logger.error_count(), 1);
    }

    #[tokio::test]
    async fn classification_is_idempotent_across_invocations() {
        // The same underlying failure, classified twice, yields the same kind
        // and exactly one log call per invocation.
        let logger = CountingLogger::default();

        let first = classify_storage(&logger, StorageError::unique_conflict("duplicate")).await;
        let second = classify_storage(&logger, StorageError::unique_conflict("duplicate")).await;

        assert_eq!(first.kind(), second.kind());
        assert_eq!(logger.error_count(), 2);
        assert_matches!(first.cause(), FailureCause::Storage(_));
    }
}
