//! Failure logging seam.
//!
//! The classifier emits exactly one log record per failure, at the severity
//! the failure kind demands. Production logging goes through `tracing`; tests
//! substitute a counting fake to assert the one-record discipline.

use crate::error::ServiceError;

pub trait FailureLogger: Send + Sync {
    /// Record a failure at error severity.
    fn error(&self, failure: &ServiceError);

    /// Record a failure at critical severity (storage unreachable or
    /// malformed; operator intervention needed).
    fn critical(&self, failure: &ServiceError);
}

/// Production logger emitting structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl FailureLogger for TracingLogger {
    fn error(&self, failure: &ServiceError) {
        tracing::error!(
            entity = failure.entity(),
            kind = %failure.kind(),
            error = %failure,
            "entity operation failed"
        );
    }

    fn critical(&self, failure: &ServiceError) {
        // tracing has no level above ERROR; the severity field is what
        // alerting keys on.
        tracing::error!(
            entity = failure.entity(),
            kind = %failure.kind(),
            severity = "critical",
            error = %failure,
            "entity operation failed: data store unavailable"
        );
    }
}
