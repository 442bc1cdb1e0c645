//! Classified failure model.
//!
//! Everything that can go wrong below the foundation service maps onto
//! exactly one [`FailureKind`]. The kind alone is what callers (and the HTTP
//! adapter) dispatch on; the cause carries the detail.

use serde::Serialize;
use thiserror::Error;

use crate::broker::{StorageError, StorageErrorKind};
use crate::types::EntityId;

/// The closed, outward-facing failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Invalid or missing input, including not-found-by-id. Caller must fix
    /// the request; never retryable as-is.
    Validation,
    /// Uniqueness or optimistic-concurrency conflict reported by storage.
    /// Retryable after the caller refetches.
    DependencyValidation,
    /// Non-critical storage failure (generic update failure after validation
    /// passed).
    Dependency,
    /// The data store itself is unreachable or malformed. Logged at critical
    /// severity; needs operator intervention.
    CriticalDependency,
    /// Anything unanticipated. A defect until proven otherwise.
    Service,
}

impl core::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            FailureKind::Validation => "validation",
            FailureKind::DependencyValidation => "dependency_validation",
            FailureKind::Dependency => "dependency",
            FailureKind::CriticalDependency => "critical_dependency",
            FailureKind::Service => "service",
        };
        f.write_str(s)
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// Aggregated result of evaluating all rules against one entity.
///
/// Every failing rule appends one entry; the report is raised once, carrying
/// all violations, so clients see every problem in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`.
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.violations.push(Violation { field, message });
    }

    /// Record a violation only when `fails` holds. This is the rule shape the
    /// engine evaluates: no short-circuit between rules.
    pub fn check(&mut self, fails: bool, field: &'static str, message: &'static str) {
        if fails {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Convert into `Err(self)` when any rule failed.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl core::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// What actually went wrong underneath a classified failure.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error("no record found with id {0}")]
    NotFound(EntityId),

    #[error("invalid: {0}")]
    Invalid(ValidationReport),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A classified entity-operation failure: entity name, taxonomy kind, cause.
///
/// One `ServiceError` escapes per failed operation, already logged exactly
/// once at the severity its kind demands.
#[derive(Debug, Error)]
#[error("{entity} {kind} failure: {cause}")]
pub struct ServiceError {
    entity: &'static str,
    kind: FailureKind,
    cause: FailureCause,
}

impl ServiceError {
    pub fn new(entity: &'static str, cause: FailureCause) -> Self {
        let kind = Self::kind_of(&cause);
        Self {
            entity,
            kind,
            cause,
        }
    }

    /// Ordered cause-to-kind mapping: validation origins first, then storage
    /// kinds by specificity, then the catch-all.
    fn kind_of(cause: &FailureCause) -> FailureKind {
        match cause {
            FailureCause::NotFound(_) | FailureCause::Invalid(_) => FailureKind::Validation,
            FailureCause::Storage(err) => match err.kind {
                StorageErrorKind::NotFound => FailureKind::Validation,
                StorageErrorKind::UniqueConflict | StorageErrorKind::ConcurrencyConflict => {
                    FailureKind::DependencyValidation
                }
                StorageErrorKind::ConnectivityFailure => FailureKind::CriticalDependency,
                StorageErrorKind::Other => FailureKind::Dependency,
                StorageErrorKind::Unexpected => FailureKind::Service,
            },
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn cause(&self) -> &FailureCause {
        &self.cause
    }

    /// Whether this is the not-found flavour of a validation failure (the
    /// HTTP adapter maps it to 404 instead of 400).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.cause,
            FailureCause::NotFound(_)
                | FailureCause::Storage(StorageError {
                    kind: StorageErrorKind::NotFound,
                    ..
                })
        )
    }
}
