//! Declarative field/temporal validation engine.
//!
//! Rules are evaluated eagerly and independently; every failing rule appends
//! one entry to a single [`ValidationReport`], which is raised once with all
//! violations. Only the existence check against storage short-circuits.

use thiserror::Error;

use crate::entity::Entity;
use crate::error::ValidationReport;
use crate::types::{unset_timestamp, EntityId, Timestamp};

pub const MSG_ID_REQUIRED: &str = "id is required";
pub const MSG_VALUE_REQUIRED: &str = "value is required";
pub const MSG_DATE_REQUIRED: &str = "date is required";
pub const MSG_DATE_NOT_RECENT: &str = "date is not recent";
pub const MSG_DATES_NOT_SAME: &str = "date is not the same as created_at";
pub const MSG_DATES_SAME: &str = "date is the same as created_at";
pub const MSG_CREATED_CHANGED: &str = "date is not the same as the stored created_at";
pub const MSG_UPDATED_UNCHANGED: &str = "date is the same as the stored updated_at";

/// Outcome of a failed validation pass.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The addressed record does not exist in storage.
    #[error("no record found with id {0}")]
    NotFound(EntityId),

    /// One or more rules failed; the report enumerates every violation.
    #[error("{0}")]
    Invalid(ValidationReport),
}

/// Validation engine for one entity type.
///
/// Holds the recency window the temporal rules are checked against. The
/// window is configurable per service instance; the 60 second default is
/// shared across all entities.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    recency_window: chrono::Duration,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            recency_window: chrono::Duration::seconds(Validator::DEFAULT_RECENCY_SECONDS),
        }
    }
}

impl Validator {
    /// How far in the past a timestamp may lie and still count as "recent".
    /// The bound is exclusive: exactly this late is rejected.
    pub const DEFAULT_RECENCY_SECONDS: i64 = 60;

    pub fn new(recency_window: chrono::Duration) -> Self {
        Self { recency_window }
    }

    /// Pass iff `0 <= now - ts < window`. Future timestamps fail.
    fn is_recent(&self, ts: Timestamp, now: Timestamp) -> bool {
        let age = now - ts;
        age >= chrono::Duration::zero() && age < self.recency_window
    }

    fn is_unset(ts: Timestamp) -> bool {
        ts == unset_timestamp()
    }

    /// Structural rules shared by add and modify: identifier, required
    /// fields, both timestamps set.
    fn check_structure<E: Entity>(&self, entity: &E, report: &mut ValidationReport) {
        report.check(entity.id().is_nil(), "id", MSG_ID_REQUIRED);

        for probe in entity.required_fields() {
            report.check(probe.missing, probe.field, MSG_VALUE_REQUIRED);
        }

        report.check(Self::is_unset(entity.created_at()), "created_at", MSG_DATE_REQUIRED);
        report.check(Self::is_unset(entity.updated_at()), "updated_at", MSG_DATE_REQUIRED);
    }

    /// Rules for a freshly created entity: `created_at` must be recent and
    /// must equal `updated_at`.
    pub fn validate_on_add<E: Entity>(
        &self,
        entity: &E,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        let mut report = ValidationReport::new();
        self.check_structure(entity, &mut report);

        report.check(
            !self.is_recent(entity.created_at(), now),
            "created_at",
            MSG_DATE_NOT_RECENT,
        );
        report.check(
            entity.updated_at() != entity.created_at(),
            "updated_at",
            MSG_DATES_NOT_SAME,
        );

        report.into_result().map_err(ValidationError::Invalid)
    }

    /// Rules for a modification: recency moves to `updated_at` and the
    /// temporal equality rule inverts (an update must advance the timestamp).
    pub fn validate_on_modify<E: Entity>(
        &self,
        entity: &E,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        let mut report = ValidationReport::new();
        self.check_structure(entity, &mut report);

        report.check(
            !self.is_recent(entity.updated_at(), now),
            "updated_at",
            MSG_DATE_NOT_RECENT,
        );
        report.check(
            entity.updated_at() == entity.created_at(),
            "updated_at",
            MSG_DATES_SAME,
        );

        report.into_result().map_err(ValidationError::Invalid)
    }

    /// Rules against the previously persisted counterpart: the record must
    /// exist, `created_at` is immutable, and the submitted `updated_at` must
    /// actually differ from the stored one.
    ///
    /// Returns the stored record so the caller can hand its `updated_at` to
    /// the broker as the optimistic-concurrency witness.
    pub fn validate_against_storage<'a, E: Entity>(
        &self,
        input: &E,
        stored: Option<&'a E>,
    ) -> Result<&'a E, ValidationError> {
        let Some(stored) = stored else {
            return Err(ValidationError::NotFound(input.id()));
        };

        let mut report = ValidationReport::new();
        report.check(
            input.created_at() != stored.created_at(),
            "created_at",
            MSG_CREATED_CHANGED,
        );
        report.check(
            input.updated_at() == stored.updated_at(),
            "updated_at",
            MSG_UPDATED_UNCHANGED,
        );

        report
            .into_result()
            .map(|()| stored)
            .map_err(ValidationError::Invalid)
    }

    /// Standalone identifier check used by retrieve-by-id and remove-by-id.
    pub fn validate_id(&self, id: EntityId) -> Result<(), ValidationError> {
        let mut report = ValidationReport::new();
        report.check(id.is_nil(), "id", MSG_ID_REQUIRED);
        report.into_result().map_err(ValidationError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::test_support::{fixed_now, valid_entity, TestEntity};

    fn violated_fields(err: ValidationError) -> Vec<(&'static str, &'static str)> {
        match err {
            ValidationError::Invalid(report) => report
                .violations()
                .iter()
                .map(|v| (v.field, v.message))
                .collect(),
            ValidationError::NotFound(id) => panic!("expected Invalid, got NotFound({id})"),
        }
    }

    #[test]
    fn add_accepts_well_formed_entity() {
        let now = fixed_now();
        let entity = valid_entity(now);

        Validator::default()
            .validate_on_add(&entity, now)
            .expect("entity should pass");
    }

    #[test]
    fn add_recency_boundary_is_exclusive_at_sixty_seconds() {
        let now = fixed_now();
        let validator = Validator::default();

        let mut entity = valid_entity(now - Duration::seconds(59));
        assert!(validator.validate_on_add(&entity, now).is_ok());

        entity = valid_entity(now - Duration::seconds(60));
        let fields = violated_fields(validator.validate_on_add(&entity, now).unwrap_err());
        assert_eq!(fields, vec![("created_at", MSG_DATE_NOT_RECENT)]);
    }

    #[test]
    fn add_rejects_future_timestamps() {
        let now = fixed_now();
        let entity = valid_entity(now + Duration::seconds(1));

        let fields = violated_fields(
            Validator::default()
                .validate_on_add(&entity, now)
                .unwrap_err(),
        );
        assert_eq!(fields, vec![("created_at", MSG_DATE_NOT_RECENT)]);
    }

    #[test]
    fn add_enumerates_every_violation_without_short_circuit() {
        // Nil id, empty required fields, both dates default. Every rule that
        // fails must produce an entry; the temporal equality rule still
        // passes because both dates are equal.
        let now = fixed_now();
        let entity = TestEntity {
            id: Uuid::nil(),
            label: String::new(),
            owner_id: Uuid::nil(),
            created_at: unset_timestamp(),
            updated_at: unset_timestamp(),
        };

        let fields = violated_fields(
            Validator::default()
                .validate_on_add(&entity, now)
                .unwrap_err(),
        );
        assert_eq!(
            fields,
            vec![
                ("id", MSG_ID_REQUIRED),
                ("label", MSG_VALUE_REQUIRED),
                ("owner_id", MSG_VALUE_REQUIRED),
                ("created_at", MSG_DATE_REQUIRED),
                ("updated_at", MSG_DATE_REQUIRED),
                ("created_at", MSG_DATE_NOT_RECENT),
            ]
        );
    }

    #[test]
    fn add_rejects_diverged_dates_while_modify_requires_them() {
        let now = fixed_now();

        // created_at == updated_at: passes the add equality rule, fails modify.
        let same = valid_entity(now);
        assert!(Validator::default().validate_on_add(&same, now).is_ok());
        let fields = violated_fields(
            Validator::default()
                .validate_on_modify(&same, now)
                .unwrap_err(),
        );
        assert_eq!(fields, vec![("updated_at", MSG_DATES_SAME)]);

        // Diverged dates: the other way around.
        let mut diverged = valid_entity(now - Duration::seconds(30));
        diverged.updated_at = now;
        let fields = violated_fields(
            Validator::default()
                .validate_on_add(&diverged, now)
                .unwrap_err(),
        );
        assert_eq!(fields, vec![("updated_at", MSG_DATES_NOT_SAME)]);
        assert!(Validator::default().validate_on_modify(&diverged, now).is_ok());
    }

    #[test]
    fn modify_checks_recency_against_updated_at() {
        let now = fixed_now();
        let mut entity = valid_entity(now - Duration::days(7));
        entity.updated_at = now - Duration::seconds(60);

        let fields = violated_fields(
            Validator::default()
                .validate_on_modify(&entity, now)
                .unwrap_err(),
        );
        assert_eq!(fields, vec![("updated_at", MSG_DATE_NOT_RECENT)]);
    }

    #[test]
    fn against_storage_requires_existing_record() {
        let now = fixed_now();
        let input = valid_entity(now);

        let err = Validator::default()
            .validate_against_storage(&input, None)
            .unwrap_err();
        assert_matches!(err, ValidationError::NotFound(id) if id == input.id);
    }

    #[test]
    fn against_storage_rejects_tampered_created_at_and_unchanged_updated_at() {
        let now = fixed_now();
        let mut stored = valid_entity(now - Duration::days(1));
        stored.id = Uuid::now_v7();

        // Tampered created_at and untouched updated_at, both at once.
        let mut input = stored.clone();
        input.created_at = now;

        let fields = violated_fields(
            Validator::default()
                .validate_against_storage(&input, Some(&stored))
                .unwrap_err(),
        );
        assert_eq!(
            fields,
            vec![
                ("created_at", MSG_CREATED_CHANGED),
                ("updated_at", MSG_UPDATED_UNCHANGED),
            ]
        );

        // A genuine modification passes.
        let mut advanced = stored.clone();
        advanced.updated_at = now;
        assert!(Validator::default()
            .validate_against_storage(&advanced, Some(&stored))
            .is_ok());
    }

    #[test]
    fn id_check_rejects_only_the_nil_uuid() {
        let validator = Validator::default();
        assert!(validator.validate_id(Uuid::now_v7()).is_ok());

        let fields = violated_fields(validator.validate_id(Uuid::nil()).unwrap_err());
        assert_eq!(fields, vec![("id", MSG_ID_REQUIRED)]);
    }
}
