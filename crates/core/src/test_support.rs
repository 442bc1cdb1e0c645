//! Shared test fixtures: a minimal entity with one required text field and
//! one required reference field, a pinned clock, and a logger that only
//! counts calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::TimeZone;
use uuid::Uuid;

use crate::clock::Clock;
use crate::entity::{Entity, FieldCheck};
use crate::error::ServiceError;
use crate::logging::FailureLogger;
use crate::types::{EntityId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEntity {
    pub id: EntityId,
    pub label: String,
    pub owner_id: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for TestEntity {
    const NAME: &'static str = "TestEntity";

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
            FieldCheck::text("label", &self.label),
            FieldCheck::reference("owner_id", self.owner_id),
        ]
    }
}

/// A deterministic "now" for recency checks.
pub fn fixed_now() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
}

/// A structurally valid entity with both lifecycle timestamps at `ts`.
pub fn valid_entity(ts: Timestamp) -> TestEntity {
    TestEntity {
        id: Uuid::now_v7(),
        label: "alpha".to_string(),
        owner_id: Uuid::now_v7(),
        created_at: ts,
        updated_at: ts,
    }
}

/// Clock pinned to a single instant.
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Logger that records nothing but how often each severity was used.
#[derive(Default)]
pub struct CountingLogger {
    pub errors: AtomicUsize,
    pub criticals: AtomicUsize,
}

impl CountingLogger {
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }

    pub fn critical_count(&self) -> usize {
        self.criticals.load(Ordering::SeqCst)
    }
}

impl FailureLogger for CountingLogger {
    fn error(&self, _failure: &ServiceError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    fn critical(&self, _failure: &ServiceError) {
        self.criticals.fetch_add(1, Ordering::SeqCst);
    }
}
