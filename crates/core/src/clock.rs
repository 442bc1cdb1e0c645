//! Injected time source.
//!
//! Recency checks never read the system clock directly; they go through this
//! trait so tests can pin "now" to a fixed instant.

use crate::types::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by `Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}
