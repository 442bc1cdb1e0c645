//! Generic entity-lifecycle foundation layer.
//!
//! Every managed entity runs its Add/Modify/Remove/Retrieve operations through
//! the same two components: a declarative validation engine
//! ([`validation::Validator`]) and a failure classifier ([`classify`]) that
//! maps validation and storage failures onto a closed taxonomy
//! ([`error::FailureKind`]) with one log record per failure.
//!
//! This crate is pure domain logic: no database driver, no HTTP. Storage is
//! reached only through the [`broker::StorageBroker`] seam and time only
//! through the [`clock::Clock`] seam.

pub mod broker;
pub mod classify;
pub mod clock;
pub mod entity;
pub mod error;
pub mod logging;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use broker::{StorageBroker, StorageError, StorageErrorKind};
pub use clock::{Clock, SystemClock};
pub use entity::{Entity, FieldCheck};
pub use error::{FailureCause, FailureKind, ServiceError, ValidationReport};
pub use logging::{FailureLogger, TracingLogger};
pub use service::FoundationService;
pub use types::{EntityId, Timestamp};
pub use validation::Validator;
