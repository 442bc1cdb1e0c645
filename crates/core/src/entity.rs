//! The capability set an entity must expose to go through the lifecycle
//! protocol: an identifier, the two lifecycle timestamps, and a declared list
//! of required fields.

use crate::types::{EntityId, Timestamp};

/// One required-field probe, produced by [`Entity::required_fields`].
///
/// `missing` is the rule's verdict for the current value; the engine turns
/// each missing field into one violation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCheck {
    pub field: &'static str,
    pub missing: bool,
}

impl FieldCheck {
    /// Required text field: empty or whitespace-only counts as missing.
    pub fn text(field: &'static str, value: &str) -> Self {
        Self {
            field,
            missing: value.trim().is_empty(),
        }
    }

    /// Required foreign identifier: the nil UUID counts as missing.
    pub fn reference(field: &'static str, id: EntityId) -> Self {
        Self {
            field,
            missing: id.is_nil(),
        }
    }
}

/// Minimal interface the lifecycle protocol needs from a managed entity.
///
/// Implementations declare their required fields once; the validation engine
/// and foundation service are otherwise entity-agnostic.
pub trait Entity: Send + Sync + 'static {
    /// Display name used in classified failures and log records.
    const NAME: &'static str;

    fn id(&self) -> EntityId;

    fn created_at(&self) -> Timestamp;

    fn updated_at(&self) -> Timestamp;

    /// Required-field probes, evaluated eagerly and independently on every
    /// add/modify. Order determines violation order in the report.
    fn required_fields(&self) -> Vec<FieldCheck>;
}
