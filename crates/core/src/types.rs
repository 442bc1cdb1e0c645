/// All entity identifiers are UUIDs; `Uuid::nil()` is the zero value.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The "unset" timestamp, i.e. what a caller sends when it never filled the
/// field in. Deserialized defaults land on the Unix epoch.
pub fn unset_timestamp() -> Timestamp {
    chrono::DateTime::<chrono::Utc>::UNIX_EPOCH
}
