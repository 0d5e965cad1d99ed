use uuid::Uuid;

/// All primary keys are UUIDs, generated by the application at insert time.
pub type EntityId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a new time-ordered primary key.
///
/// UUID v7 keys sort by creation time, so `(created_at, id)` gives a stable
/// insertion order even when two rows share a timestamp.
pub fn new_id() -> EntityId {
    Uuid::now_v7()
}
