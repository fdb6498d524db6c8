// Helper for generating UUIDv7 (timestamp-sortable UUIDs).
//
// Used for token identifiers (`jti`) so they sort by issue time.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}
