//! Domain entities mirrored from persistent storage.

use serde::Serialize;

/// A stored blog post. `date` is the human-readable creation date and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: String,
}
