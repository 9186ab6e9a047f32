use serde::{Deserialize, Serialize};

/// Strongly typed identifier for a persisted library entry.
///
/// Assigned by the registry at insertion (SQLite rowid); stable for the
/// lifetime of the row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LibraryEntryId(pub i64);

impl LibraryEntryId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for LibraryEntryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for LibraryEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
