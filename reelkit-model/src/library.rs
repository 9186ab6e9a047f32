use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::LibraryEntryId;

/// A persisted library root: a directory the user granted access to,
/// together with the capability token that re-grants that access across
/// process restarts.
///
/// Entries are owned by the registry; everything else holds copies. Any
/// change is a new insert or a delete, never an in-place mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: LibraryEntryId,
    /// Last-known absolute location, used for display and lookup.
    pub path: String,
    /// Opaque serialized access grant. Unforgeable as far as this crate is
    /// concerned; only the capability provider can interpret it.
    pub capability_token: Vec<u8>,
    /// Immutable after insertion.
    pub created_at: DateTime<Utc>,
}

impl LibraryEntry {
    /// Final path component, for list rendering.
    pub fn display_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone())
    }

    pub fn location(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

impl PartialEq for LibraryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LibraryEntry {}
