use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Classification of a filesystem child produced by a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A directory worth navigating into.
    Container,
    /// A regular file recognized as playable media by extension.
    PlayableLeaf,
}

/// One filesystem child in a scan result.
///
/// Produced fresh by every scan call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub location: PathBuf,
    pub display_name: String,
    pub kind: EntryKind,
    /// Raw size in bytes; present only for playable leaves. Display
    /// formatting is the presentation layer's concern.
    pub size_bytes: Option<u64>,
}

impl DirectoryEntry {
    pub fn is_container(&self) -> bool {
        self.kind == EntryKind::Container
    }

    pub fn is_playable(&self) -> bool {
        self.kind == EntryKind::PlayableLeaf
    }
}

impl PartialEq for DirectoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for DirectoryEntry {}
