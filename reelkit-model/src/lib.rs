//! Core data model definitions shared across Reelkit crates.

pub mod capability;
pub mod entries;
pub mod ids;
pub mod library;
pub mod session;

// Intentionally curated re-exports for downstream consumers.
pub use capability::{AccessHandle, ResolvedCapability};
pub use entries::{DirectoryEntry, EntryKind};
pub use ids::LibraryEntryId;
pub use library::LibraryEntry;
pub use session::{SessionEvent, SessionState};
