use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result of resolving a capability token back into a location.
///
/// Staleness is advisory: a stale token still resolved successfully and the
/// location is usable for this session, but the token should be re-issued at
/// the next opportunity where a live grant is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCapability {
    pub root: PathBuf,
    pub is_stale: bool,
}

/// The live, activated result of resolving a capability token.
///
/// Created only by the capability broker and destroyed exactly once by
/// releasing it there; at most one handle is active per session at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessHandle {
    /// Resolved, currently accessible directory root.
    pub root: PathBuf,
    /// Whether the token that produced this handle is known to be outdated.
    /// Non-fatal; see [`ResolvedCapability`].
    pub is_stale: bool,
}
