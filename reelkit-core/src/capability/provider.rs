use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use reelkit_model::ResolvedCapability;

use crate::error::{CoreError, Result};

/// Platform access-control seam.
///
/// Implementations issue opaque tokens for directories, resolve them back
/// into locations, and gate live access to a resolved root. The broker is
/// the only caller that pairs `begin_access`/`end_access`; everything else
/// goes through it.
pub trait CapabilityProvider: Send + Sync + fmt::Debug {
    /// Serialize a scoped grant for `path`. Pure function of its input.
    ///
    /// Fails with [`CoreError::CapabilityCreationFailed`] when the platform
    /// cannot grant scope for that location.
    fn grant_scope(&self, path: &Path) -> Result<Vec<u8>>;

    /// Resolve a token back into a location, reporting staleness.
    ///
    /// Staleness is advisory and must not be conflated with failure; only
    /// an undecodable or unknown token is
    /// [`CoreError::CapabilityResolutionFailed`].
    fn resolve(&self, token: &[u8]) -> Result<ResolvedCapability>;

    /// Begin live access to a resolved root.
    ///
    /// Fails with [`CoreError::AccessDenied`] when resolution succeeded but
    /// the platform refuses access (location deleted, budget exhausted).
    fn begin_access(&self, root: &Path) -> Result<()>;

    /// End live access. Infallible and idempotent.
    fn end_access(&self, root: &Path);
}

/// What a filesystem token actually carries. Opaque to everyone above the
/// provider; the issue timestamp exists so grants are distinguishable even
/// for the same path.
#[derive(Debug, Serialize, Deserialize)]
struct TokenEnvelope {
    path: PathBuf,
    issued_at: DateTime<Utc>,
}

/// Default provider backed by the real filesystem.
///
/// Stands in for a platform sandbox service: the "grant" is a serialized
/// canonical path, access requires the directory to still exist. Hosts with
/// a real scoped-grant facility supply their own [`CapabilityProvider`].
#[derive(Debug, Default)]
pub struct FsCapabilityProvider;

impl FsCapabilityProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityProvider for FsCapabilityProvider {
    fn grant_scope(&self, path: &Path) -> Result<Vec<u8>> {
        let canonical = path.canonicalize().map_err(|e| {
            CoreError::CapabilityCreationFailed(format!(
                "cannot grant scope for {}: {e}",
                path.display()
            ))
        })?;

        if !canonical.is_dir() {
            return Err(CoreError::CapabilityCreationFailed(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let envelope = TokenEnvelope {
            path: canonical,
            issued_at: Utc::now(),
        };

        serde_json::to_vec(&envelope).map_err(|e| {
            CoreError::CapabilityCreationFailed(format!("cannot serialize grant: {e}"))
        })
    }

    fn resolve(&self, token: &[u8]) -> Result<ResolvedCapability> {
        let envelope: TokenEnvelope = serde_json::from_slice(token)
            .map_err(|e| CoreError::CapabilityResolutionFailed(format!("malformed token: {e}")))?;

        Ok(ResolvedCapability {
            root: envelope.path,
            is_stale: false,
        })
    }

    fn begin_access(&self, root: &Path) -> Result<()> {
        if !root.is_dir() {
            return Err(CoreError::AccessDenied(format!(
                "{} is no longer accessible",
                root.display()
            )));
        }

        debug!(root = %root.display(), "began scoped access");
        Ok(())
    }

    fn end_access(&self, root: &Path) {
        debug!(root = %root.display(), "ended scoped access");
    }
}
