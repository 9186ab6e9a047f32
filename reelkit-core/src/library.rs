//! Application-facing composition of store, broker, and session.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use reelkit_model::LibraryEntry;

use crate::capability::{CapabilityBroker, CapabilityProvider};
use crate::error::Result;
use crate::session::LibrarySession;
use crate::store::LibraryRegistry;

/// One user library: the persisted registry of granted roots plus the
/// session used to browse them.
///
/// Created once at startup from an opened store and a platform capability
/// provider; UI code holds this and nothing deeper.
#[derive(Debug)]
pub struct Library {
    registry: Arc<dyn LibraryRegistry>,
    broker: Arc<CapabilityBroker>,
    session: LibrarySession,
}

impl Library {
    pub fn new(
        registry: Arc<dyn LibraryRegistry>,
        provider: Arc<dyn CapabilityProvider>,
    ) -> Self {
        let broker = Arc::new(CapabilityBroker::new(provider));
        let session = LibrarySession::new(Arc::clone(&broker));
        Self {
            registry,
            broker,
            session,
        }
    }

    /// Register a directory: issue a capability token for it and record it
    /// durably. Re-adding an already-registered path returns the existing
    /// entry with its original token.
    pub async fn add_directory(&self, path: &Path) -> Result<LibraryEntry> {
        let token = self.broker.create_token(path)?;
        let entry = self
            .registry
            .insert(&path.to_string_lossy(), &token)
            .await?;

        info!(path = %entry.path, id = %entry.id, "directory registered");
        Ok(entry)
    }

    /// Remove a registry entry. Does not revoke anything at the platform
    /// level and does not disturb an ongoing browse of that directory; a
    /// later `go_home` still releases the active capability cleanly.
    pub async fn remove_directory(&self, path: &str) -> Result<bool> {
        let removed = self.registry.remove(path).await?;
        if removed {
            info!(path, "directory removed from registry");
        }
        Ok(removed)
    }

    /// All registered roots, oldest first.
    pub async fn entries(&self) -> Result<Vec<LibraryEntry>> {
        self.registry.list_all().await
    }

    /// First-run check for the home view.
    pub async fn is_empty(&self) -> Result<bool> {
        self.registry.is_empty().await
    }

    pub fn session(&self) -> &LibrarySession {
        &self.session
    }

    pub fn broker(&self) -> &Arc<CapabilityBroker> {
        &self.broker
    }
}
