use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use reelkit_model::AccessHandle;

use crate::capability::provider::CapabilityProvider;
use crate::error::Result;

/// Owns the single active access handle on behalf of a session.
///
/// Every transition runs under one lock, so activate/release stay mutually
/// exclusive even when navigation races teardown. Callers never pair
/// begin/end access themselves.
#[derive(Debug)]
pub struct CapabilityBroker {
    provider: Arc<dyn CapabilityProvider>,
    active: Mutex<Option<AccessHandle>>,
}

impl CapabilityBroker {
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            provider,
            active: Mutex::new(None),
        }
    }

    /// Issue a token for a live directory. No broker state is touched.
    pub fn create_token(&self, path: &Path) -> Result<Vec<u8>> {
        self.provider.grant_scope(path)
    }

    /// Resolve `token` and make its root the active handle.
    ///
    /// If a handle is already active it is released first; the previous
    /// release is always observed before the new activation's effects. On
    /// any failure no handle is left active (resolution failures release
    /// the previous handle too, so the session can fall back to Home with a
    /// clean slate).
    pub async fn activate(&self, token: &[u8]) -> Result<AccessHandle> {
        let mut active = self.active.lock().await;

        if let Some(previous) = active.take() {
            self.provider.end_access(&previous.root);
            debug!(root = %previous.root.display(), "released previously active capability");
        }

        let resolved = self.provider.resolve(token)?;

        if resolved.is_stale {
            // Advisory only: the handle stays usable for this session, but
            // the caller should re-issue the token at its next save point.
            info!(root = %resolved.root.display(), "capability token is stale");
        }

        self.provider.begin_access(&resolved.root)?;

        let handle = AccessHandle {
            root: resolved.root,
            is_stale: resolved.is_stale,
        };
        *active = Some(handle.clone());

        debug!(root = %handle.root.display(), "capability activated");
        Ok(handle)
    }

    /// Release `handle` if it is the active one. Releasing an unknown or
    /// already-released handle is a no-op.
    pub async fn release(&self, handle: &AccessHandle) {
        let mut active = self.active.lock().await;
        match active.as_ref() {
            Some(current) if current.root == handle.root => {
                self.provider.end_access(&handle.root);
                *active = None;
                debug!(root = %handle.root.display(), "capability released");
            }
            Some(current) => {
                warn!(
                    requested = %handle.root.display(),
                    active = %current.root.display(),
                    "ignoring release of non-active handle"
                );
            }
            None => {}
        }
    }

    /// Release whatever is active, if anything.
    pub async fn release_active(&self) {
        let mut active = self.active.lock().await;
        if let Some(handle) = active.take() {
            self.provider.end_access(&handle.root);
            debug!(root = %handle.root.display(), "capability released");
        }
    }

    /// Introspection only; the returned handle is a snapshot copy.
    pub async fn active_handle(&self) -> Option<AccessHandle> {
        self.active.lock().await.clone()
    }
}
