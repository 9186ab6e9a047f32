//! Navigation state machine composing the broker and the scan engine.
//!
//! The session owns the navigation stack and drives the single active
//! capability through the broker; scans run on blocking workers and their
//! results are applied only when still current. UI code calls nothing below
//! this surface.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use reelkit_model::{DirectoryEntry, EntryKind, LibraryEntry, SessionEvent, SessionState};

use crate::capability::CapabilityBroker;
use crate::error::{CoreError, Result};
use crate::scan;

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Default)]
struct SessionInner {
    /// Root-to-current frames; empty means the home/library-list view.
    stack: Vec<PathBuf>,
    view: Vec<DirectoryEntry>,
    /// Bumped by every navigation; a scan result is applied only when the
    /// generation it was submitted under is still current.
    generation: u64,
    scanning: bool,
}

impl SessionInner {
    fn state(&self) -> SessionState {
        if self.stack.is_empty() {
            SessionState::Home
        } else {
            SessionState::Browsing
        }
    }

    /// Apply a completed scan. Returns false (dropping the result) when the
    /// submitting navigation has been superseded.
    fn apply_scan(
        &mut self,
        generation: u64,
        frame: &Path,
        entries: Vec<DirectoryEntry>,
    ) -> bool {
        if self.generation != generation
            || self.stack.last().map(PathBuf::as_path) != Some(frame)
        {
            return false;
        }

        self.view = entries;
        self.scanning = false;
        true
    }

    fn reset_to_home(&mut self) {
        // Bumping the generation orphans any in-flight scan.
        self.generation += 1;
        self.stack.clear();
        self.view.clear();
        self.scanning = false;
    }
}

/// Browsing session over one library at a time.
///
/// At most one capability is active; every exit path of
/// [`open_entry`](Self::open_entry), [`go_back`](Self::go_back) and
/// [`go_home`](Self::go_home) releases it through the broker, failure paths
/// included. Navigation calls return immediately; the current view updates
/// when the matching scan completes and a [`SessionEvent::ViewChanged`] is
/// broadcast.
#[derive(Debug)]
pub struct LibrarySession {
    broker: Arc<CapabilityBroker>,
    inner: Arc<Mutex<SessionInner>>,
    events: broadcast::Sender<SessionEvent>,
}

impl LibrarySession {
    pub fn new(broker: Arc<CapabilityBroker>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            broker,
            inner: Arc::new(Mutex::new(SessionInner::default())),
            events,
        }
    }

    /// Subscribe to view-changed and navigation-failed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Open a library entry: activate its capability (implicitly releasing
    /// any prior one), reset the stack to the entry's root, and submit a
    /// scan.
    ///
    /// On activation failure the session is left at `Home` with no active
    /// capability, the registry entry untouched, and the failure is both
    /// returned and broadcast.
    pub async fn open_entry(&self, entry: &LibraryEntry) -> Result<()> {
        let mut inner = self.inner.lock().await;

        match self.broker.activate(&entry.capability_token).await {
            Ok(handle) => {
                debug!(path = %entry.path, root = %handle.root.display(), "opened library entry");
                inner.generation += 1;
                inner.stack.clear();
                inner.stack.push(handle.root);
                inner.view.clear();
                self.submit_scan(&mut inner);
                Ok(())
            }
            Err(e) => {
                warn!(path = %entry.path, error = %e, "failed to open library entry");
                inner.reset_to_home();
                let _ = self
                    .events
                    .send(SessionEvent::NavigationFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Push a container child onto the stack and scan it. Reuses the active
    /// capability; no broker interaction.
    pub async fn descend_into(&self, child: &DirectoryEntry) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if inner.stack.is_empty() {
            return Err(CoreError::InvalidNavigation(
                "cannot descend from the home view".to_string(),
            ));
        }
        if child.kind != EntryKind::Container {
            return Err(CoreError::InvalidNavigation(format!(
                "{} is not a container",
                child.display_name
            )));
        }

        inner.stack.push(child.location.clone());
        self.submit_scan(&mut inner);
        Ok(())
    }

    /// Pop one frame and rescan the new top. Popping the last frame behaves
    /// exactly like [`go_home`](Self::go_home).
    pub async fn go_back(&self) {
        let mut inner = self.inner.lock().await;
        inner.stack.pop();

        if inner.stack.is_empty() {
            self.broker.release_active().await;
            inner.reset_to_home();
            let _ = self.events.send(SessionEvent::ViewChanged);
        } else {
            self.submit_scan(&mut inner);
        }
    }

    /// Return to the library list: release the active capability, clear the
    /// stack, discard the last scan result. Unconditional and idempotent.
    pub async fn go_home(&self) {
        let mut inner = self.inner.lock().await;
        self.broker.release_active().await;
        inner.reset_to_home();
        let _ = self.events.send(SessionEvent::ViewChanged);
    }

    /// Snapshot of the current view (the children of the stack top, or
    /// empty at home / while the first scan is still running).
    pub async fn current_view(&self) -> Vec<DirectoryEntry> {
        self.inner.lock().await.view.clone()
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state()
    }

    /// Navigation depth; zero at home.
    pub async fn depth(&self) -> usize {
        self.inner.lock().await.stack.len()
    }

    /// Location currently being viewed, if browsing.
    pub async fn current_frame(&self) -> Option<PathBuf> {
        self.inner.lock().await.stack.last().cloned()
    }

    pub async fn is_scanning(&self) -> bool {
        self.inner.lock().await.scanning
    }

    /// Wait until no scan is outstanding. Convenience for tests and simple
    /// callers; the event stream is the real completion signal.
    pub async fn settled(&self) {
        loop {
            if !self.inner.lock().await.scanning {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    /// Submit a scan of the stack top under a fresh generation. The worker
    /// never blocks navigation: superseded results are dropped at apply
    /// time rather than cancelled.
    fn submit_scan(&self, inner: &mut SessionInner) {
        let Some(frame) = inner.stack.last().cloned() else {
            return;
        };

        inner.generation += 1;
        inner.scanning = true;
        let generation = inner.generation;

        let shared = Arc::clone(&self.inner);
        let events = self.events.clone();

        tokio::spawn(async move {
            let scan_target = frame.clone();
            let entries = tokio::task::spawn_blocking(move || scan::list_shallow(&scan_target))
                .await
                .unwrap_or_default();

            let mut inner = shared.lock().await;
            if inner.apply_scan(generation, &frame, entries) {
                let _ = events.send(SessionEvent::ViewChanged);
            } else {
                debug!(frame = %frame.display(), "discarding superseded scan result");
            }
        });
    }
}
