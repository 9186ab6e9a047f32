//! In-memory capability provider that simulates grant, revocation,
//! staleness, and access budgets. Used by the crate's own tests and useful
//! to downstream crates testing against the broker without touching a real
//! platform sandbox.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use reelkit_model::ResolvedCapability;

use crate::capability::provider::CapabilityProvider;
use crate::error::{CoreError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct StubToken {
    grant_id: u64,
}

/// One begin/end access transition, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessEvent {
    Began(PathBuf),
    Ended(PathBuf),
}

#[derive(Debug, Default)]
struct StubState {
    next_id: u64,
    grants: HashMap<u64, PathBuf>,
    stale: HashSet<u64>,
    revoked: HashSet<u64>,
    denied: HashSet<PathBuf>,
    active: HashSet<PathBuf>,
    log: Vec<AccessEvent>,
    access_budget: Option<u32>,
}

/// See module docs.
#[derive(Debug, Default)]
pub struct StubCapabilityProvider {
    state: Mutex<StubState>,
}

impl StubCapabilityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many times `begin_access` may succeed before the provider
    /// reports an exhausted access budget.
    pub fn with_access_budget(self, budget: u32) -> Self {
        self.state
            .lock()
            .expect("stub state poisoned")
            .access_budget = Some(budget);
        self
    }

    /// Mark every grant for `path` stale, as if the location moved.
    pub fn mark_stale(&self, path: &Path) {
        let mut state = self.state.lock().expect("stub state poisoned");
        let ids: Vec<u64> = state
            .grants
            .iter()
            .filter(|(_, p)| p.as_path() == path)
            .map(|(id, _)| *id)
            .collect();
        state.stale.extend(ids);
    }

    /// Make every grant for `path` fail resolution from now on.
    pub fn revoke(&self, path: &Path) {
        let mut state = self.state.lock().expect("stub state poisoned");
        let ids: Vec<u64> = state
            .grants
            .iter()
            .filter(|(_, p)| p.as_path() == path)
            .map(|(id, _)| *id)
            .collect();
        state.revoked.extend(ids);
    }

    /// Keep resolution working for `path` but refuse live access, as if the
    /// underlying location was deleted.
    pub fn deny_access(&self, path: &Path) {
        self.state
            .lock()
            .expect("stub state poisoned")
            .denied
            .insert(path.to_path_buf());
    }

    /// Paths with access currently open.
    pub fn active_paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock().expect("stub state poisoned");
        state.active.iter().cloned().collect()
    }

    /// Full begin/end history, in call order.
    pub fn access_log(&self) -> Vec<AccessEvent> {
        self.state.lock().expect("stub state poisoned").log.clone()
    }
}

impl CapabilityProvider for StubCapabilityProvider {
    fn grant_scope(&self, path: &Path) -> Result<Vec<u8>> {
        let mut state = self.state.lock().expect("stub state poisoned");
        let grant_id = state.next_id;
        state.next_id += 1;
        state.grants.insert(grant_id, path.to_path_buf());

        serde_json::to_vec(&StubToken { grant_id })
            .map_err(|e| CoreError::CapabilityCreationFailed(e.to_string()))
    }

    fn resolve(&self, token: &[u8]) -> Result<ResolvedCapability> {
        let token: StubToken = serde_json::from_slice(token)
            .map_err(|e| CoreError::CapabilityResolutionFailed(format!("malformed token: {e}")))?;

        let state = self.state.lock().expect("stub state poisoned");

        if state.revoked.contains(&token.grant_id) {
            return Err(CoreError::CapabilityResolutionFailed(format!(
                "grant {} revoked",
                token.grant_id
            )));
        }

        let root = state.grants.get(&token.grant_id).cloned().ok_or_else(|| {
            CoreError::CapabilityResolutionFailed(format!("unknown grant {}", token.grant_id))
        })?;

        Ok(ResolvedCapability {
            root,
            is_stale: state.stale.contains(&token.grant_id),
        })
    }

    fn begin_access(&self, root: &Path) -> Result<()> {
        let mut state = self.state.lock().expect("stub state poisoned");

        if state.denied.contains(root) {
            return Err(CoreError::AccessDenied(format!(
                "{} is no longer accessible",
                root.display()
            )));
        }

        if let Some(budget) = state.access_budget {
            if budget == 0 {
                return Err(CoreError::AccessDenied("access budget exhausted".into()));
            }
            state.access_budget = Some(budget - 1);
        }

        state.active.insert(root.to_path_buf());
        state.log.push(AccessEvent::Began(root.to_path_buf()));
        Ok(())
    }

    fn end_access(&self, root: &Path) {
        let mut state = self.state.lock().expect("stub state poisoned");
        if state.active.remove(root) {
            state.log.push(AccessEvent::Ended(root.to_path_buf()));
        }
    }
}
