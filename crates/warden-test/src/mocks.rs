//! Fake authorities and clocks.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use warden_core::{Clock, VfsPath};
use warden_vfs::{AccessRequest, Action, Authority};

/// One question put to a [`RecordingAuthority`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The action asked about.
    pub action: Action,
    /// Normalized target path.
    pub path: VfsPath,
    /// Destination of a two-path operation.
    pub destination: Option<VfsPath>,
}

/// Authority that records every request and answers with a fixed verdict.
///
/// Clones share the same log, so one copy can be attached to a store while
/// the test keeps another to inspect.
#[derive(Debug, Clone)]
pub struct RecordingAuthority {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    verdict: bool,
}

impl Default for RecordingAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingAuthority {
    /// Records and allows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            verdict: true,
        }
    }

    /// Records and denies.
    #[must_use]
    pub fn denying() -> Self {
        Self {
            verdict: false,
            ..Self::new()
        }
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Just the actions, oldest first.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        self.calls().into_iter().map(|c| c.action).collect()
    }

    /// How many times `action` was asked about.
    #[must_use]
    pub fn count(&self, action: Action) -> usize {
        self.calls().iter().filter(|c| c.action == action).count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

impl Authority for RecordingAuthority {
    fn check(&self, request: &AccessRequest<'_>) -> bool {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                action: request.action,
                path: request.path.clone(),
                destination: request.destination().cloned(),
            });
        }
        self.verdict
    }
}

/// Authority that denies a fixed set of actions and allows the rest.
#[derive(Debug, Clone, Default)]
pub struct DenyActions {
    denied: HashSet<Action>,
}

impl DenyActions {
    /// Deny exactly `actions`.
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            denied: actions.into_iter().collect(),
        }
    }

    /// Also deny `action`.
    #[must_use]
    pub fn and(mut self, action: Action) -> Self {
        self.denied.insert(action);
        self
    }
}

impl Authority for DenyActions {
    fn check(&self, request: &AccessRequest<'_>) -> bool {
        !self.denied.contains(&request.action)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Start at `millis`.
    #[must_use]
    pub fn at(millis: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Jump to `millis`.
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    /// Move forward by `millis`, saturating.
    pub fn advance(&self, millis: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(millis))
            });
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
