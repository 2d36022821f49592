use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::models::settings::SettingsCommit;
use crate::store::traits::SettingsStore;

/// Debounces viewport commits.
///
/// Each `schedule` replaces the pending payload and restarts the quiet
/// period; `poll` releases the payload once the period has elapsed without
/// another schedule. Time is passed in by the caller, so "N rapid updates
/// produce exactly one commit" is testable without sleeping.
#[derive(Debug, Clone)]
pub struct CommitScheduler {
    quiet_period: Duration,
    pending: Option<SettingsCommit>,
    deadline: Option<Instant>,
}

impl CommitScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            deadline: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Queue `payload`, superseding anything not yet released.
    pub fn schedule(&mut self, payload: SettingsCommit, now: Instant) {
        self.pending = Some(payload);
        self.deadline = Some(now + self.quiet_period);
    }

    /// Release the pending payload if the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SettingsCommit> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Release the pending payload immediately (explicit slider release).
    pub fn flush(&mut self) -> Option<SettingsCommit> {
        self.deadline = None;
        self.pending.take()
    }

    /// Drop the pending payload without committing it.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for CommitScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

/// Writes released commits to the settings store, fire-and-forget.
///
/// Writes run on the current tokio runtime and are never awaited by the
/// render path. Failures are logged and swallowed; the next interaction
/// naturally retries. A write already in flight is not cancelled, and the
/// store keeps whichever write lands last.
pub struct SettingsCommitter {
    store: Arc<dyn SettingsStore>,
    scope: String,
    sequence: AtomicU64,
}

impl SettingsCommitter {
    pub fn new(store: Arc<dyn SettingsStore>, scope: impl Into<String>) -> Self {
        Self {
            store,
            scope: scope.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Number of dispatches started so far.
    pub fn dispatched(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Spawn the write. Returns the task handle (callers may ignore it),
    /// or `None` when no runtime is available.
    pub fn dispatch(&self, commit: SettingsCommit) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("Settings commit for '{}' dropped: no async runtime ({e})", self.scope);
                return None;
            }
        };

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let store = Arc::clone(&self.store);
        let scope = self.scope.clone();
        log::debug!("Dispatching settings commit #{seq} for '{scope}' to {}", store.name());

        Some(handle.spawn(async move {
            if let Err(e) = store.save(&scope, &commit).await {
                log::warn!("Settings commit #{seq} for '{scope}' failed: {e}");
            }
        }))
    }
}

impl std::fmt::Debug for SettingsCommitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsCommitter")
            .field("store", &self.store.name())
            .field("scope", &self.scope)
            .field("dispatched", &self.dispatched())
            .finish()
    }
}
