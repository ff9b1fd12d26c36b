// Progress Tracker Port (Interface)
// Shared done/locked state of backing files across reviewer processes

use async_trait::async_trait;
use thiserror::Error;

/// Progress tracking errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("File '{filename}' is locked by '{owner}'")]
    FileLocked { filename: String, owner: String },

    #[error("File '{filename}' is not locked by '{owner}'")]
    NotOwner { filename: String, owner: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Progress tracker interface
///
/// Only `lock` is authoritative for ownership: two reviewers may both see a
/// file as not done, but at most one of them can lock it.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Check whether a file has been fully reviewed
    async fn is_done(&self, filename: &str) -> Result<bool, ProgressError>;

    /// Claim a file for this reviewer
    ///
    /// # Errors
    /// - ProgressError::FileLocked if another owner holds the lock
    async fn lock(&self, filename: &str) -> Result<(), ProgressError>;

    /// Release this reviewer's lock (no-op if the file is not locked)
    ///
    /// # Errors
    /// - ProgressError::NotOwner if another owner holds the lock
    async fn unlock(&self, filename: &str) -> Result<(), ProgressError>;

    /// Record that a file has been fully reviewed
    async fn mark_done(&self, filename: &str) -> Result<(), ProgressError>;

    /// Current lock holder, if any
    async fn lock_owner(&self, filename: &str) -> Result<Option<String>, ProgressError>;

    /// Owner identity used by `lock`/`unlock`
    fn owner(&self) -> &str;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    /// Calls observed by the mock, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ProgressCall {
        IsDone(String),
        Lock(String),
        Unlock(String),
        MarkDone(String),
    }

    #[derive(Debug, Default)]
    struct SharedState {
        done: HashSet<String>,
        locks: HashMap<String, String>,
    }

    /// In-memory progress tracker.
    ///
    /// Trackers created with [`InMemoryProgressTracker::for_owner`] share
    /// state, which simulates several reviewers against one file set.
    pub struct InMemoryProgressTracker {
        owner: String,
        state: Arc<Mutex<SharedState>>,
        calls: Arc<Mutex<Vec<ProgressCall>>>,
        mark_done_failure: Mutex<Option<String>>,
    }

    impl InMemoryProgressTracker {
        pub fn new(owner: impl Into<String>) -> Self {
            Self {
                owner: owner.into(),
                state: Arc::new(Mutex::new(SharedState::default())),
                calls: Arc::new(Mutex::new(Vec::new())),
                mark_done_failure: Mutex::new(None),
            }
        }

        /// Another reviewer over the same state
        pub fn for_owner(&self, owner: impl Into<String>) -> Self {
            Self {
                owner: owner.into(),
                state: Arc::clone(&self.state),
                calls: Arc::new(Mutex::new(Vec::new())),
                mark_done_failure: Mutex::new(None),
            }
        }

        pub fn preset_done(&self, filename: impl Into<String>) {
            self.state.lock().unwrap().done.insert(filename.into());
        }

        pub fn preset_locked(&self, filename: impl Into<String>, owner: impl Into<String>) {
            self.state
                .lock()
                .unwrap()
                .locks
                .insert(filename.into(), owner.into());
        }

        /// Make `mark_done` fail with a storage error until cleared with `None`
        pub fn fail_mark_done(&self, message: Option<&str>) {
            *self.mark_done_failure.lock().unwrap() = message.map(str::to_string);
        }

        pub fn calls(&self) -> Vec<ProgressCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: ProgressCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl ProgressTracker for InMemoryProgressTracker {
        async fn is_done(&self, filename: &str) -> Result<bool, ProgressError> {
            self.record(ProgressCall::IsDone(filename.to_string()));
            Ok(self.state.lock().unwrap().done.contains(filename))
        }

        async fn lock(&self, filename: &str) -> Result<(), ProgressError> {
            self.record(ProgressCall::Lock(filename.to_string()));
            let mut state = self.state.lock().unwrap();
            match state.locks.get(filename) {
                Some(owner) if owner != &self.owner => Err(ProgressError::FileLocked {
                    filename: filename.to_string(),
                    owner: owner.clone(),
                }),
                _ => {
                    state
                        .locks
                        .insert(filename.to_string(), self.owner.clone());
                    Ok(())
                }
            }
        }

        async fn unlock(&self, filename: &str) -> Result<(), ProgressError> {
            self.record(ProgressCall::Unlock(filename.to_string()));
            let mut state = self.state.lock().unwrap();
            match state.locks.get(filename) {
                Some(owner) if owner != &self.owner => Err(ProgressError::NotOwner {
                    filename: filename.to_string(),
                    owner: self.owner.clone(),
                }),
                _ => {
                    state.locks.remove(filename);
                    Ok(())
                }
            }
        }

        async fn mark_done(&self, filename: &str) -> Result<(), ProgressError> {
            self.record(ProgressCall::MarkDone(filename.to_string()));
            if let Some(message) = self.mark_done_failure.lock().unwrap().clone() {
                return Err(ProgressError::Storage(message));
            }
            self.state
                .lock()
                .unwrap()
                .done
                .insert(filename.to_string());
            Ok(())
        }

        async fn lock_owner(&self, filename: &str) -> Result<Option<String>, ProgressError> {
            Ok(self.state.lock().unwrap().locks.get(filename).cloned())
        }

        fn owner(&self) -> &str {
            &self.owner
        }
    }
}
