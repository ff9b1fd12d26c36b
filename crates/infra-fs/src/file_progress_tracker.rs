// Marker-file progress tracker
// reason: hard-linking a fully written record is atomic across reviewer
// processes, and a marker never exists half written
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use vetting_core::application::constants::{DONE_MARKER_SUFFIX, LOCK_MARKER_SUFFIX};
use vetting_core::port::{ProgressError, ProgressTracker, TimeProvider};

/// Content of a `<filename>.lock` marker
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockRecord {
    owner: String,
    locked_at: i64,
}

/// Content of a `<filename>.done` marker
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DoneRecord {
    owner: String,
    completed_at: i64,
}

/// Progress tracker storing lock/done markers next to the backing files
/// (or in a separate progress directory)
pub struct FileProgressTracker {
    progress_dir: PathBuf,
    owner: String,
    time_provider: Arc<dyn TimeProvider>,
}

impl FileProgressTracker {
    /// Create a tracker for one reviewer
    ///
    /// # Arguments
    /// * `progress_dir` - Directory holding the markers
    /// * `owner` - Reviewer identity written into lock markers
    /// * `time_provider` - Clock for marker timestamps
    pub fn new(
        progress_dir: impl Into<PathBuf>,
        owner: impl Into<String>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            progress_dir: progress_dir.into(),
            owner: owner.into(),
            time_provider,
        }
    }

    fn marker_path(&self, filename: &str, suffix: &str) -> PathBuf {
        self.progress_dir.join(format!("{}{}", filename, suffix))
    }

    /// Per-reviewer file the lock record is written to before it is linked
    /// into place
    fn staging_path(&self, filename: &str) -> PathBuf {
        self.progress_dir.join(format!(
            "{}{}.{}{}",
            filename,
            LOCK_MARKER_SUFFIX,
            self.owner.replace(std::path::MAIN_SEPARATOR, "_"),
            STAGING_SUFFIX
        ))
    }

    /// Owner recorded in a lock marker, `None` if there is no marker
    async fn read_lock_owner(&self, path: &Path) -> Result<Option<String>, ProgressError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(
                serde_json::from_slice::<LockRecord>(&bytes)
                    .map(|record| record.owner)
                    // Marker not written by a reviewer
                    .unwrap_or_else(|_| "unknown".to_string()),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(path, e)),
        }
    }
}

const STAGING_SUFFIX: &str = ".tmp";

fn storage_error(path: &Path, err: impl std::fmt::Display) -> ProgressError {
    ProgressError::Storage(format!("{}: {}", path.display(), err))
}

async fn discard_staging(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove staged lock record"),
    }
}

#[async_trait]
impl ProgressTracker for FileProgressTracker {
    async fn is_done(&self, filename: &str) -> Result<bool, ProgressError> {
        let path = self.marker_path(filename, DONE_MARKER_SUFFIX);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| storage_error(&path, e))
    }

    async fn lock(&self, filename: &str) -> Result<(), ProgressError> {
        let path = self.marker_path(filename, LOCK_MARKER_SUFFIX);
        let staging = self.staging_path(filename);

        let record = LockRecord {
            owner: self.owner.clone(),
            locked_at: self.time_provider.now_millis(),
        };
        let bytes = serde_json::to_vec(&record).map_err(|e| storage_error(&path, e))?;
        if let Err(e) = tokio::fs::write(&staging, &bytes).await {
            discard_staging(&staging).await;
            return Err(storage_error(&staging, e));
        }

        // Fails with AlreadyExists if any reviewer holds the lock
        let linked = tokio::fs::hard_link(&staging, &path).await;
        discard_staging(&staging).await;

        match linked {
            Ok(()) => {
                info!(filename = %filename, owner = %self.owner, "Lock acquired");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let owner = self
                    .read_lock_owner(&path)
                    .await?
                    .unwrap_or_else(|| "unknown".to_string());
                if owner == self.owner {
                    debug!(filename = %filename, "Lock already held by this reviewer");
                    return Ok(());
                }
                Err(ProgressError::FileLocked {
                    filename: filename.to_string(),
                    owner,
                })
            }
            Err(e) => Err(storage_error(&path, e)),
        }
    }

    async fn unlock(&self, filename: &str) -> Result<(), ProgressError> {
        let path = self.marker_path(filename, LOCK_MARKER_SUFFIX);

        match self.read_lock_owner(&path).await? {
            None => Ok(()),
            Some(owner) if owner != self.owner => Err(ProgressError::NotOwner {
                filename: filename.to_string(),
                owner: self.owner.clone(),
            }),
            Some(_) => match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    info!(filename = %filename, owner = %self.owner, "Lock released");
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(storage_error(&path, e)),
            },
        }
    }

    async fn mark_done(&self, filename: &str) -> Result<(), ProgressError> {
        let path = self.marker_path(filename, DONE_MARKER_SUFFIX);
        let record = DoneRecord {
            owner: self.owner.clone(),
            completed_at: self.time_provider.now_millis(),
        };
        let bytes = serde_json::to_vec(&record).map_err(|e| storage_error(&path, e))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| storage_error(&path, e))?;

        info!(filename = %filename, owner = %self.owner, "Marked done");
        Ok(())
    }

    async fn lock_owner(&self, filename: &str) -> Result<Option<String>, ProgressError> {
        self.read_lock_owner(&self.marker_path(filename, LOCK_MARKER_SUFFIX))
            .await
    }

    fn owner(&self) -> &str {
        &self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetting_core::port::time_provider::mocks::FixedTimeProvider;

    fn tracker(dir: &Path, owner: &str) -> FileProgressTracker {
        FileProgressTracker::new(dir, owner, Arc::new(FixedTimeProvider(1_700_000_000_000)))
    }

    #[tokio::test]
    async fn test_lock_writes_owner_record() {
        let dir = tempfile::tempdir().unwrap();
        let alice = tracker(dir.path(), "alice");

        alice.lock("a.cands.astrom").await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("a.cands.astrom.lock")).unwrap();
        let record: LockRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.owner, "alice");
        assert_eq!(record.locked_at, 1_700_000_000_000);
        assert_eq!(
            alice.lock_owner("a.cands.astrom").await.unwrap(),
            Some("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_lock_held_by_other_owner_fails() {
        let dir = tempfile::tempdir().unwrap();
        let alice = tracker(dir.path(), "alice");
        let bob = tracker(dir.path(), "bob");

        alice.lock("a.cands.astrom").await.unwrap();
        let err = bob.lock("a.cands.astrom").await.unwrap_err();

        assert_eq!(
            err,
            ProgressError::FileLocked {
                filename: "a.cands.astrom".to_string(),
                owner: "alice".to_string(),
            }
        );
        // relocking by the holder is fine
        alice.lock("a.cands.astrom").await.unwrap();
    }

    #[tokio::test]
    async fn test_unlock_only_by_holder() {
        let dir = tempfile::tempdir().unwrap();
        let alice = tracker(dir.path(), "alice");
        let bob = tracker(dir.path(), "bob");

        alice.lock("a.cands.astrom").await.unwrap();
        assert!(matches!(
            bob.unlock("a.cands.astrom").await.unwrap_err(),
            ProgressError::NotOwner { .. }
        ));

        alice.unlock("a.cands.astrom").await.unwrap();
        assert_eq!(bob.lock_owner("a.cands.astrom").await.unwrap(), None);
        bob.lock("a.cands.astrom").await.unwrap();

        // unlocking a file nobody holds is a no-op
        alice.unlock("never-locked.cands.astrom").await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_done() {
        let dir = tempfile::tempdir().unwrap();
        let alice = tracker(dir.path(), "alice");

        assert!(!alice.is_done("a.cands.astrom").await.unwrap());
        alice.mark_done("a.cands.astrom").await.unwrap();
        assert!(alice.is_done("a.cands.astrom").await.unwrap());
        assert!(tracker(dir.path(), "bob")
            .is_done("a.cands.astrom")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_marker_counts_as_foreign_lock() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.cands.astrom.lock"), "").unwrap();

        let err = tracker(dir.path(), "alice")
            .lock("a.cands.astrom")
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::FileLocked { owner, .. } if owner == "unknown"));
    }

    #[tokio::test]
    async fn test_failed_record_write_leaves_no_lock() {
        let dir = tempfile::tempdir().unwrap();
        let alice = tracker(dir.path(), "alice");
        // a directory in the way makes writing the record fail
        std::fs::create_dir(alice.staging_path("a.cands.astrom")).unwrap();

        let err = alice.lock("a.cands.astrom").await.unwrap_err();
        assert!(matches!(err, ProgressError::Storage(_)));
        assert!(!dir.path().join("a.cands.astrom.lock").exists());
        assert_eq!(alice.lock_owner("a.cands.astrom").await.unwrap(), None);

        let bob = tracker(dir.path(), "bob");
        bob.lock("a.cands.astrom").await.unwrap();
        assert_eq!(
            alice.lock_owner("a.cands.astrom").await.unwrap(),
            Some("bob".to_string())
        );
    }

    #[tokio::test]
    async fn test_lock_leaves_only_the_marker() {
        let dir = tempfile::tempdir().unwrap();
        let alice = tracker(dir.path(), "alice");
        let bob = tracker(dir.path(), "bob");

        alice.lock("a.cands.astrom").await.unwrap();
        bob.lock("a.cands.astrom").await.unwrap_err();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.cands.astrom.lock".to_string()]);
    }
}
