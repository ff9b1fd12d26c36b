// Work Unit Provider - hands a reviewer the next unclaimed work unit

use crate::application::builder::WorkUnitBuilder;
use crate::domain::WorkUnit;
use crate::error::{AppError, Result};
use crate::port::{DirectoryLister, ProgressError, ProgressTracker};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Claims backing files for one task and builds work units from them.
///
/// Candidates are tried last-listed-first. A done file is skipped, a file
/// locked by another reviewer is skipped, and the first successful lock
/// wins. The not-done check is optimistic; only `lock` decides ownership.
pub struct WorkUnitProvider {
    task_id: String,
    directory_lister: Arc<dyn DirectoryLister>,
    progress_tracker: Arc<dyn ProgressTracker>,
    builder: Arc<dyn WorkUnitBuilder>,
}

impl WorkUnitProvider {
    pub fn new(
        task_id: impl Into<String>,
        directory_lister: Arc<dyn DirectoryLister>,
        progress_tracker: Arc<dyn ProgressTracker>,
        builder: Arc<dyn WorkUnitBuilder>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            directory_lister,
            progress_tracker,
            builder,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn progress_tracker(&self) -> &Arc<dyn ProgressTracker> {
        &self.progress_tracker
    }

    pub fn directory_lister(&self) -> &Arc<dyn DirectoryLister> {
        &self.directory_lister
    }

    /// Lock and build the next available work unit
    ///
    /// # Errors
    /// - AppError::NoAvailableWork when every candidate is done or locked
    /// - AppError::Parse / AppError::Domain when the claimed file is malformed
    pub async fn get_workunit(&self) -> Result<WorkUnit> {
        self.get_workunit_excluding(&HashSet::new()).await
    }

    /// Same as [`get_workunit`](Self::get_workunit), never offering a file
    /// named in `excluded`
    pub async fn get_workunit_excluding(&self, excluded: &HashSet<String>) -> Result<WorkUnit> {
        match self.claim(excluded).await? {
            Claim::Built(unit) => Ok(unit),
            Claim::Unbuildable { error, .. } => Err(error),
        }
    }

    /// Same as [`get_workunit_excluding`](Self::get_workunit_excluding), but a
    /// file that was claimed and could not be built is added to `excluded`
    /// before its error is returned, so the next call moves past it
    pub async fn get_workunit_excluding_failed(
        &self,
        excluded: &mut HashSet<String>,
    ) -> Result<WorkUnit> {
        match self.claim(excluded).await? {
            Claim::Built(unit) => Ok(unit),
            Claim::Unbuildable { filename, error } => {
                excluded.insert(filename);
                Err(error)
            }
        }
    }

    async fn claim(&self, excluded: &HashSet<String>) -> Result<Claim> {
        let mut candidates = self.directory_lister.list(&self.task_id).await?;
        debug!(
            task_id = %self.task_id,
            candidates = candidates.len(),
            "Looking for work"
        );

        while let Some(filename) = candidates.pop() {
            if excluded.contains(&filename) {
                debug!(filename = %filename, "Skipping excluded file");
                continue;
            }

            if self.progress_tracker.is_done(&filename).await? {
                debug!(filename = %filename, "Skipping done file");
                continue;
            }

            match self.progress_tracker.lock(&filename).await {
                Ok(()) => {}
                Err(ProgressError::FileLocked { owner, .. }) => {
                    debug!(filename = %filename, owner = %owner, "Skipping locked file");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let full_path = self.directory_lister.resolve(&filename);
            return match self.builder.build_workunit(&full_path).await {
                Ok(unit) => {
                    info!(
                        filename = %filename,
                        owner = %self.progress_tracker.owner(),
                        "Work unit claimed"
                    );
                    Ok(Claim::Built(unit))
                }
                Err(error) => {
                    // Surface the bad file, but do not leave it locked
                    if let Err(unlock_err) = self.progress_tracker.unlock(&filename).await {
                        warn!(
                            filename = %filename,
                            error = %unlock_err,
                            "Failed to release lock after build failure"
                        );
                    }
                    warn!(filename = %filename, error = %error, "Work unit could not be built");
                    Ok(Claim::Unbuildable { filename, error })
                }
            };
        }

        info!(task_id = %self.task_id, "No available work");
        Err(AppError::NoAvailableWork {
            task_id: self.task_id.clone(),
        })
    }
}

/// Outcome of one pass over the candidate files
enum Claim {
    Built(WorkUnit),
    Unbuildable { filename: String, error: AppError },
}
