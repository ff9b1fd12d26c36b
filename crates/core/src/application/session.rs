//! Workload Session - tracks the reviewer's current work unit
//!
//! Release policy:
//! - a complete unit is marked done, then unlocked
//! - an incomplete unit is unlocked and never offered to this session again
//! - a file that cannot be built is never offered to this session again
//! - if the progress tracker fails, the unit stays current and can be
//!   released again
//!
//! Locks are released as soon as the session moves on. Going back to a
//! released unit is not supported: its in-memory decisions are gone.

use crate::application::provider::WorkUnitProvider;
use crate::domain::{DataCollection, WorkUnit};
use crate::error::Result;
use std::collections::HashSet;
use tracing::info;

/// How the previous work unit was let go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    Completed(String),
    Abandoned(String),
}

pub struct WorkloadSession {
    provider: WorkUnitProvider,
    current: Option<WorkUnit>,
    abandoned: HashSet<String>,
    workunit_number: usize,
}

impl WorkloadSession {
    pub fn new(provider: WorkUnitProvider) -> Self {
        Self {
            provider,
            current: None,
            abandoned: HashSet::new(),
            workunit_number: 0,
        }
    }

    pub fn provider(&self) -> &WorkUnitProvider {
        &self.provider
    }

    pub fn current(&self) -> Option<&WorkUnit> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut WorkUnit> {
        self.current.as_mut()
    }

    pub fn current_filename(&self) -> Option<&str> {
        self.current.as_ref().map(|unit| unit.filename())
    }

    pub fn current_data(&self) -> Option<&DataCollection> {
        self.current.as_ref().map(|unit| unit.data())
    }

    /// Number of work units this session has been handed
    pub fn workunit_number(&self) -> usize {
        self.workunit_number
    }

    /// Files this session gave up on without finishing, or could not build
    pub fn abandoned(&self) -> &HashSet<String> {
        &self.abandoned
    }

    /// Release the current unit and claim the next one
    ///
    /// # Errors
    /// - AppError::NoAvailableWork when nothing is left; the session is then
    ///   left without a current unit
    /// - AppError::Parse / AppError::Domain when the claimed file is malformed;
    ///   that file is skipped by later calls
    /// - AppError::Progress when releasing the current unit fails; the unit
    ///   stays current
    pub async fn advance(&mut self) -> Result<&mut WorkUnit> {
        self.release().await?;

        let unit = self
            .provider
            .get_workunit_excluding_failed(&mut self.abandoned)
            .await?;
        self.workunit_number += 1;
        info!(
            filename = %unit.filename(),
            workunit_number = self.workunit_number,
            "Session advanced"
        );
        Ok(self.current.insert(unit))
    }

    /// Let go of the current unit, reporting its outcome to the progress
    /// tracker. Returns `None` if there was nothing to release.
    ///
    /// The unit is only dropped once the tracker has recorded the outcome.
    pub async fn release(&mut self) -> Result<Option<Release>> {
        let Some(unit) = self.current.as_ref() else {
            return Ok(None);
        };

        let tracker = self.provider.progress_tracker();
        let filename = unit.filename().to_string();
        let complete = unit.is_complete();
        let (processed, items) = (unit.processed_count(), unit.item_count());

        if complete {
            tracker.mark_done(&filename).await?;
        }
        tracker.unlock(&filename).await?;

        self.current = None;
        let release = if complete {
            Release::Completed(filename.clone())
        } else {
            self.abandoned.insert(filename.clone());
            Release::Abandoned(filename.clone())
        };

        info!(
            filename = %filename,
            processed = processed,
            items = items,
            outcome = ?release,
            "Work unit released"
        );
        Ok(Some(release))
    }
}
