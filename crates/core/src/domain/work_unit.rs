// Work Unit Domain Model
//
// One backing file's worth of review work. The variant decides what an
// "item" is: a whole source (candidates) or a single reading (reals).

use super::data_collection::{DataCollection, SourceUnderReview};
use super::error::DomainError;
use super::observation::Reading;
use super::status::VettingStatus;
use super::vettable::VettableItem;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Review granularity of a work unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkUnitKind {
    /// Source-level vetting of unconfirmed detections
    Candidates,
    /// Reading-level vetting of confirmed objects
    Reals,
}

impl std::fmt::Display for WorkUnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkUnitKind::Candidates => write!(f, "candidates"),
            WorkUnitKind::Reals => write!(f, "reals"),
        }
    }
}

impl FromStr for WorkUnitKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "candidates" | "cands" => Ok(WorkUnitKind::Candidates),
            "reals" => Ok(WorkUnitKind::Reals),
            other => Err(DomainError::ValidationError(format!(
                "unknown work unit kind '{}'",
                other
            ))),
        }
    }
}

/// One entry of a work unit's flat item list
#[derive(Debug, Clone, Copy)]
pub enum WorkItem<'a> {
    Source {
        source_index: usize,
        source: &'a VettableItem<SourceUnderReview>,
    },
    Reading {
        source_index: usize,
        reading_index: usize,
        reading: &'a VettableItem<Reading>,
    },
}

impl WorkItem<'_> {
    pub fn status(&self) -> VettingStatus {
        match self {
            WorkItem::Source { source, .. } => source.status(),
            WorkItem::Reading { reading, .. } => reading.status(),
        }
    }

    pub fn source_index(&self) -> usize {
        match self {
            WorkItem::Source { source_index, .. } | WorkItem::Reading { source_index, .. } => {
                *source_index
            }
        }
    }
}

/// Stateful, navigable review of one backing file
#[derive(Debug, Clone)]
pub struct WorkUnit {
    filename: String,
    kind: WorkUnitKind,
    data: DataCollection,
}

impl WorkUnit {
    pub fn new(filename: impl Into<String>, kind: WorkUnitKind, data: DataCollection) -> Self {
        Self {
            filename: filename.into(),
            kind,
            data,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn kind(&self) -> WorkUnitKind {
        self.kind
    }

    pub fn data(&self) -> &DataCollection {
        &self.data
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn source_count(&self) -> usize {
        self.data.sources().len()
    }

    pub fn current_source(&self) -> &VettableItem<SourceUnderReview> {
        self.data.sources().current()
    }

    pub fn current_source_number(&self) -> usize {
        self.data.sources().index()
    }

    /// Reading count of the current source
    pub fn obs_count(&self) -> usize {
        self.current_source().item().reading_count()
    }

    pub fn current_reading(&self) -> &VettableItem<Reading> {
        self.current_source().item().current_reading()
    }

    pub fn current_obs_number(&self) -> usize {
        self.current_source().item().readings().index()
    }

    fn current_source_mut(&mut self) -> &mut VettableItem<SourceUnderReview> {
        self.data.sources_mut().current_mut()
    }

    fn current_reading_mut(&mut self) -> &mut VettableItem<Reading> {
        self.current_source_mut()
            .item_mut()
            .readings_mut()
            .current_mut()
    }

    // ------------------------------------------------------------------
    // Navigation (circular)
    // ------------------------------------------------------------------

    pub fn next_source(&mut self) {
        self.data.sources_mut().move_next();
    }

    pub fn previous_source(&mut self) {
        self.data.sources_mut().move_previous();
    }

    pub fn next_obs(&mut self) {
        self.current_source_mut().item_mut().readings_mut().move_next();
    }

    pub fn previous_obs(&mut self) {
        self.current_source_mut()
            .item_mut()
            .readings_mut()
            .move_previous();
    }

    // ------------------------------------------------------------------
    // Vetting
    // ------------------------------------------------------------------

    pub fn accept_current_item(&mut self) {
        match self.kind {
            WorkUnitKind::Candidates => self.current_source_mut().accept(),
            WorkUnitKind::Reals => self.current_reading_mut().accept(),
        }
    }

    pub fn reject_current_item(&mut self) {
        match self.kind {
            WorkUnitKind::Candidates => self.current_source_mut().reject(),
            WorkUnitKind::Reals => self.current_reading_mut().reject(),
        }
    }

    /// Move to the next item that still needs a decision.
    ///
    /// Candidates: always one step on the source cursor.
    /// Reals: scan the current source's readings (bounded by its reading
    /// count) for an unprocessed one; if none is left, step to the next
    /// source without touching that source's reading cursor.
    pub fn next_vettable_item(&mut self) {
        match self.kind {
            WorkUnitKind::Candidates => self.next_source(),
            WorkUnitKind::Reals => {
                let readings = self.current_source_mut().item_mut().readings_mut();
                for _ in 0..readings.len() {
                    readings.move_next();
                    if !readings.current().is_processed() {
                        return;
                    }
                }
                self.next_source();
            }
        }
    }

    // ------------------------------------------------------------------
    // Flat item view
    // ------------------------------------------------------------------

    /// Flat item list: one entry per source for candidates, one per
    /// (source, reading) pair in source-major order for reals
    pub fn work_items(&self) -> Vec<WorkItem<'_>> {
        let sources = self.data.sources().iter().enumerate();
        match self.kind {
            WorkUnitKind::Candidates => sources
                .map(|(source_index, source)| WorkItem::Source {
                    source_index,
                    source,
                })
                .collect(),
            WorkUnitKind::Reals => sources
                .flat_map(|(source_index, source)| {
                    source
                        .item()
                        .readings()
                        .iter()
                        .enumerate()
                        .map(move |(reading_index, reading)| WorkItem::Reading {
                            source_index,
                            reading_index,
                            reading,
                        })
                })
                .collect(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.work_items().len()
    }

    pub fn processed_count(&self) -> usize {
        self.work_items()
            .iter()
            .filter(|item| item.status().is_processed())
            .count()
    }

    /// True once every flat item has a decision
    pub fn is_complete(&self) -> bool {
        self.work_items()
            .iter()
            .all(|item| item.status().is_processed())
    }
}
