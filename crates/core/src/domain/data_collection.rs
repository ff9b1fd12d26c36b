// Data Collection - two-level navigable hierarchy built from parsed data

use super::cursor::CursorCollection;
use super::error::Result;
use super::observation::{ParsedData, Reading, SysHeader};
use super::vettable::VettableItem;

/// A Source as seen by a reviewer: its readings behind their own cursor
#[derive(Debug, Clone)]
pub struct SourceUnderReview {
    readings: CursorCollection<VettableItem<Reading>>,
}

impl SourceUnderReview {
    pub fn readings(&self) -> &CursorCollection<VettableItem<Reading>> {
        &self.readings
    }

    pub fn readings_mut(&mut self) -> &mut CursorCollection<VettableItem<Reading>> {
        &mut self.readings
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub fn current_reading(&self) -> &VettableItem<Reading> {
        self.readings.current()
    }
}

/// Navigable review state for one backing file.
///
/// Source cursor and each source's reading cursor are independent and live
/// as long as the collection.
#[derive(Debug, Clone)]
pub struct DataCollection {
    sys_header: SysHeader,
    observations: Vec<String>,
    sources: CursorCollection<VettableItem<SourceUnderReview>>,
}

impl DataCollection {
    /// Wrap every reading and source of `parsed` for review
    ///
    /// # Errors
    /// `DomainError::EmptyCollection` if there are no sources or any source
    /// has no readings
    pub fn new(parsed: ParsedData) -> Result<Self> {
        let ParsedData {
            sys_header,
            observations,
            sources,
        } = parsed;

        let wrapped = sources
            .into_iter()
            .enumerate()
            .map(|(n, source)| {
                let readings = source.readings.into_iter().map(VettableItem::new).collect();
                let readings =
                    CursorCollection::new(readings, &format!("source {} has no readings", n))?;
                Ok(VettableItem::new(SourceUnderReview { readings }))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sys_header,
            observations,
            sources: CursorCollection::new(wrapped, "parsed data contains no sources")?,
        })
    }

    pub fn sources(&self) -> &CursorCollection<VettableItem<SourceUnderReview>> {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut CursorCollection<VettableItem<SourceUnderReview>> {
        &mut self.sources
    }

    pub fn sys_header(&self) -> &SysHeader {
        &self.sys_header
    }

    pub fn observations(&self) -> &[String] {
        &self.observations
    }
}
