// Parsed Pipeline Output Domain Model
//
// Produced by a Parser port implementation; immutable once parsed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pipeline system header (key/value pairs)
pub type SysHeader = BTreeMap<String, String>;

/// One epoch's observation of a candidate object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Frame (exposure/CCD) identifier the reading was measured on
    pub frame: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mjd: Option<f64>,
}

impl Reading {
    pub fn new(frame: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            frame: frame.into(),
            x,
            y,
            mjd: None,
        }
    }
}

/// Readings hypothesised to be the same physical object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub readings: Vec<Reading>,
}

impl Source {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }
}

/// Complete parser output for one backing file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedData {
    #[serde(default)]
    pub sys_header: SysHeader,

    /// Frames the pipeline searched, in pipeline order
    #[serde(default)]
    pub observations: Vec<String>,

    pub sources: Vec<Source>,
}

impl ParsedData {
    pub fn new(sources: Vec<Source>) -> Self {
        Self {
            sys_header: SysHeader::new(),
            observations: Vec::new(),
            sources,
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Total readings across all sources
    pub fn reading_count(&self) -> usize {
        self.sources.iter().map(|s| s.readings.len()).sum()
    }
}
