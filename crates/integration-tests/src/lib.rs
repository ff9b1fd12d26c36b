//! Fixtures shared by the end-to-end tests of vetting-core over the
//! filesystem adapters.

use std::path::Path;
use std::sync::Arc;

use vetting_core::application::{builder_for, WorkUnitProvider};
use vetting_core::domain::WorkUnitKind;
use vetting_core::port::time_provider::mocks::FixedTimeProvider;
use vetting_infra_fs::{FileProgressTracker, FsDirectoryLister, JsonParser};

pub const TASK: &str = ".cands.astrom";

/// Write a JSON pipeline output file whose sources have `reading_counts`
/// readings each
pub fn write_pipeline_file(dir: &Path, name: &str, reading_counts: &[usize]) {
    let sources: Vec<serde_json::Value> = reading_counts
        .iter()
        .enumerate()
        .map(|(s, &n)| {
            let readings: Vec<serde_json::Value> = (0..n)
                .map(|r| {
                    serde_json::json!({
                        "frame": format!("16166{}{}p22", s, r),
                        "x": 100.0 + r as f64,
                        "y": 200.0 + s as f64,
                    })
                })
                .collect();
            serde_json::json!({ "readings": readings })
        })
        .collect();

    let body = serde_json::json!({
        "sys_header": { "RMIN": "0.5", "RMAX": "10.3" },
        "observations": ["1616681p22", "1616692p22", "1616703p22"],
        "sources": sources,
    });
    std::fs::write(dir.join(name), body.to_string()).unwrap();
}

pub fn tracker(dir: &Path, owner: &str) -> Arc<FileProgressTracker> {
    Arc::new(FileProgressTracker::new(
        dir,
        owner,
        Arc::new(FixedTimeProvider(1_700_000_000_000)),
    ))
}

/// Provider for one reviewer over `dir`, markers kept in the same directory
pub fn reviewer(dir: &Path, owner: &str, kind: WorkUnitKind) -> WorkUnitProvider {
    WorkUnitProvider::new(
        TASK,
        Arc::new(FsDirectoryLister::new(dir)),
        tracker(dir, owner),
        builder_for(kind, Arc::new(JsonParser::new())),
    )
}
