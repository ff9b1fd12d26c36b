// Workflow constants (No magic values)

/// Default task suffix: candidate detections awaiting source-level review
pub const DEFAULT_TASK_SUFFIX: &str = ".cands.astrom";

/// Task suffix of confirmed objects awaiting reading-level review
pub const REALS_TASK_SUFFIX: &str = ".reals.astrom";

/// Marker suffix of a held lock
pub const LOCK_MARKER_SUFFIX: &str = ".lock";

/// Marker suffix of a fully reviewed file
pub const DONE_MARKER_SUFFIX: &str = ".done";
