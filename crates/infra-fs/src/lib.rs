// Vetting Infrastructure - Filesystem Adapters
// Implements: DirectoryLister, ProgressTracker, Parser

pub mod file_progress_tracker;
pub mod fs_directory_lister;
pub mod json_parser;

pub use file_progress_tracker::FileProgressTracker;
pub use fs_directory_lister::FsDirectoryLister;
pub use json_parser::JsonParser;
