// Port Layer - Interfaces for external dependencies

pub mod directory_lister;
pub mod id_provider; // For deterministic testing
pub mod parser;
pub mod progress_tracker;
pub mod time_provider;

// Re-exports
pub use directory_lister::DirectoryLister;
pub use id_provider::IdProvider;
pub use parser::{ParseError, Parser};
pub use progress_tracker::{ProgressError, ProgressTracker};
pub use time_provider::TimeProvider;
