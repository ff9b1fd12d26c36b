// Parser Port (Interface)
// Turns a backing file into the parsed pipeline output

use crate::domain::ParsedData;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot read '{path}': {message}")]
    Io { path: PathBuf, message: String },

    #[error("Malformed file '{path}': {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Parser trait
///
/// Implementations:
/// - JsonParser (infra-fs): JSON rendering of the pipeline output
#[async_trait]
pub trait Parser: Send + Sync {
    /// Parse the file at `path`
    ///
    /// # Errors
    /// - ParseError::Io if the file cannot be read
    /// - ParseError::Malformed if the content is not valid pipeline output
    async fn parse(&self, path: &Path) -> Result<ParsedData, ParseError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Parser serving canned results keyed by file name
    #[derive(Default)]
    pub struct StaticParser {
        files: HashMap<String, ParsedData>,
        parsed_paths: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl StaticParser {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(mut self, filename: impl Into<String>, data: ParsedData) -> Self {
            self.files.insert(filename.into(), data);
            self
        }

        pub fn parsed_paths(&self) -> Vec<PathBuf> {
            self.parsed_paths.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Parser for StaticParser {
        async fn parse(&self, path: &Path) -> Result<ParsedData, ParseError> {
            self.parsed_paths.lock().unwrap().push(path.to_path_buf());

            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            self.files
                .get(name)
                .cloned()
                .ok_or_else(|| ParseError::Malformed {
                    path: path.to_path_buf(),
                    message: "no canned data for file".to_string(),
                })
        }
    }
}
