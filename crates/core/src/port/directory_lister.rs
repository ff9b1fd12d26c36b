// Directory Lister Port (Interface)

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Lists the backing files eligible for a task
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// File names (not paths) ending with `suffix`.
    ///
    /// Re-reads the backing directory on every call; nothing is cached.
    async fn list(&self, suffix: &str) -> Result<Vec<String>>;

    /// Full path of a listed file
    fn resolve(&self, filename: &str) -> PathBuf;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Lister over a fixed set of names, returned in the given order
    pub struct StaticDirectoryLister {
        root: PathBuf,
        names: Vec<String>,
    }

    impl StaticDirectoryLister {
        pub fn new(root: impl Into<PathBuf>, names: &[&str]) -> Self {
            Self {
                root: root.into(),
                names: names.iter().map(|n| n.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl DirectoryLister for StaticDirectoryLister {
        async fn list(&self, suffix: &str) -> Result<Vec<String>> {
            Ok(self
                .names
                .iter()
                .filter(|name| name.ends_with(suffix))
                .cloned()
                .collect())
        }

        fn resolve(&self, filename: &str) -> PathBuf {
            self.root.join(filename)
        }
    }
}
