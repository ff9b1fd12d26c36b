// Directory lister implementation
// reason: tokio::fs so listing never blocks the runtime
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use vetting_core::error::Result;
use vetting_core::port::DirectoryLister;

/// Lists backing files in one directory.
///
/// Names are returned sorted, so "last listed" is the lexicographically
/// greatest name.
pub struct FsDirectoryLister {
    directory: PathBuf,
}

impl FsDirectoryLister {
    /// Create a lister over `directory`
    ///
    /// # Example
    /// ```ignore
    /// let lister = FsDirectoryLister::new("/data/vetting/2024A");
    /// let files = lister.list(".cands.astrom").await?;
    /// ```
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }
}

#[async_trait]
impl DirectoryLister for FsDirectoryLister {
    async fn list(&self, suffix: &str) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // Non UTF-8 names cannot match a task suffix
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(suffix) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        debug!(
            directory = %self.directory.display(),
            suffix = %suffix,
            count = names.len(),
            "Listed candidate files"
        );
        Ok(names)
    }

    fn resolve(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetting_core::AppError;

    #[tokio::test]
    async fn test_lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.cands.astrom", "a.cands.astrom", "a.reals.astrom", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.cands.astrom")).unwrap();

        let lister = FsDirectoryLister::new(dir.path());
        let names = lister.list(".cands.astrom").await.unwrap();

        assert_eq!(names, vec!["a.cands.astrom", "b.cands.astrom"]);
        assert_eq!(
            lister.resolve("a.cands.astrom"),
            dir.path().join("a.cands.astrom")
        );
    }

    #[tokio::test]
    async fn test_listing_reflects_current_directory_state() {
        let dir = tempfile::tempdir().unwrap();
        let lister = FsDirectoryLister::new(dir.path());
        assert!(lister.list(".cands.astrom").await.unwrap().is_empty());

        std::fs::write(dir.path().join("x.cands.astrom"), "{}").unwrap();
        assert_eq!(lister.list(".cands.astrom").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let lister = FsDirectoryLister::new(dir.path().join("missing"));

        let err = lister.list(".cands.astrom").await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
