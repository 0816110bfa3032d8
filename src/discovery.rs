//! File discovery for JANA working directories
//!
//! Finds the reflection, structure and pattern files of a directory by
//! extension and derives the dataset key shared by a dataset's files.

use crate::error::{JanaError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File discovery component for a JANA working directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    directory: PathBuf,
}

impl FileDiscovery {
    /// Create a discovery instance for an existing directory
    pub fn new(directory: PathBuf) -> Result<Self> {
        if !directory.is_dir() {
            return Err(JanaError::DirectoryNotFound { path: directory });
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// All regular files `<directory>/*.<extension>`, sorted by path
    pub fn find(&self, extension: &str) -> Result<Vec<PathBuf>> {
        let directory = glob::Pattern::escape(&self.directory.to_string_lossy());
        let pattern = Path::new(&directory)
            .join(format!("*.{}", extension))
            .to_string_lossy()
            .into_owned();

        let entries = glob::glob(&pattern).map_err(|e| JanaError::Glob {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        debug!(
            "Found {} '*.{}' files in {}",
            files.len(),
            extension,
            self.directory.display()
        );
        Ok(files)
    }

    /// Whether the directory holds at least one file with the extension
    pub fn contains(&self, extension: &str) -> bool {
        self.find(extension).is_ok_and(|files| !files.is_empty())
    }
}

/// Dataset key of a file: its stem, shared across the three file types
pub fn dataset_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_by_extension_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b_phase.prf"), "").unwrap();
        fs::write(temp_dir.path().join("a_phase.prf"), "").unwrap();
        fs::write(temp_dir.path().join("a_phase.m50"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir.prf")).unwrap();

        let discovery = FileDiscovery::new(temp_dir.path().to_path_buf()).unwrap();
        let files = discovery.find("prf").unwrap();

        let names: Vec<_> = files.iter().map(|p| dataset_key(p)).collect();
        assert_eq!(names, vec!["a_phase", "b_phase"]);
        assert!(discovery.contains("m50"));
        assert!(!discovery.contains("m90"));
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        match FileDiscovery::new(missing.clone()) {
            Err(JanaError::DirectoryNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected DirectoryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_dataset_key() {
        assert_eq!(dataset_key(Path::new("/tmp/run1/sample.prf")), "sample");
        assert_eq!(dataset_key(Path::new("sample.v2.m50")), "sample.v2");
    }
}
