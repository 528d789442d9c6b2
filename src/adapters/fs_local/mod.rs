// Local filesystem adapter - File system operations backed by std::fs

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

fn fs_error(action: &str, path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::FsFail(format!("Failed to {} {}: {}", action, path.display(), e))
}

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    async fn is_readable(&self, path: &Path) -> bool {
        fs::File::open(path).is_ok()
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(path).map_err(|e| fs_error("create directory", path, e))
    }

    async fn file_size(&self, path: &Path) -> Result<u64, DomainError> {
        fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| fs_error("stat", path, e))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, DomainError> {
        fs::read_to_string(path).map_err(|e| fs_error("read", path, e))
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), DomainError> {
        fs::write(path, content).map_err(|e| fs_error("write", path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        fs::rename(from, to).map_err(|e| fs_error("rename", from, e))
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let entries = fs::read_dir(dir).map_err(|e| fs_error("list", dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| fs_error("list", dir, e))?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    async fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let mut files = Vec::new();
        if !dir.is_dir() {
            return Err(fs_error("walk", dir, "not a directory"));
        }
        for entry in WalkDir::new(dir).follow_links(true) {
            // Dangling links and unreadable subdirectories are skipped
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    async fn canonicalize(&self, path: &Path) -> Result<PathBuf, DomainError> {
        fs::canonicalize(path).map_err(|e| fs_error("resolve", path, e))
    }
}
