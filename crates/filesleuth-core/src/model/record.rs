/// Per-file records produced by the inspector and stored by the accumulator.
use crate::analysis::Category;
use compact_str::CompactString;
use serde::Serialize;
use std::path::PathBuf;

/// A `(path, size)` pair: the unit stored in category lists and the
/// large-file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Logical file size in bytes.
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Everything one metadata read tells us about a regular file.
///
/// Built once by the inspector and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub category: Category,
    /// Raw mode bits as reported by the platform (file type bits included).
    pub mode: u32,
    /// Lowercased extension with its leading dot, or empty.
    pub extension: CompactString,
}

impl FileRecord {
    /// Split off the `(path, size)` view used by category lists.
    pub fn entry(&self) -> FileEntry {
        FileEntry::new(self.path.clone(), self.size)
    }
}

/// A file whose permission bits were flagged by the active policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionFlag {
    pub path: PathBuf,
    /// Three-digit octal rendering, e.g. `"777"`.
    pub permissions: String,
}
