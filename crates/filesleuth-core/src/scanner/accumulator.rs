/// Per-run aggregation state and its finalised snapshot.
///
/// A [`ScanAccumulator`] is created fresh for every scan and only ever
/// mutated by the coordinator thread (see `parallel.rs`). Readers of a
/// live scan see it through the [`LiveAccumulator`](super::LiveAccumulator)
/// lock, and since every [`merge`](ScanAccumulator::merge) runs under that
/// lock a category's file list and its byte total always agree.
use crate::analysis::{rank_in_place, Category};
use crate::error::InspectFailure;
use crate::model::{FileEntry, PermissionFlag};
use crate::scanner::inspect::FileInspection;
use compact_str::CompactString;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

/// Files and byte total for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Largest first once finalised; completion order before that.
    pub files: Vec<FileEntry>,
    pub total_bytes: u64,
}

/// Mutable aggregation state for one scan.
#[derive(Debug, Default)]
pub struct ScanAccumulator {
    categories: HashMap<Category, CategorySummary>,
    unusual_permissions: Vec<PermissionFlag>,
    large_files: Vec<FileEntry>,
    unknown_extensions: HashMap<CompactString, Vec<PathBuf>>,
    failures: Vec<InspectFailure>,
    files_scanned: u64,
    bytes_scanned: u64,
}

impl ScanAccumulator {
    /// Fold one inspected file into every accumulator it belongs to.
    pub fn merge(&mut self, inspection: FileInspection) {
        let flagged = inspection
            .unusual_permissions
            .then(|| inspection.permissions());
        let FileInspection {
            record,
            exceeds_threshold,
            ..
        } = inspection;

        if record.category == Category::Other {
            self.unknown_extensions
                .entry(record.extension.clone())
                .or_default()
                .push(record.path.clone());
        }
        if let Some(permissions) = flagged {
            self.unusual_permissions.push(PermissionFlag {
                path: record.path.clone(),
                permissions,
            });
        }
        if exceeds_threshold {
            self.large_files.push(record.entry());
        }

        self.files_scanned += 1;
        self.bytes_scanned += record.size;

        let summary = self.categories.entry(record.category).or_default();
        summary.total_bytes += record.size;
        summary.files.push(FileEntry::new(record.path, record.size));
    }

    /// Keep a failure for the report. Failures touch no other accumulator.
    pub fn record_failure(&mut self, failure: InspectFailure) {
        self.failures.push(failure);
    }

    pub fn files_scanned(&self) -> u64 {
        self.files_scanned
    }

    pub fn bytes_scanned(&self) -> u64 {
        self.bytes_scanned
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Running `(file count, byte total)` for `category`.
    pub fn category_totals(&self, category: Category) -> (usize, u64) {
        self.categories
            .get(&category)
            .map(|s| (s.files.len(), s.total_bytes))
            .unwrap_or((0, 0))
    }

    /// Sort everything and freeze it into a [`ScanResult`].
    pub fn finalize(self, duration: Duration, cancelled: bool) -> ScanResult {
        let Self {
            mut categories,
            mut unusual_permissions,
            mut large_files,
            unknown_extensions,
            mut failures,
            files_scanned,
            bytes_scanned,
        } = self;

        categories
            .par_iter_mut()
            .for_each(|(_, summary)| rank_in_place(&mut summary.files));
        rank_in_place(&mut large_files);
        unusual_permissions.sort_unstable_by(|a, b| a.path.cmp(&b.path));
        failures.sort_unstable_by(|a, b| a.path.cmp(&b.path));

        let unknown_extensions = unknown_extensions
            .into_iter()
            .map(|(ext, mut paths)| {
                paths.sort_unstable();
                (ext, paths)
            })
            .collect();

        ScanResult {
            categories: categories.into_iter().collect(),
            unusual_permissions,
            large_files,
            unknown_extensions,
            failures,
            files_scanned,
            total_bytes: bytes_scanned,
            duration,
            cancelled,
        }
    }
}

/// The read-only outcome of a scan, handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Only categories that received at least one file are present.
    pub categories: BTreeMap<Category, CategorySummary>,
    /// Sorted by path.
    pub unusual_permissions: Vec<PermissionFlag>,
    /// Largest first.
    pub large_files: Vec<FileEntry>,
    /// Extension (with dot, possibly empty) → paths, both sorted.
    pub unknown_extensions: BTreeMap<CompactString, Vec<PathBuf>>,
    /// Files and directories that could not be read, sorted by path.
    pub failures: Vec<InspectFailure>,
    pub files_scanned: u64,
    pub total_bytes: u64,
    pub duration: Duration,
    /// The scan was stopped early; totals cover what finished before that.
    pub cancelled: bool,
}

impl ScanResult {
    pub fn category(&self, category: Category) -> Option<&CategorySummary> {
        self.categories.get(&category)
    }

    /// Byte total for `category`, zero when it has no files.
    pub fn total_for(&self, category: Category) -> u64 {
        self.category(category).map_or(0, |s| s.total_bytes)
    }

    pub fn file_count(&self, category: Category) -> usize {
        self.category(category).map_or(0, |s| s.files.len())
    }
}
