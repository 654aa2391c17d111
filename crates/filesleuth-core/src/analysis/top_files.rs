/// Top-N largest files analysis.
///
/// Picks the largest individual files across every category of a finished
/// scan, for the summary line under the per-category table.
use crate::model::FileEntry;
use crate::scanner::ScanResult;

/// Get the `n` largest files from the result, largest first.
///
/// Each category list is already ranked, so only the first `n` entries of
/// each can qualify.
pub fn top_files(result: &ScanResult, n: usize) -> Vec<&FileEntry> {
    if n == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<&FileEntry> = result
        .categories
        .values()
        .flat_map(|summary| summary.files.iter().take(n))
        .collect();

    candidates.sort_unstable_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    candidates.truncate(n);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Category;
    use crate::scanner::accumulator::ScanAccumulator;
    use crate::scanner::inspect::FileInspection;
    use crate::model::FileRecord;
    use std::time::Duration;

    fn inspection(path: &str, size: u64, category: Category) -> FileInspection {
        FileInspection {
            record: FileRecord {
                path: path.into(),
                size,
                category,
                mode: 0o644,
                extension: Default::default(),
            },
            unusual_permissions: false,
            exceeds_threshold: false,
        }
    }

    fn result_with(files: &[(&str, u64, Category)]) -> ScanResult {
        let mut acc = ScanAccumulator::default();
        for &(p, s, c) in files {
            acc.merge(inspection(p, s, c));
        }
        acc.finalize(Duration::ZERO, false)
    }

    #[test]
    fn picks_largest_across_categories() {
        let result = result_with(&[
            ("/a.txt", 10, Category::Text),
            ("/b.txt", 500, Category::Text),
            ("/c.jpg", 300, Category::Image),
            ("/d.zip", 900, Category::Archive),
        ]);
        let top = top_files(&result, 2);
        let paths: Vec<_> = top.iter().map(|e| e.path.to_string_lossy().into_owned()).collect();
        assert_eq!(paths, vec!["/d.zip", "/b.txt"]);
    }

    #[test]
    fn n_larger_than_file_count_returns_everything() {
        let result = result_with(&[("/a.txt", 1, Category::Text), ("/b.mp3", 2, Category::Audio)]);
        assert_eq!(top_files(&result, 10).len(), 2);
    }

    #[test]
    fn zero_returns_empty() {
        let result = result_with(&[("/a.txt", 1, Category::Text)]);
        assert!(top_files(&result, 0).is_empty());
    }
}
