/// Per-file inspection: one metadata read turned into one result value.
///
/// Inspectors run on worker threads and touch no shared state. Whatever
/// happens to the file, the caller gets back a plain value to merge.
use crate::analysis::{categorise_extension, extension_of, format_permissions, PermissionPolicy};
use crate::config::ScanConfig;
use crate::error::{FailureKind, InspectFailure};
use crate::model::FileRecord;
use std::fs::Metadata;
use std::path::Path;

/// The subset of [`ScanConfig`] an inspector needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectSettings {
    pub size_threshold: u64,
    pub policy: PermissionPolicy,
}

impl From<&ScanConfig> for InspectSettings {
    fn from(config: &ScanConfig) -> Self {
        Self {
            size_threshold: config.size_threshold,
            policy: config.permission_policy,
        }
    }
}

/// A successfully inspected regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInspection {
    pub record: FileRecord,
    /// The active policy flagged the file's mode.
    pub unusual_permissions: bool,
    /// `size > size_threshold`.
    pub exceeds_threshold: bool,
}

impl FileInspection {
    pub fn permissions(&self) -> String {
        format_permissions(self.record.mode)
    }
}

/// Stat `path` (following symlinks) and evaluate it.
///
/// Returns `Ok(None)` when the path resolves to a directory: a symlinked
/// directory is not followed, and that is not a failure.
pub fn inspect(
    path: &Path,
    settings: &InspectSettings,
) -> Result<Option<FileInspection>, InspectFailure> {
    let meta = std::fs::metadata(path).map_err(|err| InspectFailure::from_io(path, &err))?;

    if meta.is_dir() {
        return Ok(None);
    }
    if !meta.is_file() {
        return Err(InspectFailure::new(
            path,
            FailureKind::Unknown(None),
            "not a regular file",
        ));
    }

    let size = meta.len();
    let mode = mode_bits(&meta);
    let extension = extension_of(path);
    let category = categorise_extension(&extension);

    Ok(Some(FileInspection {
        unusual_permissions: settings.policy.is_unusual(mode),
        exceeds_threshold: size > settings.size_threshold,
        record: FileRecord {
            path: path.to_path_buf(),
            size,
            category,
            mode,
            extension,
        },
    }))
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

/// No mode bits off Unix: read-only files read as 0444, the rest as 0644.
#[cfg(not(unix))]
fn mode_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Category;
    use std::fs;
    use tempfile::TempDir;

    fn settings(threshold: u64) -> InspectSettings {
        InspectSettings {
            size_threshold: threshold,
            policy: PermissionPolicy::AllowList,
        }
    }

    fn write_bytes(path: &Path, n: usize) {
        fs::write(path, vec![0u8; n]).unwrap();
    }

    fn inspected(path: &Path, settings: &InspectSettings) -> FileInspection {
        inspect(path, settings)
            .unwrap()
            .expect("expected a regular file")
    }

    #[test]
    fn regular_file_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Notes.TXT");
        write_bytes(&path, 1024);

        let result = inspected(&path, &settings(100));
        assert_eq!(result.record.path, path);
        assert_eq!(result.record.size, 1024);
        assert_eq!(result.record.category, Category::Text);
        assert_eq!(result.record.extension, ".txt");
        assert!(result.exceeds_threshold);
    }

    /// The threshold is exclusive: a file of exactly that size is not large.
    #[test]
    fn size_equal_to_threshold_is_not_large() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("edge.bin");
        write_bytes(&path, 500);

        assert!(!inspected(&path, &settings(500)).exceeds_threshold);
        assert!(inspected(&path, &settings(499)).exceeds_threshold);
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gone.txt");

        let failure = inspect(&path, &settings(0)).unwrap_err();
        assert_eq!(failure.kind, FailureKind::NotFound);
        assert_eq!(failure.path, path);
    }

    #[test]
    fn directory_is_skipped_not_failed() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(inspect(tmp.path(), &settings(0)), Ok(None));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("real");
        fs::create_dir(&dir).unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&dir, &link).unwrap();

        assert_eq!(inspect(&link, &settings(0)), Ok(None));
    }

    #[cfg(unix)]
    #[test]
    fn mode_drives_the_permission_verdict() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let normal = tmp.path().join("normal.txt");
        let open = tmp.path().join("open.txt");
        write_bytes(&normal, 1);
        write_bytes(&open, 1);
        fs::set_permissions(&normal, fs::Permissions::from_mode(0o644)).unwrap();
        fs::set_permissions(&open, fs::Permissions::from_mode(0o777)).unwrap();

        let normal = inspected(&normal, &settings(0));
        let open = inspected(&open, &settings(0));
        assert!(!normal.unusual_permissions);
        assert_eq!(normal.permissions(), "644");
        assert!(open.unusual_permissions);
        assert_eq!(open.permissions(), "777");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("dangling.txt");
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), &link).unwrap();

        let failure = inspect(&link, &settings(0)).unwrap_err();
        assert_eq!(failure.kind, FailureKind::NotFound);
    }
}
