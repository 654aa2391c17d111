/// Console rendering of a finished scan.
use filesleuth_core::analysis::{top_files, Category};
use filesleuth_core::model::size::format_size;
use filesleuth_core::ScanResult;
use std::io::{self, Write};

const RULE: &str = "==================================================";

/// Write every report section to `out`.
pub fn render<W: Write>(out: &mut W, result: &ScanResult, top: usize) -> io::Result<()> {
    section(out, "File Type Categorization")?;
    for category in Category::ALL {
        let count = result.file_count(category);
        let bytes = result.total_for(category);
        writeln!(
            out,
            "{} ({count} files): {bytes} bytes ({})",
            category.label(),
            format_size(bytes)
        )?;
    }

    section(out, "Files with Unusual Permissions")?;
    if result.unusual_permissions.is_empty() {
        writeln!(out, "None")?;
    }
    for (i, flag) in result.unusual_permissions.iter().enumerate() {
        writeln!(
            out,
            "{}. {} (Permissions: {})",
            i + 1,
            flag.path.display(),
            flag.permissions
        )?;
    }

    section(out, "Large Files")?;
    if result.large_files.is_empty() {
        writeln!(out, "None")?;
    }
    for (i, entry) in result.large_files.iter().enumerate() {
        writeln!(
            out,
            "{}. {} ({} bytes, {})",
            i + 1,
            entry.path.display(),
            entry.size,
            format_size(entry.size)
        )?;
    }

    section(out, "Other Extensions")?;
    if result.unknown_extensions.is_empty() {
        writeln!(out, "None")?;
    }
    for (extension, paths) in &result.unknown_extensions {
        let shown = if extension.is_empty() {
            "(none)"
        } else {
            extension.as_str()
        };
        writeln!(out, "Extension: {shown} ({} files)", paths.len())?;
        for path in paths {
            writeln!(out, "  - {}", path.display())?;
        }
    }

    let largest = top_files(result, top);
    if !largest.is_empty() {
        section(out, &format!("Top {} Largest Files", largest.len()))?;
        for (i, entry) in largest.iter().enumerate() {
            writeln!(
                out,
                "{}. {} ({})",
                i + 1,
                entry.path.display(),
                format_size(entry.size)
            )?;
        }
    }

    footer(out, result)
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")
}

fn footer<W: Write>(out: &mut W, result: &ScanResult) -> io::Result<()> {
    writeln!(out)?;
    if !result.failures.is_empty() {
        writeln!(out, "{} paths could not be read:", result.failures.len())?;
        for failure in &result.failures {
            writeln!(
                out,
                "  - {}: {} ({})",
                failure.path.display(),
                failure.kind.describe(),
                failure.kind
            )?;
        }
    }
    if result.cancelled {
        writeln!(out, "Scan cancelled; results are partial.")?;
    }
    writeln!(
        out,
        "Scanned {} files ({}) in {:.2?}",
        result.files_scanned,
        format_size(result.total_bytes),
        result.duration
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use filesleuth_core::analysis::{categorise_extension, extension_of};
    use filesleuth_core::model::FileRecord;
    use filesleuth_core::scanner::{FileInspection, ScanAccumulator};
    use filesleuth_core::{FailureKind, InspectFailure};
    use std::path::Path;
    use std::time::Duration;

    fn inspection(path: &str, size: u64, mode: u32, large: bool) -> FileInspection {
        let extension = extension_of(path);
        FileInspection {
            record: FileRecord {
                path: path.into(),
                size,
                category: categorise_extension(&extension),
                mode,
                extension,
            },
            unusual_permissions: mode == 0o777,
            exceeds_threshold: large,
        }
    }

    fn rendered(result: &ScanResult) -> String {
        let mut out = Vec::new();
        render(&mut out, result, 3).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn sections_list_every_finding() {
        let mut acc = ScanAccumulator::default();
        acc.merge(inspection("/d/a.txt", 500, 0o644, false));
        acc.merge(inspection("/d/b.jpg", 2_000_000, 0o777, true));
        acc.merge(inspection("/d/data.xyz", 7, 0o644, false));
        acc.record_failure(InspectFailure::new(
            Path::new("/d/gone.txt"),
            FailureKind::NotFound,
            "No such file or directory",
        ));
        let text = rendered(&acc.finalize(Duration::from_millis(12), false));

        assert!(text.contains("File Type Categorization"));
        assert!(text.contains("Text (1 files): 500 bytes (500 B)"));
        assert!(text.contains("Image (1 files): 2000000 bytes"));
        assert!(text.contains("Video (0 files): 0 bytes"));
        assert!(text.contains("1. /d/b.jpg (Permissions: 777)"));
        assert!(text.contains("1. /d/b.jpg (2000000 bytes, 1.9 MB)"));
        assert!(text.contains("Extension: .xyz (1 files)\n  - /d/data.xyz"));
        assert!(text.contains("Top 3 Largest Files"));
        assert!(text.contains("1 paths could not be read:"));
        assert!(text.contains("/d/gone.txt: File or directory does not exist (NotFound)"));
        assert!(text.contains("Scanned 3 files"));
        assert!(!text.contains("cancelled"));
    }

    #[test]
    fn empty_result_renders_placeholders() {
        let result = ScanAccumulator::default().finalize(Duration::ZERO, true);
        let text = rendered(&result);

        assert_eq!(text.matches("None").count(), 3);
        assert!(!text.contains("Largest Files"));
        assert!(text.contains("Scan cancelled; results are partial."));
    }

    #[test]
    fn missing_extension_is_labelled() {
        let mut acc = ScanAccumulator::default();
        acc.merge(inspection("/d/Makefile", 1, 0o644, false));
        let text = rendered(&acc.finalize(Duration::ZERO, false));
        assert!(text.contains("Extension: (none) (1 files)"));
    }
}
