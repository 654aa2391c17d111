/// File type categorisation based on file extensions.
///
/// Maps each file to one of seven broad categories using a static
/// extension table. Anything the table does not list is `Other`; the
/// accumulator keeps those extensions so they can be reported.
use compact_str::CompactString;
use serde::Serialize;
use std::path::Path;

/// Broad file type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Text,
    Image,
    Executable,
    Video,
    Audio,
    Archive,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Self::Text,
        Self::Image,
        Self::Executable,
        Self::Video,
        Self::Audio,
        Self::Archive,
        Self::Other,
    ];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Executable => "Executable",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archive => "Archive",
            Self::Other => "Other",
        }
    }

    /// Lowercase key, matching the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Executable => "executable",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }
}

/// Category → extensions (lowercase, leading dot). No extension appears
/// under more than one category.
pub const EXTENSION_TABLE: &[(Category, &[&str])] = &[
    (Category::Text, &[".txt", ".log", ".md", ".csv"]),
    (
        Category::Image,
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg"],
    ),
    (Category::Executable, &[".sh", ".exe", ".bin", ".run"]),
    (Category::Video, &[".mp4", ".mkv", ".avi", ".mov"]),
    (Category::Audio, &[".mp3", ".wav", ".ogg", ".flac"]),
    (Category::Archive, &[".zip", ".tar", ".gz", ".bz2", ".7z"]),
];

/// Longest extension in the table, dot included. Anything longer is `Other`.
const MAX_KNOWN_EXTENSION: usize = 8;

/// Normalised extension of `file_name`: lowercased, with its leading dot.
///
/// Returns an empty string when there is no extension. Names that only
/// start with a dot (`.bashrc`) have none; a trailing dot (`notes.`)
/// yields `"."`.
pub fn extension_of(file_name: impl AsRef<Path>) -> CompactString {
    match file_name.as_ref().extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy();
            let mut out = CompactString::with_capacity(ext.len() + 1);
            out.push('.');
            out.push_str(&ext.to_lowercase());
            out
        }
        None => CompactString::default(),
    }
}

/// Categorise an already-normalised extension (see [`extension_of`]).
///
/// Lowers ASCII into a fixed stack buffer first, so callers holding a
/// mixed-case extension do not have to allocate.
pub fn categorise_extension(ext: &str) -> Category {
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_KNOWN_EXTENSION {
        return Category::Other;
    }

    let mut lower = [0u8; MAX_KNOWN_EXTENSION];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return Category::Other,
    };

    EXTENSION_TABLE
        .iter()
        .find(|(_, exts)| exts.contains(&lower_str))
        .map(|&(category, _)| category)
        .unwrap_or(Category::Other)
}

/// Classify a file by name or path.
pub fn classify(file_name: impl AsRef<Path>) -> Category {
    categorise_extension(&extension_of(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn classify_one_of_each_category() {
        assert_eq!(classify("document.txt"), Category::Text);
        assert_eq!(classify("image.jpg"), Category::Image);
        assert_eq!(classify("script.sh"), Category::Executable);
        assert_eq!(classify("movie.mp4"), Category::Video);
        assert_eq!(classify("audio.mp3"), Category::Audio);
        assert_eq!(classify("archive.zip"), Category::Archive);
        assert_eq!(classify("unknown.xyz"), Category::Other);
    }

    /// Every listed extension, in any case, maps back to its own category.
    #[test]
    fn every_table_extension_round_trips_case_insensitively() {
        for &(category, exts) in EXTENSION_TABLE {
            for ext in exts {
                let lower = format!("file{ext}");
                let upper = format!("FILE{}", ext.to_uppercase());
                assert_eq!(classify(&lower), category, "{lower}");
                assert_eq!(classify(&upper), category, "{upper}");
            }
        }
    }

    #[test]
    fn table_extensions_are_disjoint_and_lowercase() {
        let mut seen = HashSet::new();
        for &(_, exts) in EXTENSION_TABLE {
            for ext in exts {
                assert!(seen.insert(*ext), "{ext} listed twice");
                assert!(ext.starts_with('.'));
                assert_eq!(*ext, ext.to_lowercase());
                assert!(ext.len() <= MAX_KNOWN_EXTENSION);
            }
        }
    }

    #[test]
    fn only_the_last_dot_counts() {
        assert_eq!(classify("backup.tar.gz"), Category::Archive);
        assert_eq!(extension_of("backup.tar.gz"), ".gz");
        assert_eq!(classify("notes.txt.bak"), Category::Other);
    }

    #[test]
    fn extension_edge_cases() {
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("notes."), ".");
        assert_eq!(extension_of("/a/b/PHOTO.JPeG"), ".jpeg");
        assert_eq!(classify("Makefile"), Category::Other);
        assert_eq!(classify(".bashrc"), Category::Other);
    }

    #[test]
    fn categorise_rejects_long_and_empty() {
        assert_eq!(categorise_extension(""), Category::Other);
        assert_eq!(categorise_extension(".verylongext"), Category::Other);
        assert_eq!(categorise_extension(".PNG"), Category::Image);
    }

    #[test]
    fn labels_and_keys_cover_all() {
        for c in Category::ALL {
            assert_eq!(c.key(), c.label().to_lowercase());
        }
    }
}
