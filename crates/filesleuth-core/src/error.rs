/// Error types for FileSleuth.
///
/// Two layers:
/// - [`ScanError`]: fatal conditions that stop a scan before (or while) it runs.
/// - [`InspectFailure`]: one file or directory that could not be read. These
///   never abort a scan; they are logged once, collected in the result, and
///   excluded from every total.
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal scan errors.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The root does not exist or is not a directory.
    #[error("invalid directory: {}", path.display())]
    InvalidDirectory { path: PathBuf },

    /// The [`ScanConfig`](crate::config::ScanConfig) failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The OS refused to create a scanner thread.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: io::Error,
    },

    /// A scanner thread panicked; the partial result is discarded.
    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),

    /// The root exists but its metadata could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while exporting a finished scan.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Classification of a per-file metadata failure.
///
/// Mapped from the platform error code so the log carries a stable tag
/// rather than an OS-specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureKind {
    /// The path vanished between enumeration and inspection (ENOENT).
    NotFound,
    /// Metadata read denied (EACCES).
    PermissionDenied,
    /// EBADF.
    BadDescriptor,
    /// EISDIR.
    IsADirectory,
    /// ENOTDIR.
    NotADirectory,
    /// EMFILE.
    TooManyOpenFiles,
    /// EIO.
    IoError,
    /// ESRCH.
    NoSuchProcess,
    /// Anything else. Keeps the raw OS code when the platform reported one.
    Unknown(Option<i32>),
}

impl FailureKind {
    /// Classify an I/O error.
    pub fn from_io(err: &io::Error) -> Self {
        if let Some(kind) = err.raw_os_error().and_then(Self::from_os_code) {
            return kind;
        }
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Unknown(err.raw_os_error()),
        }
    }

    /// Map a raw errno. Returns `None` for codes outside the taxonomy.
    #[cfg(unix)]
    pub fn from_os_code(code: i32) -> Option<Self> {
        // Identical on Linux, the BSDs and macOS.
        let kind = match code {
            2 => Self::NotFound,
            3 => Self::NoSuchProcess,
            5 => Self::IoError,
            9 => Self::BadDescriptor,
            13 => Self::PermissionDenied,
            20 => Self::NotADirectory,
            21 => Self::IsADirectory,
            24 => Self::TooManyOpenFiles,
            _ => return None,
        };
        Some(kind)
    }

    /// Windows error codes do not line up with errno; rely on `io::ErrorKind`.
    #[cfg(not(unix))]
    pub fn from_os_code(_code: i32) -> Option<Self> {
        None
    }

    /// Stable tag used in structured log events.
    pub fn tag(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::PermissionDenied => "PermissionDenied",
            Self::BadDescriptor => "BadDescriptor",
            Self::IsADirectory => "IsADirectory",
            Self::NotADirectory => "NotADirectory",
            Self::TooManyOpenFiles => "TooManyOpenFiles",
            Self::IoError => "IOError",
            Self::NoSuchProcess => "NoSuchProcess",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Human-readable description for console output.
    pub fn describe(self) -> &'static str {
        match self {
            Self::NotFound => "File or directory does not exist",
            Self::PermissionDenied => "Permission denied",
            Self::BadDescriptor => "Bad file number",
            Self::IsADirectory => "Trying to open a directory as a file",
            Self::NotADirectory => "Not a directory",
            Self::TooManyOpenFiles => "Too many open files",
            Self::IoError => "I/O error while accessing file",
            Self::NoSuchProcess => "No such process while accessing",
            Self::Unknown(_) => "Unexpected error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(Some(code)) => write!(f, "Unknown({code})"),
            other => f.write_str(other.tag()),
        }
    }
}

/// A file (or directory, during enumeration) that could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind} while reading {}: {message}", path.display())]
pub struct InspectFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    /// The platform's message, kept for diagnostics.
    pub message: String,
}

impl InspectFailure {
    pub fn from_io(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self {
            path: path.into(),
            kind: FailureKind::from_io(err),
            message: err.to_string(),
        }
    }

    pub fn new(path: &Path, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
            message: message.into(),
        }
    }

    /// The raw OS code, when the failure is an unclassified one.
    pub fn code(&self) -> Option<i32> {
        match self.kind {
            FailureKind::Unknown(code) => code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(FailureKind::from_io(&err), FailureKind::NotFound);
    }

    #[test]
    fn io_permission_denied_maps_to_permission_denied() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(FailureKind::from_io(&err), FailureKind::PermissionDenied);
    }

    #[cfg(unix)]
    #[test]
    fn raw_errno_codes_map_to_taxonomy() {
        let cases = [
            (2, FailureKind::NotFound),
            (3, FailureKind::NoSuchProcess),
            (5, FailureKind::IoError),
            (9, FailureKind::BadDescriptor),
            (13, FailureKind::PermissionDenied),
            (20, FailureKind::NotADirectory),
            (21, FailureKind::IsADirectory),
            (24, FailureKind::TooManyOpenFiles),
        ];
        for (code, expected) in cases {
            let err = io::Error::from_raw_os_error(code);
            assert_eq!(FailureKind::from_io(&err), expected, "errno {code}");
        }
    }

    /// ENOTTY is outside the taxonomy and must keep its code.
    #[cfg(unix)]
    #[test]
    fn unclassified_errno_retains_code_and_message() {
        let err = io::Error::from_raw_os_error(25);
        let failure = InspectFailure::from_io("/tmp/x", &err);
        assert_eq!(failure.kind, FailureKind::Unknown(Some(25)));
        assert_eq!(failure.code(), Some(25));
        assert!(!failure.message.is_empty());
        assert_eq!(failure.kind.to_string(), "Unknown(25)");
    }

    #[test]
    fn tags_are_stable() {
        assert_eq!(FailureKind::NotFound.tag(), "NotFound");
        assert_eq!(FailureKind::IoError.tag(), "IOError");
        assert_eq!(FailureKind::Unknown(None).to_string(), "Unknown");
    }
}
