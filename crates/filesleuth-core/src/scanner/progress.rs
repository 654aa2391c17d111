/// Scan progress reporting: lightweight messages sent from the scan
/// threads to the frontend via a crossbeam channel.
use crate::error::FailureKind;
use std::time::Duration;

/// Progress updates sent while a scan runs.
///
/// The aggregated data lives in the shared `LiveAccumulator`; these
/// messages carry only counters and status flags.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update {
        files_scanned: u64,
        bytes_scanned: u64,
        failures: u64,
        current_path: String,
    },
    /// A non-fatal failure (one file or one directory).
    Error {
        path: String,
        kind: FailureKind,
        message: String,
    },
    /// Scanning completed. The result is returned by `ScanHandle::join`.
    Complete {
        duration: Duration,
        files_scanned: u64,
        failures: u64,
    },
    /// Scan was cancelled; a partial result is still returned.
    Cancelled,
}
