/// FileSleuth Core: scanning, aggregation, and reporting.
///
/// This crate contains all auditing logic with no terminal I/O.
/// Frontends (the CLI today) drive it through [`Scanner`] or
/// [`start_scan`] and present the resulting [`ScanResult`].
///
/// # Modules
///
/// - [`model`]: File records, permission flags, and size formatting.
/// - [`scanner`]: Bounded-parallel traversal with progress reporting.
/// - [`analysis`]: Extension categories, permission policies, size ranking.
/// - [`config`]: Scan settings with validation.
/// - [`report`]: JSON and CSV export of a finished scan.
/// - [`error`]: Scan, report, and per-file failure types.
pub mod analysis;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod scanner;

pub use config::ScanConfig;
pub use error::{FailureKind, InspectFailure, ReportError, ScanError};
pub use scanner::{scan, start_scan, ScanHandle, ScanResult, Scanner};
