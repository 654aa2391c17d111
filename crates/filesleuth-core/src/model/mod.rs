/// Data model for FileSleuth scan results.
///
/// Re-exports the per-file record types and size helpers.
pub mod record;
pub mod size;

pub use record::{FileEntry, FileRecord, PermissionFlag};
