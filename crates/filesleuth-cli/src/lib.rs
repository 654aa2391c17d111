/// FileSleuth CLI: prompt loop, argument parsing, and console output.
///
/// All scanning happens in `filesleuth-core`; this crate only collects
/// input, reports progress, and presents the result.
pub mod app;
pub mod args;
pub mod logging;
pub mod prompt;
pub mod render;

pub use app::{audit, run, session, ReportOptions};
pub use args::Cli;
