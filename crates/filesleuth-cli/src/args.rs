/// Command-line arguments.
use clap::{Parser, ValueEnum};
use filesleuth_core::analysis::PermissionPolicy;
use filesleuth_core::config::DEFAULT_MAX_CONCURRENCY;
use filesleuth_core::model::size::parse_size;
use filesleuth_core::ScanConfig;
use std::path::PathBuf;

/// Audit a directory tree: file types, space per category, unusual
/// permissions and large files.
///
/// Without a DIRECTORY argument the tool prompts for one interactively.
#[derive(Parser, Debug)]
#[command(name = "filesleuth", version, about, long_about = None)]
pub struct Cli {
    /// Directory to audit.
    pub directory: Option<PathBuf>,

    /// Large-file threshold, in bytes or with a unit (500K, 100M, 2GiB).
    #[arg(short, long, value_parser = parse_threshold)]
    pub threshold: Option<u64>,

    /// Number of files inspected concurrently.
    #[arg(short = 'j', long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub concurrency: usize,

    /// Threads used to walk directories (defaults to the CPU count).
    #[arg(long)]
    pub walk_threads: Option<usize>,

    /// Rule used to flag unusual permissions.
    #[arg(long, value_enum, default_value_t = PolicyArg::AllowList)]
    pub policy: PolicyArg,

    /// Number of largest files listed in the summary.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Write the full result as JSON to this file.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write one row per file as CSV to this file.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// File receiving error-level log events (truncated on start).
    #[arg(long, value_name = "PATH", default_value = "error_log.txt")]
    pub log_file: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored log output.
    #[arg(long)]
    pub no_color: bool,
}

/// Permission policy as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Flag any mode outside 600, 644, 700, 744 and 755.
    AllowList,
    /// Flag world-writable or world-executable files (world-read alone is not flagged).
    OtherAccess,
}

impl From<PolicyArg> for PermissionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::AllowList => Self::AllowList,
            PolicyArg::OtherAccess => Self::OtherAccess,
        }
    }
}

impl Cli {
    /// Scan settings implied by the flags.
    ///
    /// An interactive threshold overrides `size_threshold` per run.
    pub fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::default()
            .with_max_concurrency(self.concurrency)
            .with_permission_policy(self.policy.into());
        if let Some(threshold) = self.threshold {
            config = config.with_size_threshold(threshold);
        }
        if let Some(threads) = self.walk_threads {
            config = config.with_walk_threads(threads);
        }
        config
    }
}

fn parse_threshold(input: &str) -> Result<u64, String> {
    parse_size(input).ok_or_else(|| format!("invalid size '{input}' (try 1048576, 500K or 100M)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use filesleuth_core::config::DEFAULT_SIZE_THRESHOLD;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["filesleuth"]).unwrap();
        assert!(cli.directory.is_none());
        assert_eq!(cli.log_file, PathBuf::from("error_log.txt"));

        let config = cli.scan_config();
        assert_eq!(config.size_threshold, DEFAULT_SIZE_THRESHOLD);
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(config.permission_policy, PermissionPolicy::AllowList);
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "filesleuth",
            "/srv",
            "--threshold",
            "2M",
            "-j",
            "4",
            "--walk-threads",
            "1",
            "--policy",
            "other-access",
        ])
        .unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("/srv")));

        let config = cli.scan_config();
        assert_eq!(config.size_threshold, 2 * 1024 * 1024);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.walk_threads, 1);
        assert_eq!(config.permission_policy, PermissionPolicy::OtherAccess);
    }

    #[test]
    fn bad_threshold_is_a_usage_error() {
        assert!(Cli::try_parse_from(["filesleuth", "--threshold", "lots"]).is_err());
        assert!(Cli::try_parse_from(["filesleuth", "--policy", "strict"]).is_err());
    }
}
