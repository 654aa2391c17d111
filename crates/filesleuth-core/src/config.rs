/// Scan configuration.
///
/// Everything the engine needs to know about a run besides the root path.
/// Defaults match the interactive tool: 100 MiB large-file threshold and
/// ten concurrent inspections.
use crate::analysis::PermissionPolicy;
use crate::error::ScanError;
use serde::{Deserialize, Serialize};

/// Default large-file threshold: 100 MiB.
pub const DEFAULT_SIZE_THRESHOLD: u64 = 104_857_600;

/// Default number of concurrent file inspections.
///
/// Each in-flight inspection may hold a descriptor while stat'ing, so this
/// also caps descriptor use on very large trees.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Upper bound for `max_concurrency`.
pub const MAX_CONCURRENCY: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Files strictly larger than this many bytes are reported as large.
    pub size_threshold: u64,
    /// Number of inspector threads.
    pub max_concurrency: usize,
    /// Threads used by the directory walk itself. `1` walks serially.
    pub walk_threads: usize,
    pub permission_policy: PermissionPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            walk_threads: num_cpus::get(),
            permission_policy: PermissionPolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn with_size_threshold(mut self, bytes: u64) -> Self {
        self.size_threshold = bytes;
        self
    }

    pub fn with_max_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrency = workers;
        self
    }

    pub fn with_walk_threads(mut self, threads: usize) -> Self {
        self.walk_threads = threads;
        self
    }

    pub fn with_permission_policy(mut self, policy: PermissionPolicy) -> Self {
        self.permission_policy = policy;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.max_concurrency == 0 {
            return Err(ScanError::InvalidConfig(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if self.max_concurrency > MAX_CONCURRENCY {
            return Err(ScanError::InvalidConfig(format!(
                "max_concurrency must not exceed {MAX_CONCURRENCY} (got {})",
                self.max_concurrency
            )));
        }
        if self.walk_threads == 0 {
            return Err(ScanError::InvalidConfig(
                "walk_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
