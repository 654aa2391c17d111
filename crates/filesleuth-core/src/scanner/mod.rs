/// Scanner module: orchestrates filesystem scanning.
///
/// Entry points:
/// - [`scan`]: blocking one-shot scan with default settings.
/// - [`Scanner`]: configured, reusable, cancellable; scans a root
///   ([`Scanner::scan`]) or a pre-enumerated path list
///   ([`Scanner::scan_paths`]).
/// - [`start_scan`]: runs a [`Scanner`] on a background thread and hands
///   back a [`ScanHandle`] with a progress channel.
///
/// Every scan writes into a **shared `LiveAccumulator`**
/// (`Arc<RwLock<ScanAccumulator>>`) that is reset when the scan starts and
/// drained into the [`ScanResult`] when it ends, so a frontend can read
/// partial totals while the scan is running.
pub mod accumulator;
pub mod inspect;
pub mod parallel;
pub mod progress;

pub use accumulator::{CategorySummary, ScanAccumulator, ScanResult};
pub use inspect::{inspect, FileInspection, InspectSettings};

use crate::config::ScanConfig;
use crate::error::ScanError;
use parallel::{EngineContext, PathSource};
use progress::ScanProgress;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::info;

/// A shared, concurrently-readable accumulator.
///
/// The coordinator holds the write lock briefly when merging a batch of
/// results. Frontends take the read lock to show live totals.
pub type LiveAccumulator = Arc<RwLock<ScanAccumulator>>;

/// Maximum number of progress messages that may queue up in the channel.
///
/// A frontend that falls behind stalls the coordinator briefly rather than
/// letting the queue consume unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Scan `directory` with default settings and the given large-file threshold.
pub fn scan(directory: impl AsRef<Path>, size_threshold: u64) -> Result<ScanResult, ScanError> {
    Scanner::new(ScanConfig::default().with_size_threshold(size_threshold))?.scan(directory)
}

/// `root` must be an existing directory. A root that exists but cannot be
/// stat'd is an I/O error rather than an invalid directory.
fn check_root(root: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::InvalidDirectory {
            path: root.to_path_buf(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ScanError::InvalidDirectory {
                path: root.to_path_buf(),
            })
        }
        Err(err) => Err(ScanError::Io(err)),
    }
}

/// A configured scanner.
///
/// Cancellation is sticky: once [`cancel`](Self::cancel) is called every
/// later scan on this scanner returns immediately with a partial result.
pub struct Scanner {
    config: ScanConfig,
    cancel_flag: Arc<AtomicBool>,
    progress_tx: Option<Sender<ScanProgress>>,
    live: LiveAccumulator,
}

impl Scanner {
    /// Fails with [`ScanError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            progress_tx: None,
            live: Arc::new(RwLock::new(ScanAccumulator::default())),
        })
    }

    /// Report progress on `tx` during scans.
    pub fn with_progress(mut self, tx: Sender<ScanProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Flag shared with the dispatcher; storing `true` stops new dispatches.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel_flag.clone()
    }

    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn live(&self) -> LiveAccumulator {
        self.live.clone()
    }

    /// Recursively scan `root`.
    ///
    /// Fails with [`ScanError::InvalidDirectory`] before any work is
    /// dispatched if `root` is missing or not a directory. Per-file
    /// failures never fail the scan; they are in [`ScanResult::failures`].
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<ScanResult, ScanError> {
        let root = root.as_ref();
        check_root(root)?;
        info!(
            "Starting scan of {} (threshold {} bytes, {} inspectors, {} policy)",
            root.display(),
            self.config.size_threshold,
            self.config.max_concurrency,
            self.config.permission_policy.label()
        );
        self.run(PathSource::Walk(root.to_path_buf()))
    }

    /// Inspect and aggregate an already-enumerated list of paths.
    ///
    /// Paths that no longer exist are reported as `NotFound` failures.
    pub fn scan_paths<I, P>(&self, paths: I) -> Result<ScanResult, ScanError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        info!("Starting scan of {} listed paths", paths.len());
        self.run(PathSource::List(paths))
    }

    fn run(&self, source: PathSource) -> Result<ScanResult, ScanError> {
        // Fresh state for every run; nothing leaks from an earlier scan.
        *self.live.write() = ScanAccumulator::default();

        let ctx = EngineContext {
            config: &self.config,
            cancel_flag: &self.cancel_flag,
            progress_tx: self.progress_tx.as_ref(),
            live: &self.live,
        };
        let result = parallel::run(source, &ctx)?;

        info!(
            "Scan {} in {:?}: {} files, {} bytes, {} failures",
            if result.cancelled { "cancelled" } else { "complete" },
            result.duration,
            result.files_scanned,
            result.total_bytes,
            result.failures.len()
        );
        if let Some(tx) = &self.progress_tx {
            let message = if result.cancelled {
                ScanProgress::Cancelled
            } else {
                ScanProgress::Complete {
                    duration: result.duration,
                    files_scanned: result.files_scanned,
                    failures: result.failures.len() as u64,
                }
            };
            let _ = tx.send(message);
        }
        Ok(result)
    }
}

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan.
    pub progress_rx: Receiver<ScanProgress>,
    /// Partial totals, populated while the scan runs. Emptied when the
    /// scan finishes; the final data comes from [`join`](Self::join).
    pub live: LiveAccumulator,
    cancel_flag: Arc<AtomicBool>,
    thread: thread::JoinHandle<Result<ScanResult, ScanError>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the scan and take its result.
    ///
    /// Undelivered progress messages are discarded; the scanner stops
    /// queueing new ones once the receiver is gone.
    pub fn join(self) -> Result<ScanResult, ScanError> {
        let Self {
            progress_rx,
            thread,
            ..
        } = self;
        drop(progress_rx);
        thread
            .join()
            .map_err(|_| ScanError::WorkerPanicked("scanner"))?
    }
}

/// Start a new scan of `root` on a background thread.
///
/// The root and the configuration are validated before the thread starts,
/// so those errors are returned here rather than from [`ScanHandle::join`].
pub fn start_scan(root: PathBuf, config: ScanConfig) -> Result<ScanHandle, ScanError> {
    check_root(&root)?;

    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let scanner = Scanner::new(config)?.with_progress(progress_tx);
    let live = scanner.live();
    let cancel_flag = scanner.cancel_flag();

    let thread = thread::Builder::new()
        .name("filesleuth-scanner".into())
        .spawn(move || scanner.scan(&root))
        .map_err(|source| ScanError::Spawn {
            role: "scanner",
            source,
        })?;

    Ok(ScanHandle {
        progress_rx,
        live,
        cancel_flag,
        thread,
    })
}
