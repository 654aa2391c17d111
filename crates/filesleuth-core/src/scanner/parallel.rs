/// Bounded-parallel traversal engine.
///
/// Three kinds of thread cooperate for one scan:
///
/// ```text
/// dispatcher ──paths──▶ [bounded job queue] ──▶ inspector × max_concurrency
///     │                                               │
///     └──walk failures──▶ [outcome channel] ◀──results┘
///                               │
///                          coordinator (calling thread)
///                               │ batched write lock
///                               ▼
///                         LiveAccumulator
/// ```
///
/// - The **dispatcher** walks the tree with `jwalk` (or replays an explicit
///   path list) and pushes candidate files into a bounded queue, so
///   enumeration never runs far ahead of inspection.
/// - Exactly `max_concurrency` **inspectors** stat one file at a time,
///   which caps concurrent metadata reads (and descriptors).
/// - The **coordinator** is the only writer of the accumulator. Outcomes
///   are buffered locally and flushed under a single write lock per batch,
///   the same lock-pressure trade-off the live view has always made.
///
/// The coordinator's receive loop ends only once the dispatcher and every
/// inspector have dropped their senders; that is the completion barrier.
/// Threads are then joined and the accumulator is finalised.
use crate::config::ScanConfig;
use crate::error::{FailureKind, InspectFailure, ScanError};
use crate::scanner::accumulator::ScanResult;
use crate::scanner::inspect::{inspect, FileInspection, InspectSettings};
use crate::scanner::progress::ScanProgress;
use crate::scanner::LiveAccumulator;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, error};

/// Outcomes buffered before taking the accumulator write lock.
const BATCH_SIZE: usize = 512;

/// Send a progress update every this many outcomes.
const PROGRESS_INTERVAL: u64 = 1_000;

/// Job queue slots per inspector.
const QUEUE_SLOTS_PER_WORKER: usize = 4;

/// Where the dispatcher gets its paths from.
pub(crate) enum PathSource {
    /// Recursively enumerate regular files under a root directory.
    Walk(PathBuf),
    /// Paths enumerated by someone else.
    List(Vec<PathBuf>),
}

/// One message on the outcome channel.
enum Outcome {
    Inspected(FileInspection),
    Failed(InspectFailure),
    /// A directory (or the entry inside it) could not be read; its subtree
    /// is skipped.
    WalkFailed(InspectFailure),
}

/// Borrowed per-scan state from the [`Scanner`](super::Scanner).
pub(crate) struct EngineContext<'a> {
    pub config: &'a ScanConfig,
    pub cancel_flag: &'a AtomicBool,
    pub progress_tx: Option<&'a Sender<ScanProgress>>,
    pub live: &'a LiveAccumulator,
}

/// Run one scan to completion (or cancellation) and return the result.
///
/// The caller is responsible for resetting `ctx.live` beforehand.
pub(crate) fn run(source: PathSource, ctx: &EngineContext<'_>) -> Result<ScanResult, ScanError> {
    let start = Instant::now();
    let workers = ctx.config.max_concurrency;
    let walk_threads = ctx.config.walk_threads;
    let settings = InspectSettings::from(ctx.config);
    let cancel_flag = ctx.cancel_flag;

    let cancelled = thread::scope(|s| -> Result<bool, ScanError> {
        // Created inside the scope so an early return drops the receivers
        // and unblocks any thread already spawned.
        let (job_tx, job_rx) = bounded::<PathBuf>(workers * QUEUE_SLOTS_PER_WORKER);
        let (outcome_tx, outcome_rx) = bounded::<Outcome>(workers * QUEUE_SLOTS_PER_WORKER);

        let dispatcher = {
            let outcome_tx = outcome_tx.clone();
            thread::Builder::new()
                .name("filesleuth-dispatch".into())
                .spawn_scoped(s, move || {
                    dispatch(source, walk_threads, job_tx, outcome_tx, cancel_flag)
                })
                .map_err(|source| ScanError::Spawn {
                    role: "dispatcher",
                    source,
                })?
        };

        let mut inspectors = Vec::with_capacity(workers);
        for id in 0..workers {
            let job_rx = job_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("filesleuth-inspect-{id}"))
                .spawn_scoped(s, move || {
                    for path in job_rx.iter() {
                        let outcome = match inspect(&path, &settings) {
                            Ok(Some(inspection)) => Outcome::Inspected(inspection),
                            Ok(None) => {
                                debug!("Skipping symlinked directory {}", path.display());
                                continue;
                            }
                            Err(failure) => Outcome::Failed(failure),
                        };
                        if outcome_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                })
                .map_err(|source| ScanError::Spawn {
                    role: "inspector",
                    source,
                })?;
            inspectors.push(handle);
        }

        // Only the threads may hold these now, or the barrier never falls.
        drop(job_rx);
        drop(outcome_tx);

        coordinate(&outcome_rx, ctx);

        let cancelled = dispatcher
            .join()
            .map_err(|_| ScanError::WorkerPanicked("dispatcher"))?;
        for handle in inspectors {
            handle
                .join()
                .map_err(|_| ScanError::WorkerPanicked("inspector"))?;
        }
        Ok(cancelled)
    })?;

    let duration = start.elapsed();
    let accumulator = std::mem::take(&mut *ctx.live.write());
    debug!(
        "Scan barrier passed after {duration:?}: {} files, {} failures",
        accumulator.files_scanned(),
        accumulator.failure_count()
    );
    Ok(accumulator.finalize(duration, cancelled))
}

/// Feed the job queue. Returns `true` if the scan was cancelled.
fn dispatch(
    source: PathSource,
    walk_threads: usize,
    job_tx: Sender<PathBuf>,
    outcome_tx: Sender<Outcome>,
    cancel_flag: &AtomicBool,
) -> bool {
    let mut dispatched: u64 = 0;

    match source {
        PathSource::List(paths) => {
            for path in paths {
                if cancel_flag.load(Ordering::Relaxed) {
                    debug!("Cancelled after dispatching {dispatched} paths");
                    return true;
                }
                if job_tx.send(path).is_err() {
                    break;
                }
                dispatched += 1;
            }
        }
        PathSource::Walk(root) => {
            let parallelism = if walk_threads <= 1 {
                jwalk::Parallelism::Serial
            } else {
                jwalk::Parallelism::RayonNewPool(walk_threads)
            };
            let walker = jwalk::WalkDir::new(&root)
                .skip_hidden(false)
                .follow_links(false)
                .parallelism(parallelism);

            for entry_result in walker {
                if cancel_flag.load(Ordering::Relaxed) {
                    debug!("Cancelled after dispatching {dispatched} files");
                    return true;
                }

                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(err) => {
                        let failure = walk_failure(&root, &err);
                        if outcome_tx.send(Outcome::WalkFailed(failure)).is_err() {
                            break;
                        }
                        continue;
                    }
                };

                // The root is the directory being scanned, even when it is
                // reached through a symlink.
                if entry.depth == 0 {
                    continue;
                }
                // Directories are descended, not recorded. Symlinks are
                // dispatched and stat'd through the link; the inspector
                // skips those that resolve to a directory, which is never
                // descended. Sockets, FIFOs and devices are skipped.
                let file_type = entry.file_type();
                if !(file_type.is_file() || file_type.is_symlink()) {
                    continue;
                }
                if job_tx.send(entry.path()).is_err() {
                    break;
                }
                dispatched += 1;
            }
        }
    }

    debug!("Dispatch complete: {dispatched} paths");
    cancel_flag.load(Ordering::Relaxed)
}

fn walk_failure(root: &Path, err: &jwalk::Error) -> InspectFailure {
    let path = err.path().unwrap_or(root);
    match err.io_error() {
        Some(io_err) => InspectFailure::from_io(path, io_err),
        None => InspectFailure::new(path, FailureKind::Unknown(None), err.to_string()),
    }
}

/// Drain the outcome channel into the live accumulator until every sender
/// has hung up.
fn coordinate(outcome_rx: &Receiver<Outcome>, ctx: &EngineContext<'_>) {
    let mut pending: Vec<Outcome> = Vec::with_capacity(BATCH_SIZE);
    let mut seen: u64 = 0;
    let mut files_scanned: u64 = 0;
    let mut bytes_scanned: u64 = 0;
    let mut failures: u64 = 0;

    for outcome in outcome_rx.iter() {
        seen += 1;
        let current_path = match &outcome {
            Outcome::Inspected(inspection) => {
                files_scanned += 1;
                bytes_scanned += inspection.record.size;
                &inspection.record.path
            }
            Outcome::Failed(failure) | Outcome::WalkFailed(failure) => {
                failures += 1;
                report_failure(failure, matches!(outcome, Outcome::WalkFailed(_)), ctx);
                &failure.path
            }
        };

        if seen % PROGRESS_INTERVAL == 0 {
            if let Some(tx) = ctx.progress_tx {
                let _ = tx.send(ScanProgress::Update {
                    files_scanned,
                    bytes_scanned,
                    failures,
                    current_path: current_path.to_string_lossy().into_owned(),
                });
            }
        }

        pending.push(outcome);
        // Flush on a full batch, or whenever the channel runs dry so the
        // live view never lags far behind a slow scan.
        if pending.len() >= BATCH_SIZE || outcome_rx.is_empty() {
            flush_pending(ctx.live, &mut pending);
        }
    }

    flush_pending(ctx.live, &mut pending);
}

/// Merge `pending` under a single write-lock acquisition.
#[inline]
fn flush_pending(live: &LiveAccumulator, pending: &mut Vec<Outcome>) {
    if pending.is_empty() {
        return;
    }
    let mut accumulator = live.write();
    for outcome in pending.drain(..) {
        match outcome {
            Outcome::Inspected(inspection) => accumulator.merge(inspection),
            Outcome::Failed(failure) | Outcome::WalkFailed(failure) => {
                accumulator.record_failure(failure)
            }
        }
    }
}

/// One structured error event per failure, plus a progress message.
fn report_failure(failure: &InspectFailure, during_walk: bool, ctx: &EngineContext<'_>) {
    if during_walk {
        error!(
            path = %failure.path.display(),
            kind = failure.kind.tag(),
            code = ?failure.code(),
            "directory enumeration failed"
        );
    } else {
        error!(
            path = %failure.path.display(),
            kind = failure.kind.tag(),
            code = ?failure.code(),
            "file inspection failed"
        );
    }

    if let Some(tx) = ctx.progress_tx {
        let _ = tx.send(ScanProgress::Error {
            path: failure.path.to_string_lossy().into_owned(),
            kind: failure.kind,
            message: failure.message.clone(),
        });
    }
}
