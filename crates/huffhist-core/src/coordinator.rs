use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crate::config::BuildConfig;
use crate::error::{HistError, HistResult};
use crate::histogram::Histogram;
use crate::reader::BlockReader;
use crate::worker::{Outcome, Worker};

/// Lifecycle of a [`Coordinator`]. `Succeeded` and `Failed` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl CoordinatorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CoordinatorState::Succeeded | CoordinatorState::Failed)
    }
}

/// Owns the worker pool for one build and is the only writer of the
/// global histogram.
///
/// ## Drain Rule
/// Every spawned worker reports exactly once over a single channel and the
/// coordinator receives until each of them has been heard from (or has died),
/// then joins every thread. It never returns while a worker may still be
/// reading the caller's stream.
pub struct Coordinator {
    config: BuildConfig,
    state: CoordinatorState,
}

impl Coordinator {
    pub fn new(config: BuildConfig) -> HistResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: CoordinatorState::Idle,
        })
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds the histogram of `stream` with the configured worker pool.
    ///
    /// On success the stream has been read to its end. On failure the first
    /// error observed is returned and the stream position is unspecified.
    pub fn run<R: Read + Send>(&mut self, stream: R) -> HistResult<Histogram> {
        if self.state != CoordinatorState::Idle {
            return Err(HistError::Spent(self.state));
        }

        let workers = self.config.workers;
        let block_size = self.config.block_size;
        let reader = BlockReader::new(stream, block_size)?;
        let cores = if self.config.pin_workers {
            core_affinity::get_core_ids().unwrap_or_default()
        } else {
            Vec::new()
        };
        if self.config.pin_workers && cores.is_empty() {
            tracing::warn!("core pinning requested but no core ids are available");
        }

        self.state = CoordinatorState::Running;
        tracing::info!("building histogram: {} workers, {} byte blocks", workers, block_size);
        let started = Instant::now();

        let mut merge = Merge::new(workers);
        let (tx, rx) = mpsc::sync_channel::<Outcome>(workers);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let tx = tx.clone();
                let reader = &reader;
                let core = if cores.is_empty() { None } else { cores.get(id % cores.len()).copied() };

                let spawned = thread::Builder::new()
                    .name(format!("huffhist-worker-{}", id))
                    .spawn_scoped(scope, move || {
                        if let Some(core) = core {
                            if core_affinity::set_for_current(core) {
                                tracing::debug!("worker {} pinned to core {}", id, core.id);
                            }
                        }
                        let outcome = Worker::new(id, block_size).run(reader);
                        if tx.send(outcome).is_err() {
                            tracing::error!("worker {}: coordinator stopped listening", id);
                        }
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        tracing::error!("failed to spawn worker {}: {}", id, e);
                        merge.fail(HistError::Io(e));
                        break;
                    }
                }
            }
            // Only worker-held senders remain, so `recv` fails instead of
            // blocking forever if a worker dies without reporting.
            drop(tx);

            for _ in 0..handles.len() {
                match rx.recv() {
                    Ok(outcome) => merge.absorb(outcome),
                    Err(_) => break,
                }
            }

            for (id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    tracing::error!("worker {} panicked", id);
                }
            }
        });

        let result = merge.finish();
        match &result {
            Ok(histogram) => {
                self.state = CoordinatorState::Succeeded;
                tracing::info!(
                    "histogram complete: {} bytes, {} distinct symbols in {:?}",
                    histogram.total(),
                    histogram.distinct(),
                    started.elapsed()
                );
            }
            Err(e) => {
                self.state = CoordinatorState::Failed;
                tracing::warn!(
                    "histogram build failed after {} bytes in {:?}: {}",
                    reader.bytes_consumed(),
                    started.elapsed(),
                    e
                );
            }
        }
        result
    }
}

/// Aggregation state touched only by the coordinator thread.
struct Merge {
    global: Histogram,
    reported: Vec<bool>,
    first_error: Option<HistError>,
}

impl Merge {
    fn new(workers: usize) -> Self {
        Self {
            global: Histogram::new(),
            reported: vec![false; workers],
            first_error: None,
        }
    }

    fn absorb(&mut self, outcome: Outcome) {
        if let Some(seen) = self.reported.get_mut(outcome.worker) {
            *seen = true;
        }
        match outcome.result {
            Ok(local) => {
                if self.first_error.is_none() {
                    self.global.merge(&local);
                }
            }
            Err(e) => {
                if self.first_error.is_none() {
                    self.first_error = Some(HistError::Io(e));
                } else {
                    tracing::debug!("worker {}: suppressing later error: {}", outcome.worker, e);
                }
            }
        }
    }

    fn fail(&mut self, error: HistError) {
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    fn finish(self) -> HistResult<Histogram> {
        if let Some(e) = self.first_error {
            return Err(e);
        }
        if let Some(worker) = self.reported.iter().position(|&seen| !seen) {
            return Err(HistError::WorkerPanicked { worker });
        }
        Ok(self.global)
    }
}

/// Builds the histogram of `stream` with `worker_count` workers and the
/// default block size.
pub fn build_histogram<R: Read + Send>(stream: R, worker_count: usize) -> HistResult<Histogram> {
    build_histogram_with(stream, &BuildConfig::default().with_workers(worker_count))
}

pub fn build_histogram_with<R: Read + Send>(stream: R, config: &BuildConfig) -> HistResult<Histogram> {
    Coordinator::new(config.clone())?.run(stream)
}
