//! Download engine: a fixed worker pool draining a bounded task queue.
//!
//! # Overview
//!
//! [`DownloadEngine::run_all`] spawns `concurrency` worker tasks that share
//! the receiving end of a bounded channel. The caller's task is the single
//! producer: it sends every [`DownloadTask`], drops the sender to close the
//! queue, then joins every worker before returning.
//!
//! # Example
//!
//! ```no_run
//! use emoji_backup_core::download::{DownloadEngine, DownloadTask, HttpClient, ImageFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = ImageFetcher::new(HttpClient::new(), "emoji");
//! let engine = DownloadEngine::new(15)?;
//! let tasks = vec![DownloadTask::new("smile", "https://x/smile.png")];
//! let stats = engine.run_all(&fetcher, tasks).await;
//! println!("saved: {}, failed: {}", stats.saved(), stats.failed());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::fetcher::{FetchOutcome, ImageFetcher};

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// One direct emoji to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Emoji name.
    pub name: String,
    /// Image URL.
    pub url: String,
}

impl DownloadTask {
    /// Creates a task.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Statistics from a download batch run.
///
/// Uses atomic counters so every worker can update them without locking.
#[derive(Debug, Default)]
pub struct DownloadStats {
    saved: AtomicUsize,
    existing: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Images downloaded and written in this run.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }

    /// Images skipped because their file already existed.
    #[must_use]
    pub fn existing(&self) -> usize {
        self.existing.load(Ordering::SeqCst)
    }

    /// Images that failed to download or write.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Total number of tasks processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.saved() + self.existing() + self.failed()
    }

    fn record(&self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Saved(_) => self.saved.fetch_add(1, Ordering::SeqCst),
            FetchOutcome::Exists(_) => self.existing.fetch_add(1, Ordering::SeqCst),
        };
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Self {
        Self {
            saved: AtomicUsize::new(self.saved()),
            existing: AtomicUsize::new(self.existing()),
            failed: AtomicUsize::new(self.failed()),
        }
    }
}

/// Bounded worker pool for emoji image downloads.
///
/// # Concurrency Model
///
/// - Exactly `concurrency` Tokio tasks are spawned per run
/// - Workers pull from one bounded channel; the producer waits when it is full
/// - A failed task is logged and counted, and the worker moves on
/// - `run_all` returns only after every worker has exited
#[derive(Debug, Clone, Copy)]
pub struct DownloadEngine {
    concurrency: usize,
}

impl DownloadEngine {
    /// Creates an engine with `concurrency` workers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use emoji_backup_core::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(15).unwrap();
    /// assert_eq!(engine.concurrency(), 15);
    /// ```
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        debug!(concurrency, "creating download engine");
        Ok(Self { concurrency })
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every task through the worker pool.
    ///
    /// Individual failures never abort the batch; they are logged with the
    /// emoji name and counted in the returned stats. Tasks complete in no
    /// particular order.
    #[instrument(skip(self, fetcher, tasks), fields(tasks = tasks.len(), concurrency = self.concurrency))]
    pub async fn run_all(&self, fetcher: &ImageFetcher, tasks: Vec<DownloadTask>) -> DownloadStats {
        let stats = Arc::new(DownloadStats::new());
        let (sender, receiver) = mpsc::channel::<DownloadTask>(self.concurrency);
        let receiver = Arc::new(Mutex::new(receiver));

        info!(
            tasks = tasks.len(),
            target_dir = %fetcher.target_dir().display(),
            "starting downloads"
        );

        let workers: Vec<_> = (0..self.concurrency)
            .map(|worker| {
                let receiver = Arc::clone(&receiver);
                let fetcher = fetcher.clone();
                let stats = Arc::clone(&stats);
                tokio::spawn(async move { run_worker(worker, &receiver, &fetcher, &stats).await })
            })
            .collect();

        for task in tasks {
            if sender.send(task).await.is_err() {
                warn!("all download workers exited before the queue was drained");
                break;
            }
        }
        // Closing the queue lets idle workers see `None` and exit.
        drop(sender);

        for handle in workers {
            // A panicking worker loses its in-flight task; the rest keep going.
            if let Err(e) = handle.await {
                warn!(error = %e, "download worker panicked");
            }
        }

        info!(
            saved = stats.saved(),
            existing = stats.existing(),
            failed = stats.failed(),
            "downloads complete"
        );

        Arc::try_unwrap(stats).unwrap_or_else(|shared| shared.snapshot())
    }
}

async fn run_worker(
    worker: usize,
    receiver: &Mutex<mpsc::Receiver<DownloadTask>>,
    fetcher: &ImageFetcher,
    stats: &DownloadStats,
) {
    loop {
        // The lock is released at the end of this statement, before the fetch.
        let next = receiver.lock().await.recv().await;
        let Some(task) = next else {
            break;
        };

        match fetcher.fetch_one(&task.name, &task.url).await {
            Ok(outcome) => stats.record(&outcome),
            Err(e) => {
                warn!(emoji = %task.name, url = %task.url, error = %e, "download failed");
                stats.increment_failed();
            }
        }
    }
    debug!(worker, "download worker finished");
}
