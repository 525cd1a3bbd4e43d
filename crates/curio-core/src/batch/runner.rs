//! Resumable, rate-limited batch driver

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::ApiError;

/// Pacing and chunking for one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Items per chunk between confirmation gates
    pub batch_size: usize,
    /// Sleep between consecutive items; the backend rate-limits per caller
    pub inter_item_delay: Duration,
    /// Suspend for explicit confirmation after each chunk
    pub pause_between_batches: bool,
}

impl BatchConfig {
    /// Pacing for plain CRUD calls
    #[must_use]
    pub const fn crud() -> Self {
        Self {
            batch_size: 5,
            inter_item_delay: Duration::from_millis(300),
            pause_between_batches: false,
        }
    }

    /// Pacing for AI-backed calls, which rate-limit harder
    #[must_use]
    pub const fn ai_backed() -> Self {
        Self {
            batch_size: 5,
            inter_item_delay: Duration::from_millis(1_100),
            pause_between_batches: false,
        }
    }

    /// Enable the confirmation gate between chunks
    #[must_use]
    pub const fn with_confirmation(mut self) -> Self {
        self.pause_between_batches = true;
        self
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::crud()
    }
}

/// The asynchronous per-item action a run drives
#[async_trait]
pub trait BatchOperation<T: Send + Sync>: Send {
    /// Apply the operation to one item. The `Ok` string is a short
    /// human-readable note surfaced in reports.
    async fn apply(&mut self, item: &T) -> Result<String, ApiError>;
}

/// Outcome of one processed item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded(String),
    /// The backend's duplicate check tripped. Counted under failures but
    /// reported distinctly and never retried automatically.
    SoftDuplicate(String),
    Failed(String),
}

impl ItemOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Soft duplicates count as failures in the totals
    #[must_use]
    pub const fn counts_as_failure(&self) -> bool {
        !self.is_success()
    }

    #[must_use]
    pub const fn is_soft_duplicate(&self) -> bool {
        matches!(self, Self::SoftDuplicate(_))
    }
}

/// One item's position, content, and outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord<T> {
    /// Position in the original input order
    pub index: usize,
    pub item: T,
    pub outcome: ItemOutcome,
}

/// Lifecycle of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Running,
    /// Chunk finished with items remaining; waiting for explicit continue
    PausedForConfirmation,
    Completed,
    Aborted,
}

/// Cumulative counters surfaced at confirmation gates and in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub soft_duplicates: usize,
    pub total: usize,
}

/// A resumable batch run over an ordered item list.
///
/// Items are processed strictly in input order, one at a time; after every
/// item except the last of the whole list the runner sleeps
/// `inter_item_delay` (no sleep into a confirmation pause, where human
/// latency covers it). A single item failure never aborts the run. Aborting leaves
/// unprocessed items never started; nothing is ever cancelled mid-flight.
pub struct BatchRunner<T> {
    items: Vec<T>,
    config: BatchConfig,
    next: usize,
    records: Vec<ItemRecord<T>>,
    status: BatchStatus,
}

impl<T: Clone + Send + Sync> BatchRunner<T> {
    pub fn new(items: Vec<T>, config: BatchConfig) -> Self {
        let status = if items.is_empty() {
            BatchStatus::Completed
        } else {
            BatchStatus::Running
        };
        Self {
            items,
            config,
            next: 0,
            records: Vec::new(),
            status,
        }
    }

    #[must_use]
    pub const fn status(&self) -> BatchStatus {
        self.status
    }

    #[must_use]
    pub fn progress(&self) -> BatchProgress {
        let succeeded = self
            .records
            .iter()
            .filter(|r| r.outcome.is_success())
            .count();
        let soft_duplicates = self
            .records
            .iter()
            .filter(|r| r.outcome.is_soft_duplicate())
            .count();
        BatchProgress {
            processed: self.records.len(),
            succeeded,
            failed: self.records.len() - succeeded,
            soft_duplicates,
            total: self.items.len(),
        }
    }

    /// Outcomes recorded so far, in processing order
    #[must_use]
    pub fn records(&self) -> &[ItemRecord<T>] {
        &self.records
    }

    /// Most recent outcomes, for confirmation prompts
    #[must_use]
    pub fn recent_records(&self, count: usize) -> &[ItemRecord<T>] {
        let start = self.records.len().saturating_sub(count);
        &self.records[start..]
    }

    /// Continue a paused run
    pub fn resume(&mut self) {
        if self.status == BatchStatus::PausedForConfirmation {
            self.status = BatchStatus::Running;
        }
    }

    /// Stop the run; unprocessed items are never started
    pub fn abort(&mut self) {
        if matches!(
            self.status,
            BatchStatus::Running | BatchStatus::PausedForConfirmation
        ) {
            info!(
                processed = self.records.len(),
                total = self.items.len(),
                "batch run aborted"
            );
            self.status = BatchStatus::Aborted;
        }
    }

    /// Process the next chunk of up to `batch_size` items.
    ///
    /// Returns the status after the chunk: `PausedForConfirmation` when
    /// more items remain and the confirmation gate is enabled, `Completed`
    /// on exhaustion, otherwise `Running`.
    pub async fn run_chunk<O: BatchOperation<T>>(&mut self, op: &mut O) -> BatchStatus {
        if self.status != BatchStatus::Running {
            return self.status;
        }

        let chunk_end = (self.next + self.config.batch_size).min(self.items.len());
        while self.next < chunk_end {
            let item = self.items[self.next].clone();
            let outcome = match op.apply(&item).await {
                Ok(note) => ItemOutcome::Succeeded(note),
                Err(error) if error.is_soft_duplicate() => {
                    info!(index = self.next, "item skipped as soft duplicate");
                    ItemOutcome::SoftDuplicate(error.to_string())
                }
                Err(error) => {
                    warn!(index = self.next, error = %error, "item failed");
                    ItemOutcome::Failed(error.to_string())
                }
            };
            self.records.push(ItemRecord {
                index: self.next,
                item,
                outcome,
            });
            self.next += 1;

            let chunk_continues = self.next < chunk_end;
            let run_continues_unpaused =
                self.next < self.items.len() && !self.config.pause_between_batches;
            if chunk_continues || run_continues_unpaused {
                sleep(self.config.inter_item_delay).await;
            }
        }

        if self.next >= self.items.len() {
            self.status = BatchStatus::Completed;
        } else if self.config.pause_between_batches {
            self.status = BatchStatus::PausedForConfirmation;
        }
        self.status
    }

    /// Drive chunks to exhaustion, auto-resuming any confirmation gates
    pub async fn run_to_completion<O: BatchOperation<T>>(&mut self, op: &mut O) -> BatchStatus {
        loop {
            match self.run_chunk(op).await {
                BatchStatus::PausedForConfirmation => self.resume(),
                status @ (BatchStatus::Completed | BatchStatus::Aborted) => return status,
                BatchStatus::Running => {}
            }
        }
    }

    /// Consume the run into its final report
    #[must_use]
    pub fn into_report(self) -> BatchReport<T> {
        BatchReport {
            total: self.items.len(),
            status: self.status,
            records: self.records,
        }
    }
}

/// Final accounting for a finished (or aborted) run
#[derive(Debug, Clone)]
pub struct BatchReport<T> {
    /// Items handed to the run, processed or not
    pub total: usize,
    pub status: BatchStatus,
    pub records: Vec<ItemRecord<T>>,
}

impl<T: Clone> BatchReport<T> {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }

    #[must_use]
    pub fn soft_duplicates(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_soft_duplicate())
            .count()
    }

    /// Failure records, optionally without the soft duplicates
    #[must_use]
    pub fn failures(&self, include_soft_duplicates: bool) -> Vec<&ItemRecord<T>> {
        self.records
            .iter()
            .filter(|r| r.outcome.counts_as_failure())
            .filter(|r| include_soft_duplicates || !r.outcome.is_soft_duplicate())
            .collect()
    }

    /// The failed subset as fresh input for a retry run, preserving the
    /// original order
    #[must_use]
    pub fn failed_items(&self, include_soft_duplicates: bool) -> Vec<T> {
        self.failures(include_soft_duplicates)
            .into_iter()
            .map(|r| r.item.clone())
            .collect()
    }
}
