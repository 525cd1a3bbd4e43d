//! Batch operation engine
//!
//! Generic driver for long-running bulk actions against the rate-limited
//! backend: strictly ordered, one item at a time, with inter-item delays,
//! chunked pause-for-confirmation, per-item outcome accounting, and retry
//! seeding from the failed subset.

mod ops;
mod runner;

pub use ops::{DeleteOperation, ImportOperation, TagFillOperation};
pub use runner::{
    BatchConfig, BatchOperation, BatchProgress, BatchReport, BatchRunner, BatchStatus, ItemOutcome,
    ItemRecord,
};
