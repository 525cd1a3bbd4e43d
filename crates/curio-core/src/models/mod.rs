//! Data models for the quote collection

mod quote;
mod tag;

pub(crate) use quote::MAX_TAG_LEN;
pub use quote::{dedupe_tags, Quote, QuoteDraft};
pub use tag::{TagCleanup, TagSummary};
