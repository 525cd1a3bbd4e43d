//! Remote collection client
//!
//! Typed request/response wrapper around the backend's quote and tag
//! endpoints. All calls attach the caller's bearer token; the [`QuoteApi`]
//! trait is the seam the view synchronizer and batch engine consume.

mod client;
mod types;

pub use client::{QuoteApi, QuoteApiClient, TokenProvider};
pub use types::{QuotePage, SortField, SortOrder};
