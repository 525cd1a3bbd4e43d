//! Collection view synchronizer
//!
//! Owns the authoritative "what should currently be displayed" state for
//! the admin collection screen: free-text search, sort key/direction, and
//! forward-only pagination. Overlapping fetches are reconciled with a
//! generation stamp so the displayed list always reflects the most
//! recently issued request, never an interleaving of two.

mod state;
mod sync;
mod worker;

pub use state::{ViewMode, ViewState};
pub use sync::{Applied, CollectionView, FetchTicket, QueryEdit};
pub use worker::{spawn, ViewCommand, ViewEvent, ViewHandle, DEBOUNCE};
