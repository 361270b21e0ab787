//! # Smart Entry Desk
//!
//! Operator desk workflows for the Smart Entry client:
//!
//! - **Search-and-select**: free-text participant search, selection, and
//!   barcode assign/deassign with both the selected record and the
//!   results list reconciled in place (no re-fetch)
//! - **Entry marking**: record an attendance event for a barcode at a
//!   venue, with the recent-history view re-fetched after every
//!   successful mark (the server is authoritative)
//! - **Roster/reporting**: wholesale-replace listings of participants and
//!   entries plus server-computed statistics, and the admin-only roster
//!   upload
//! - **Shell**: tab navigation with role-based gating; switching to a
//!   reporting tab triggers its fetch
//!
//! Everything is a pure reducer over [`DeskState`]; HTTP calls are
//! [`Effect::Future`](smart_entry_core::effect::Effect) values executed by
//! the store. Searches carry a monotonically increasing sequence number
//! so a superseded request's response is discarded instead of overwriting
//! newer results.

pub mod actions;
pub mod environment;
pub mod error;
pub mod reducers;
pub mod state;

pub use actions::DeskAction;
pub use environment::DeskEnvironment;
pub use error::DeskError;
pub use reducers::DeskReducer;
pub use state::{
    DeskState, EntryState, RequestSeq, RosterState, SearchPhase, SearchState, Selection,
    ShellState, StatusKind, StatusMessage, Tab,
};
