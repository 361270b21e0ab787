//! Error types for desk workflows
//!
//! These are the locally detected failures; server-side failures arrive
//! as [`ApiError`](smart_entry_api::ApiError) values inside the failure
//! actions and are mapped to status messages at the reducer boundary.

use thiserror::Error;

/// Locally detected workflow failures; never reach the network
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeskError {
    /// A required field was empty
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// An operation that needs a selected participant was issued without
    /// one
    #[error("Select a participant first")]
    NothingSelected,

    /// Deassign was issued for a participant with no barcode assigned
    #[error("No barcode is assigned")]
    NoBarcodeAssigned,

    /// A result index outside the current result list
    #[error("No search result #{index}")]
    NoSuchResult {
        /// The rejected index (1-based, as the operator sees it)
        index: usize,
    },

    /// Roster upload attempted without the admin role
    #[error("Admin role required")]
    AdminRequired,
}
