//! Error types for the Smart Entry API client

use thiserror::Error;

/// Errors that can occur when talking to the Smart Entry API
///
/// The variants mirror how the workflows react to a failure: an
/// authentication failure tears the session down, a conflict is surfaced
/// to the operator verbatim, and everything else is a generic transport
/// or request failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request could not reach the server at all
    #[error("Network error: {0}")]
    Network(String),

    /// Request was rejected for a missing, invalid, or expired token
    #[error("Not authenticated")]
    Unauthorized,

    /// Server rejected the operation due to a uniqueness violation or
    /// invalid state (duplicate barcode, entry for an unassigned barcode)
    #[error("{message}")]
    Conflict {
        /// Server-reported reason, shown to the operator verbatim
        message: String,
    },

    /// Server returned a non-success status outside the cases above
    #[error("Request failed (status {status}): {message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Error message extracted from the response payload
        message: String,
    },

    /// Success response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

impl ApiError {
    /// Returns `true` if this error must tear down the current session
    ///
    /// # Examples
    ///
    /// ```
    /// # use smart_entry_api::ApiError;
    /// assert!(ApiError::Unauthorized.is_auth_failure());
    /// assert!(!ApiError::Network("timeout".into()).is_auth_failure());
    /// ```
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if the server rejected the operation as conflicting
    /// with existing state
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` for failures of the transport itself rather than of
    /// the requested operation
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ResponseParseFailed(_))
    }
}
