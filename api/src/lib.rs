//! # Smart Entry API Client
//!
//! Typed HTTP client for the Smart Entry conference API: participant
//! search, barcode assignment, entry marking, and reporting.
//!
//! The client attaches a bearer token from a shared [`SessionHandle`] to
//! every request once an operator has logged in, and maps the server's
//! error responses onto the [`ApiError`] taxonomy. It never retries;
//! retry policy is left to the caller, and none of the workflows retry.
//!
//! ## Example
//!
//! ```no_run
//! use smart_entry_api::{ApiClient, SessionHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionHandle::new();
//!     let client = ApiClient::from_env(session.clone());
//!
//!     let response = client.login("admin@event.com", "admin123").await?;
//!     session.set(response.token).await;
//!
//!     let results = client.search_participants("doe").await?;
//!     println!("{} participants", results.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::ApiClient;
pub use error::ApiError;
pub use session::SessionHandle;
pub use types::{
    EntryEvent, EntryHistory, EntryStats, ImportSummary, LoginResponse, MarkEntryResponse,
    Participant, Role, UserIdentity, Venue,
};
