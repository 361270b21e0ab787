//! Desk state types
//!
//! All types are `Clone` + `PartialEq` so reducer tests can assert on
//! whole states. In-flight work is always a distinct, visible state:
//! `Searching`, `submitting`, `uploading`.

use smart_entry_api::{ApiError, EntryEvent, EntryStats, ImportSummary, Participant, Role};
use std::time::Duration;

/// How long a transient status message stays on screen
pub const STATUS_TTL: Duration = Duration::from_secs(4);

/// Monotonically increasing identifier for in-flight search requests
///
/// A response carrying a sequence number other than the one currently in
/// flight is stale and gets discarded, so a slow early response can never
/// overwrite the results of a later search.
pub type RequestSeq = u64;

// ═══════════════════════════════════════════════════════════════════════
// Status messages
// ═══════════════════════════════════════════════════════════════════════

/// Severity of a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Neutral information ("No participants found")
    Info,
    /// Operation confirmed
    Success,
    /// Operation rejected or failed
    Error,
}

/// A transient, auto-clearing message shown next to a workflow panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity
    pub kind: StatusKind,
    /// Text shown to the operator
    pub text: String,
}

impl StatusMessage {
    /// Informational message
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    /// Success message
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    /// Error message
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    /// Map an API failure onto the operator-facing message
    ///
    /// Conflict and request failures surface the server's message
    /// verbatim; transport failures get a generic line.
    #[must_use]
    pub fn from_api_error(error: &ApiError) -> Self {
        let text = match error {
            ApiError::Unauthorized => "Not authenticated, please log in again".to_string(),
            ApiError::Conflict { message } | ApiError::RequestFailed { message, .. } => {
                message.clone()
            },
            ApiError::Network(_) | ApiError::ResponseParseFailed(_) => {
                "Could not reach the server, please try again".to_string()
            },
        };
        Self::error(text)
    }

    /// Returns `true` for error-severity messages
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, StatusKind::Error)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Search-and-select
// ═══════════════════════════════════════════════════════════════════════

/// Phase of the search workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No query in flight and no results displayed yet
    #[default]
    Idle,

    /// A search request is outstanding
    Searching {
        /// Sequence number of the in-flight request
        seq: RequestSeq,
    },

    /// Results are displayed (possibly empty)
    Results,
}

/// The participant an operator picked from the result list
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Snapshot of the selected participant
    pub participant: Participant,
    /// Barcode field, pre-populated with the current barcode on select
    pub barcode_input: String,
    /// An assign or deassign request is outstanding
    pub submitting: bool,
}

impl Selection {
    /// Select a participant, pre-populating the barcode field
    #[must_use]
    pub fn new(participant: Participant) -> Self {
        let barcode_input = participant.barcode.clone().unwrap_or_default();
        Self {
            participant,
            barcode_input,
            submitting: false,
        }
    }
}

/// Search-and-select workflow state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    /// Current phase
    pub phase: SearchPhase,
    /// Result list, replaced wholesale on every successful search
    pub results: Vec<Participant>,
    /// Current selection, if any
    pub selection: Option<Selection>,
    /// Transient status for the search panel
    pub status: Option<StatusMessage>,
    /// Stamp guarding the status auto-clear timer
    pub status_stamp: u64,
    /// Last issued request sequence number
    pub next_seq: RequestSeq,
}

// ═══════════════════════════════════════════════════════════════════════
// Entry marking
// ═══════════════════════════════════════════════════════════════════════

/// Entry-marking workflow state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryState {
    /// A mark-entry request is outstanding
    pub submitting: bool,
    /// Recent entries for `history_barcode`, most recent first
    pub history: Vec<EntryEvent>,
    /// Barcode the displayed history belongs to
    pub history_barcode: Option<String>,
    /// Transient status for the entry panel
    pub status: Option<StatusMessage>,
    /// Stamp guarding the status auto-clear timer
    pub status_stamp: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// Roster / reporting
// ═══════════════════════════════════════════════════════════════════════

/// Listing, statistics, and roster-upload state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterState {
    /// Full participant listing, replaced wholesale on fetch
    pub participants: Vec<Participant>,
    /// Full entry log, replaced wholesale on fetch
    pub entries: Vec<EntryEvent>,
    /// Server-computed statistics, displayed as-is
    pub stats: Option<EntryStats>,
    /// A roster upload is outstanding
    pub uploading: bool,
    /// Summary of the most recent upload
    pub last_import: Option<ImportSummary>,
    /// Transient status for the reporting panel
    pub status: Option<StatusMessage>,
    /// Stamp guarding the status auto-clear timer
    pub status_stamp: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// Shell
// ═══════════════════════════════════════════════════════════════════════

/// A tab in the operator shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Search participants and assign/deassign barcodes
    SearchAssign,
    /// Record venue entries
    MarkEntry,
    /// Full participant listing (admin)
    Participants,
    /// Full entry log (admin)
    Entries,
    /// Aggregate statistics (admin)
    Stats,
    /// Roster upload (admin)
    Upload,
}

impl Tab {
    /// Tabs staff can use; admins see all of them
    pub const STAFF: [Tab; 2] = [Tab::SearchAssign, Tab::MarkEntry];

    /// Every tab, in display order
    pub const ALL: [Tab; 6] = [
        Tab::SearchAssign,
        Tab::MarkEntry,
        Tab::Participants,
        Tab::Entries,
        Tab::Stats,
        Tab::Upload,
    ];

    /// Returns `true` if this tab is admin-only
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(self, Tab::Participants | Tab::Entries | Tab::Stats | Tab::Upload)
    }

    /// Display name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Tab::SearchAssign => "Search & Assign",
            Tab::MarkEntry => "Mark Entry",
            Tab::Participants => "Participants",
            Tab::Entries => "Entries",
            Tab::Stats => "Stats",
            Tab::Upload => "Upload",
        }
    }
}

/// Shell navigation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    /// The tab currently shown
    pub active_tab: Tab,
    /// Role of the logged-in operator; `None` when unknown (restored
    /// session or logged out)
    pub role: Option<Role>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            active_tab: Tab::SearchAssign,
            role: None,
        }
    }
}

impl ShellState {
    /// Returns `true` if the operator may open `tab`
    #[must_use]
    pub fn allows(&self, tab: Tab) -> bool {
        !tab.requires_admin() || self.role.is_some_and(Role::is_admin)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Root
// ═══════════════════════════════════════════════════════════════════════

/// Root desk state, one instance per client
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeskState {
    /// Tab navigation and role gating
    pub shell: ShellState,
    /// Search-and-select workflow
    pub search: SearchState,
    /// Entry-marking workflow
    pub entry: EntryState,
    /// Listing/reporting views
    pub roster: RosterState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_status_carries_server_message_verbatim() {
        let status = StatusMessage::from_api_error(&ApiError::Conflict {
            message: "Barcode BC100 is already assigned".to_string(),
        });
        assert_eq!(status.text, "Barcode BC100 is already assigned");
        assert!(status.is_error());
    }

    #[test]
    fn transport_failures_get_a_generic_message() {
        let status = StatusMessage::from_api_error(&ApiError::Network("refused".to_string()));
        assert!(status.text.contains("Could not reach the server"));
    }

    #[test]
    fn selection_prefills_barcode_input() {
        let participant = Participant {
            email: "jane@event.com".to_string(),
            name: "Jane Doe".to_string(),
            reference_no: "REF-001".to_string(),
            mobile: None,
            institution: None,
            designation: None,
            category: None,
            paper_id: None,
            amount_paid: None,
            invoice_no: None,
            barcode: Some("BC100".to_string()),
        };

        let selection = Selection::new(participant);
        assert_eq!(selection.barcode_input, "BC100");
        assert!(!selection.submitting);
    }

    #[test]
    fn staff_shell_rejects_admin_tabs() {
        let shell = ShellState {
            active_tab: Tab::SearchAssign,
            role: Some(Role::Staff),
        };
        assert!(shell.allows(Tab::MarkEntry));
        assert!(!shell.allows(Tab::Upload));
        assert!(!shell.allows(Tab::Stats));
    }

    #[test]
    fn unknown_role_is_gated_like_staff() {
        let shell = ShellState::default();
        assert!(shell.allows(Tab::SearchAssign));
        assert!(!shell.allows(Tab::Participants));
    }
}
