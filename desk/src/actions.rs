//! Desk actions
//!
//! Commands come from the operator shell; events are produced when the
//! corresponding effects complete. Failure events carry the original
//! [`ApiError`] so the shell can detect auth failures and tear the
//! session down.

use crate::state::{RequestSeq, Tab};
use smart_entry_api::{
    ApiError, EntryEvent, EntryStats, ImportSummary, MarkEntryResponse, Participant, Role, Venue,
};

/// All inputs to the desk reducer
#[derive(Debug, Clone, PartialEq)]
pub enum DeskAction {
    // ═══════════════════════════════════════════════════════════════════
    // Shell
    // ═══════════════════════════════════════════════════════════════════
    /// The logged-in operator's role changed (login, logout, restore)
    RoleChanged {
        /// New role; `None` when unknown
        role: Option<Role>,
    },

    /// Operator switched to a tab; reporting tabs trigger their fetch
    SwitchTab {
        /// Target tab
        tab: Tab,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Search-and-select
    // ═══════════════════════════════════════════════════════════════════
    /// Operator submitted a search term
    Search {
        /// Free-text term matched against email, name, reference number,
        /// mobile number, or barcode
        term: String,
    },

    /// Search results arrived (event)
    SearchLoaded {
        /// Sequence number of the request that produced these results
        seq: RequestSeq,
        /// Matching participants, in server order
        results: Vec<Participant>,
    },

    /// Search request failed (event)
    SearchFailed {
        /// Sequence number of the failed request
        seq: RequestSeq,
        /// The failure
        error: ApiError,
    },

    /// Operator picked a result row (0-based index into the result list)
    Select {
        /// Index into the current result list
        index: usize,
    },

    /// Operator dismissed the current selection
    ClearSelection,

    /// Operator submitted a barcode for the selected participant
    Assign {
        /// Barcode to assign
        code: String,
    },

    /// Barcode assignment succeeded (event)
    AssignSucceeded {
        /// Updated participant returned by the server
        participant: Participant,
    },

    /// Barcode assignment failed (event)
    AssignFailed {
        /// The failure
        error: ApiError,
    },

    /// Operator removed the selected participant's barcode
    Deassign,

    /// Barcode removal succeeded (event)
    DeassignSucceeded {
        /// Updated participant returned by the server
        participant: Participant,
    },

    /// Barcode removal failed (event)
    DeassignFailed {
        /// The failure
        error: ApiError,
    },

    /// The search panel's status timer fired (event)
    SearchStatusCleared {
        /// Stamp of the message the timer was armed for
        stamp: u64,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Entry marking
    // ═══════════════════════════════════════════════════════════════════
    /// Operator recorded an entry
    MarkEntry {
        /// Badge barcode
        barcode: String,
        /// Venue; `None` when the operator left it out
        venue: Option<Venue>,
    },

    /// Entry recorded (event)
    EntryMarked {
        /// Confirmation, the new entry, and the server's recent history
        response: MarkEntryResponse,
    },

    /// Entry could not be recorded (event)
    MarkEntryFailed {
        /// The failure
        error: ApiError,
    },

    /// Operator asked for the recent history of a barcode
    LoadHistory {
        /// Badge barcode
        barcode: String,
    },

    /// Fresh history for a barcode arrived (event)
    HistoryLoaded {
        /// Barcode the history belongs to
        barcode: String,
        /// Recent entries, most recent first
        entries: Vec<EntryEvent>,
    },

    /// History re-fetch failed (event)
    HistoryLoadFailed {
        /// The failure
        error: ApiError,
    },

    /// The entry panel's status timer fired (event)
    EntryStatusCleared {
        /// Stamp of the message the timer was armed for
        stamp: u64,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Roster / reporting
    // ═══════════════════════════════════════════════════════════════════
    /// Fetch the full participant listing
    LoadParticipants,

    /// Participant listing arrived (event)
    ParticipantsLoaded {
        /// Full roster, replacing the displayed list wholesale
        participants: Vec<Participant>,
    },

    /// Fetch the full entry log
    LoadEntries,

    /// Entry log arrived (event)
    EntriesLoaded {
        /// All recorded entries, replacing the displayed list wholesale
        entries: Vec<EntryEvent>,
    },

    /// Fetch aggregate statistics
    LoadStats,

    /// Statistics arrived (event)
    StatsLoaded {
        /// Server-computed aggregates
        stats: EntryStats,
    },

    /// Re-issue every reporting fetch and replace displayed data wholesale
    RefreshAll,

    /// A reporting fetch failed (event)
    RosterLoadFailed {
        /// The failure
        error: ApiError,
    },

    /// Operator uploaded a roster spreadsheet (admin only)
    UploadRoster {
        /// Original file name, forwarded to the server
        file_name: String,
        /// File contents
        bytes: Vec<u8>,
    },

    /// Roster upload succeeded (event)
    RosterUploaded {
        /// Server's import summary
        summary: ImportSummary,
    },

    /// Roster upload failed (event)
    UploadFailed {
        /// The failure
        error: ApiError,
    },

    /// The reporting panel's status timer fired (event)
    RosterStatusCleared {
        /// Stamp of the message the timer was armed for
        stamp: u64,
    },
}

impl DeskAction {
    /// Returns `true` if this action reports an authentication failure
    ///
    /// The shell watches for these to tear the session down and prompt
    /// for re-login.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        match self {
            Self::SearchFailed { error, .. }
            | Self::AssignFailed { error }
            | Self::DeassignFailed { error }
            | Self::MarkEntryFailed { error }
            | Self::HistoryLoadFailed { error }
            | Self::RosterLoadFailed { error }
            | Self::UploadFailed { error } => error.is_auth_failure(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_detected_across_workflows() {
        let unauthorized = DeskAction::AssignFailed {
            error: ApiError::Unauthorized,
        };
        assert!(unauthorized.is_auth_failure());

        let conflict = DeskAction::AssignFailed {
            error: ApiError::Conflict {
                message: "duplicate".to_string(),
            },
        };
        assert!(!conflict.is_auth_failure());

        let command = DeskAction::Search {
            term: "doe".to_string(),
        };
        assert!(!command.is_auth_failure());
    }
}
