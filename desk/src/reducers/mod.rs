//! Desk reducers
//!
//! One reducer per workflow, combined by [`DeskReducer`], which routes
//! each action to the sub-reducer that owns it.

pub mod entry;
pub mod roster;
pub mod search;
pub mod shell;

use crate::actions::DeskAction;
use crate::environment::DeskEnvironment;
use crate::state::DeskState;
use smart_entry_core::{SmallVec, effect::Effect, reducer::Reducer};

// Re-export
pub use entry::EntryReducer;
pub use roster::RosterReducer;
pub use search::SearchReducer;
pub use shell::ShellReducer;

/// Unified desk reducer
///
/// Routes actions to the search, entry, roster, and shell sub-reducers
/// based on action type.
#[derive(Clone, Debug, Default)]
pub struct DeskReducer {
    search: SearchReducer,
    entry: EntryReducer,
    roster: RosterReducer,
    shell: ShellReducer,
}

impl DeskReducer {
    /// Create a new unified desk reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            search: SearchReducer::new(),
            entry: EntryReducer::new(),
            roster: RosterReducer::new(),
            shell: ShellReducer::new(),
        }
    }
}

impl Reducer for DeskReducer {
    type State = DeskState;
    type Action = DeskAction;
    type Environment = DeskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // Route to the sub-reducer owning this action
        match action {
            // Shell
            DeskAction::RoleChanged { .. } | DeskAction::SwitchTab { .. } => {
                self.shell.reduce(state, action, env)
            },

            // Search-and-select
            DeskAction::Search { .. }
            | DeskAction::SearchLoaded { .. }
            | DeskAction::SearchFailed { .. }
            | DeskAction::Select { .. }
            | DeskAction::ClearSelection
            | DeskAction::Assign { .. }
            | DeskAction::AssignSucceeded { .. }
            | DeskAction::AssignFailed { .. }
            | DeskAction::Deassign
            | DeskAction::DeassignSucceeded { .. }
            | DeskAction::DeassignFailed { .. }
            | DeskAction::SearchStatusCleared { .. } => self.search.reduce(state, action, env),

            // Entry marking
            DeskAction::MarkEntry { .. }
            | DeskAction::EntryMarked { .. }
            | DeskAction::MarkEntryFailed { .. }
            | DeskAction::LoadHistory { .. }
            | DeskAction::HistoryLoaded { .. }
            | DeskAction::HistoryLoadFailed { .. }
            | DeskAction::EntryStatusCleared { .. } => self.entry.reduce(state, action, env),

            // Roster / reporting
            DeskAction::LoadParticipants
            | DeskAction::ParticipantsLoaded { .. }
            | DeskAction::LoadEntries
            | DeskAction::EntriesLoaded { .. }
            | DeskAction::LoadStats
            | DeskAction::StatsLoaded { .. }
            | DeskAction::RefreshAll
            | DeskAction::RosterLoadFailed { .. }
            | DeskAction::UploadRoster { .. }
            | DeskAction::RosterUploaded { .. }
            | DeskAction::UploadFailed { .. }
            | DeskAction::RosterStatusCleared { .. } => self.roster.reduce(state, action, env),
        }
    }
}
