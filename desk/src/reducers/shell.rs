//! Shell reducer
//!
//! Tab navigation with role-based gating. All refresh is pull-based:
//! switching to a reporting tab triggers that tab's fetch.

use crate::actions::DeskAction;
use crate::environment::DeskEnvironment;
use crate::state::{DeskState, Tab};
use smart_entry_api::Role;
use smart_entry_core::effect::Effect;
use smart_entry_core::reducer::Reducer;
use smart_entry_core::{SmallVec, smallvec};

/// Reducer for tab navigation and role gating
#[derive(Clone, Debug, Default)]
pub struct ShellReducer;

impl ShellReducer {
    /// Create a new shell reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The fetch a tab triggers when it is opened, if any
    fn fetch_for(tab: Tab) -> Option<DeskAction> {
        match tab {
            Tab::Participants => Some(DeskAction::LoadParticipants),
            Tab::Entries => Some(DeskAction::LoadEntries),
            Tab::Stats => Some(DeskAction::LoadStats),
            Tab::SearchAssign | Tab::MarkEntry | Tab::Upload => None,
        }
    }
}

impl Reducer for ShellReducer {
    type State = DeskState;
    type Action = DeskAction;
    type Environment = DeskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DeskAction::RoleChanged { role } => {
                state.shell.role = role;
                // A role downgrade cannot leave an admin tab active
                if !state.shell.allows(state.shell.active_tab) {
                    state.shell.active_tab = Tab::SearchAssign;
                }
                smallvec![]
            },

            DeskAction::SwitchTab { tab } => {
                if !state.shell.allows(tab) {
                    tracing::debug!(tab = tab.label(), "Tab requires the admin role");
                    return smallvec![];
                }

                state.shell.active_tab = tab;

                match Self::fetch_for(tab) {
                    Some(action) => {
                        smallvec![Effect::Future(Box::pin(async move { Some(action) }))]
                    },
                    None => smallvec![],
                }
            },

            _ => smallvec![],
        }
    }
}
