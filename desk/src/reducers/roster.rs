//! Listing, statistics, and roster-upload reducer
//!
//! All reads are wholesale replacements of the displayed data; there is
//! no incremental merge and no client-side aggregation. Statistics come
//! from the server and are displayed as-is.

use crate::actions::DeskAction;
use crate::environment::DeskEnvironment;
use crate::error::DeskError;
use crate::state::{DeskState, STATUS_TTL, StatusMessage};
use smart_entry_api::Role;
use smart_entry_core::effect::Effect;
use smart_entry_core::reducer::Reducer;
use smart_entry_core::{SmallVec, smallvec};

/// Reducer for the listing/reporting views and the roster upload
#[derive(Clone, Debug, Default)]
pub struct RosterReducer;

impl RosterReducer {
    /// Create a new roster reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Show a transient status and arm its expiry timer
    fn set_status(state: &mut DeskState, message: StatusMessage) -> Effect<DeskAction> {
        state.roster.status_stamp += 1;
        let stamp = state.roster.status_stamp;
        state.roster.status = Some(message);
        Effect::Delay {
            duration: STATUS_TTL,
            action: Box::new(DeskAction::RosterStatusCleared { stamp }),
        }
    }

    fn fetch_participants(env: &DeskEnvironment) -> Effect<DeskAction> {
        let api = env.api.clone();
        Effect::Future(Box::pin(async move {
            match api.list_participants().await {
                Ok(participants) => Some(DeskAction::ParticipantsLoaded { participants }),
                Err(error) => Some(DeskAction::RosterLoadFailed { error }),
            }
        }))
    }

    fn fetch_entries(env: &DeskEnvironment) -> Effect<DeskAction> {
        let api = env.api.clone();
        Effect::Future(Box::pin(async move {
            match api.all_entries().await {
                Ok(entries) => Some(DeskAction::EntriesLoaded { entries }),
                Err(error) => Some(DeskAction::RosterLoadFailed { error }),
            }
        }))
    }

    fn fetch_stats(env: &DeskEnvironment) -> Effect<DeskAction> {
        let api = env.api.clone();
        Effect::Future(Box::pin(async move {
            match api.entry_stats().await {
                Ok(stats) => Some(DeskAction::StatsLoaded { stats }),
                Err(error) => Some(DeskAction::RosterLoadFailed { error }),
            }
        }))
    }
}

impl Reducer for RosterReducer {
    type State = DeskState;
    type Action = DeskAction;
    type Environment = DeskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Reads: fetch and replace wholesale
            // ═══════════════════════════════════════════════════════════
            DeskAction::LoadParticipants => smallvec![Self::fetch_participants(env)],
            DeskAction::LoadEntries => smallvec![Self::fetch_entries(env)],
            DeskAction::LoadStats => smallvec![Self::fetch_stats(env)],

            DeskAction::RefreshAll => smallvec![
                Self::fetch_participants(env),
                Self::fetch_entries(env),
                Self::fetch_stats(env),
            ],

            DeskAction::ParticipantsLoaded { participants } => {
                state.roster.participants = participants;
                smallvec![]
            },

            DeskAction::EntriesLoaded { entries } => {
                state.roster.entries = entries;
                smallvec![]
            },

            DeskAction::StatsLoaded { stats } => {
                state.roster.stats = Some(stats);
                smallvec![]
            },

            DeskAction::RosterLoadFailed { error } => {
                smallvec![Self::set_status(state, StatusMessage::from_api_error(&error))]
            },

            // ═══════════════════════════════════════════════════════════
            // Roster upload (admin)
            // ═══════════════════════════════════════════════════════════
            DeskAction::UploadRoster { file_name, bytes } => {
                if state.shell.role != Some(Role::Admin) {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(DeskError::AdminRequired.to_string()),
                    )];
                }

                if state.roster.uploading {
                    tracing::debug!("Upload already in flight, ignoring");
                    return smallvec![];
                }

                state.roster.uploading = true;

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.upload_roster(&file_name, bytes).await {
                        Ok(summary) => Some(DeskAction::RosterUploaded { summary }),
                        Err(error) => Some(DeskAction::UploadFailed { error }),
                    }
                }))]
            },

            DeskAction::RosterUploaded { summary } => {
                state.roster.uploading = false;
                let text = format!(
                    "Imported {} participants ({} skipped)",
                    summary.imported, summary.skipped
                );
                state.roster.last_import = Some(summary);
                smallvec![Self::set_status(state, StatusMessage::success(text))]
            },

            DeskAction::UploadFailed { error } => {
                state.roster.uploading = false;
                smallvec![Self::set_status(state, StatusMessage::from_api_error(&error))]
            },

            DeskAction::RosterStatusCleared { stamp } => {
                if state.roster.status_stamp == stamp {
                    state.roster.status = None;
                }
                smallvec![]
            },

            _ => smallvec![],
        }
    }
}
