//! Search-and-select reducer
//!
//! Free-text participant search with selection and barcode
//! assign/deassign. Two invariants drive the shape of this reducer:
//!
//! - Every search carries a sequence number; a response whose sequence is
//!   not the one currently in flight is discarded, so a slow superseded
//!   request can never overwrite newer results.
//! - Assign/deassign successes reconcile the updated participant into
//!   BOTH the selected record and the results list, keeping the two views
//!   consistent without a re-fetch.

use crate::actions::DeskAction;
use crate::environment::DeskEnvironment;
use crate::error::DeskError;
use crate::state::{
    DeskState, STATUS_TTL, SearchPhase, SearchState, Selection, StatusMessage,
};
use smart_entry_api::Participant;
use smart_entry_core::effect::Effect;
use smart_entry_core::reducer::Reducer;
use smart_entry_core::{SmallVec, smallvec};

/// Reducer for the search-and-select workflow
#[derive(Clone, Debug, Default)]
pub struct SearchReducer;

impl SearchReducer {
    /// Create a new search reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Show a transient status and arm its expiry timer
    fn set_status(state: &mut DeskState, message: StatusMessage) -> Effect<DeskAction> {
        state.search.status_stamp += 1;
        let stamp = state.search.status_stamp;
        state.search.status = Some(message);
        Effect::Delay {
            duration: STATUS_TTL,
            action: Box::new(DeskAction::SearchStatusCleared { stamp }),
        }
    }

    /// Returns `true` if `seq` is the request currently in flight
    const fn is_current(search: &SearchState, seq: u64) -> bool {
        matches!(search.phase, SearchPhase::Searching { seq: current } if current == seq)
    }

    /// Reconcile an updated participant into the selected record and the
    /// results list
    fn apply_participant_update(search: &mut SearchState, participant: &Participant) {
        if let Some(slot) = search
            .results
            .iter_mut()
            .find(|p| p.email == participant.email)
        {
            *slot = participant.clone();
        }

        if let Some(selection) = &mut search.selection {
            selection.submitting = false;
            if selection.participant.email == participant.email {
                selection.barcode_input = participant.barcode.clone().unwrap_or_default();
                selection.participant = participant.clone();
            }
        }
    }
}

impl Reducer for SearchReducer {
    type State = DeskState;
    type Action = DeskAction;
    type Environment = DeskEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per workflow transition
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Search
            // ═══════════════════════════════════════════════════════════
            DeskAction::Search { term } => {
                let term = term.trim().to_string();
                if term.is_empty() {
                    // Rejected locally; no network call
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(
                            DeskError::MissingField {
                                field: "Search term"
                            }
                            .to_string()
                        ),
                    )];
                }

                state.search.next_seq += 1;
                let seq = state.search.next_seq;
                state.search.phase = SearchPhase::Searching { seq };

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.search_participants(&term).await {
                        Ok(results) => Some(DeskAction::SearchLoaded { seq, results }),
                        Err(error) => Some(DeskAction::SearchFailed { seq, error }),
                    }
                }))]
            },

            DeskAction::SearchLoaded { seq, results } => {
                if !Self::is_current(&state.search, seq) {
                    tracing::debug!(seq, "Discarding stale search response");
                    return smallvec![];
                }

                state.search.phase = SearchPhase::Results;
                state.search.results = results;
                state.search.selection = None;

                if state.search.results.is_empty() {
                    smallvec![Self::set_status(
                        state,
                        StatusMessage::info("No participants found"),
                    )]
                } else {
                    state.search.status = None;
                    smallvec![]
                }
            },

            DeskAction::SearchFailed { seq, error } => {
                if !Self::is_current(&state.search, seq) {
                    tracing::debug!(seq, "Discarding stale search failure");
                    return smallvec![];
                }

                // Prior results and selection stay intact
                state.search.phase = SearchPhase::Idle;
                smallvec![Self::set_status(state, StatusMessage::from_api_error(&error))]
            },

            // ═══════════════════════════════════════════════════════════
            // Selection
            // ═══════════════════════════════════════════════════════════
            DeskAction::Select { index } => {
                match state.search.results.get(index).cloned() {
                    Some(participant) => {
                        state.search.selection = Some(Selection::new(participant));
                        smallvec![]
                    },
                    None => smallvec![Self::set_status(
                        state,
                        StatusMessage::error(
                            DeskError::NoSuchResult { index: index + 1 }.to_string()
                        ),
                    )],
                }
            },

            DeskAction::ClearSelection => {
                state.search.selection = None;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Assign / deassign
            // ═══════════════════════════════════════════════════════════
            DeskAction::Assign { code } => {
                let Some(selection) = &mut state.search.selection else {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(DeskError::NothingSelected.to_string()),
                    )];
                };

                if selection.submitting {
                    tracing::debug!("Assign already in flight, ignoring");
                    return smallvec![];
                }

                let code = code.trim().to_string();
                if code.is_empty() {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(
                            DeskError::MissingField { field: "Barcode" }.to_string()
                        ),
                    )];
                }

                selection.submitting = true;
                selection.barcode_input = code.clone();
                let email = selection.participant.email.clone();

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.assign_barcode(&email, &code).await {
                        Ok(participant) => Some(DeskAction::AssignSucceeded { participant }),
                        Err(error) => Some(DeskAction::AssignFailed { error }),
                    }
                }))]
            },

            DeskAction::AssignSucceeded { participant } => {
                Self::apply_participant_update(&mut state.search, &participant);
                smallvec![Self::set_status(
                    state,
                    StatusMessage::success("Barcode assigned"),
                )]
            },

            DeskAction::AssignFailed { error } => {
                // Selection and entered code stay intact for resubmission
                if let Some(selection) = &mut state.search.selection {
                    selection.submitting = false;
                }
                smallvec![Self::set_status(state, StatusMessage::from_api_error(&error))]
            },

            DeskAction::Deassign => {
                let Some(selection) = &mut state.search.selection else {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(DeskError::NothingSelected.to_string()),
                    )];
                };

                if selection.submitting {
                    tracing::debug!("Deassign already in flight, ignoring");
                    return smallvec![];
                }

                // Idempotent from the operator's perspective: rejected
                // locally before the network when nothing is assigned
                if !selection.participant.has_barcode() {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::info(DeskError::NoBarcodeAssigned.to_string()),
                    )];
                }

                selection.submitting = true;
                let email = selection.participant.email.clone();

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.deassign_barcode(&email).await {
                        Ok(participant) => Some(DeskAction::DeassignSucceeded { participant }),
                        Err(error) => Some(DeskAction::DeassignFailed { error }),
                    }
                }))]
            },

            DeskAction::DeassignSucceeded { participant } => {
                Self::apply_participant_update(&mut state.search, &participant);
                smallvec![Self::set_status(
                    state,
                    StatusMessage::success("Barcode removed"),
                )]
            },

            DeskAction::DeassignFailed { error } => {
                if let Some(selection) = &mut state.search.selection {
                    selection.submitting = false;
                }
                smallvec![Self::set_status(state, StatusMessage::from_api_error(&error))]
            },

            DeskAction::SearchStatusCleared { stamp } => {
                // A newer message re-armed the timer; only the matching
                // stamp clears
                if state.search.status_stamp == stamp {
                    state.search.status = None;
                }
                smallvec![]
            },

            _ => smallvec![],
        }
    }
}
