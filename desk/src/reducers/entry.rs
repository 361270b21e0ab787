//! Entry-marking reducer
//!
//! Records attendance events and keeps the recent-history view in sync.
//! After every successful mark the history for that barcode is
//! re-fetched; the locally appended entry is only a preview and the
//! server's list replaces it wholesale when it arrives.

use crate::actions::DeskAction;
use crate::environment::DeskEnvironment;
use crate::error::DeskError;
use crate::state::{DeskState, STATUS_TTL, StatusMessage};
use smart_entry_core::effect::Effect;
use smart_entry_core::reducer::Reducer;
use smart_entry_core::{SmallVec, smallvec};

/// Reducer for the entry-marking workflow
#[derive(Clone, Debug, Default)]
pub struct EntryReducer;

impl EntryReducer {
    /// Create a new entry reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Show a transient status and arm its expiry timer
    fn set_status(state: &mut DeskState, message: StatusMessage) -> Effect<DeskAction> {
        state.entry.status_stamp += 1;
        let stamp = state.entry.status_stamp;
        state.entry.status = Some(message);
        Effect::Delay {
            duration: STATUS_TTL,
            action: Box::new(DeskAction::EntryStatusCleared { stamp }),
        }
    }
}

impl Reducer for EntryReducer {
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
            DeskAction::MarkEntry { barcode, venue } => {
                if state.entry.submitting {
                    tracing::debug!("Mark entry already in flight, ignoring");
                    return smallvec![];
                }

                let barcode = barcode.trim().to_string();
                if barcode.is_empty() {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(
                            DeskError::MissingField { field: "Barcode" }.to_string()
                        ),
                    )];
                }
                let Some(venue) = venue else {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(
                            DeskError::MissingField { field: "Venue" }.to_string()
                        ),
                    )];
                };

                state.entry.submitting = true;

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.mark_entry(&barcode, venue).await {
                        Ok(response) => Some(DeskAction::EntryMarked { response }),
                        Err(error) => Some(DeskAction::MarkEntryFailed { error }),
                    }
                }))]
            },

            DeskAction::EntryMarked { response } => {
                state.entry.submitting = false;

                let barcode = response.entry.barcode.clone();
                state.entry.history_barcode = Some(barcode.clone());
                // Append immediately so the operator sees the new entry;
                // the re-fetch below replaces this with the server's list
                state.entry.history.insert(0, response.entry.clone());

                let status_effect =
                    Self::set_status(state, StatusMessage::success(response.message.clone()));

                let api = env.api.clone();
                smallvec![
                    status_effect,
                    Effect::Future(Box::pin(async move {
                        match api.entry_history(&barcode).await {
                            Ok(history) => Some(DeskAction::HistoryLoaded {
                                barcode,
                                entries: history.entries,
                            }),
                            Err(error) => Some(DeskAction::HistoryLoadFailed { error }),
                        }
                    })),
                ]
            },

            DeskAction::MarkEntryFailed { error } => {
                // History stays untouched on failure
                state.entry.submitting = false;
                smallvec![Self::set_status(state, StatusMessage::from_api_error(&error))]
            },

            DeskAction::LoadHistory { barcode } => {
                let barcode = barcode.trim().to_string();
                if barcode.is_empty() {
                    return smallvec![Self::set_status(
                        state,
                        StatusMessage::error(
                            DeskError::MissingField { field: "Barcode" }.to_string()
                        ),
                    )];
                }

                state.entry.history_barcode = Some(barcode.clone());

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.entry_history(&barcode).await {
                        Ok(history) => Some(DeskAction::HistoryLoaded {
                            barcode,
                            entries: history.entries,
                        }),
                        Err(error) => Some(DeskAction::HistoryLoadFailed { error }),
                    }
                }))]
            },

            DeskAction::HistoryLoaded { barcode, entries } => {
                // The server's list is authoritative, but only for the
                // barcode currently displayed
                if state.entry.history_barcode.as_deref() == Some(barcode.as_str()) {
                    state.entry.history = entries;
                } else {
                    tracing::debug!(%barcode, "Discarding history for a superseded barcode");
                }
                smallvec![]
            },

            DeskAction::HistoryLoadFailed { error } => {
                tracing::warn!(%error, "History re-fetch failed");
                smallvec![Self::set_status(state, StatusMessage::from_api_error(&error))]
            },

            DeskAction::EntryStatusCleared { stamp } => {
                if state.entry.status_stamp == stamp {
                    state.entry.status = None;
                }
                smallvec![]
            },

            _ => smallvec![],
        }
    }
}
