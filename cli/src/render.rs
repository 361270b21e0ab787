//! Terminal rendering for the operator shell
//!
//! Pure `state → String` functions; the shell prints whatever the active
//! tab renders after each command settles.

use colored::Colorize;
use smart_entry_api::{EntryEvent, Participant};
use smart_entry_desk::{DeskState, StatusKind, StatusMessage, Tab};
use std::fmt::Write as _;

/// The tab bar, with the active tab highlighted and gated tabs hidden
#[must_use]
pub fn tab_bar(state: &DeskState) -> String {
    let mut parts = Vec::new();
    for tab in Tab::ALL {
        if !state.shell.allows(tab) {
            continue;
        }
        if tab == state.shell.active_tab {
            parts.push(format!("[{}]", tab.label().bold().green()));
        } else {
            parts.push(format!(" {} ", tab.label().dimmed()));
        }
    }
    parts.join(" | ")
}

/// Render the active tab
#[must_use]
pub fn current_tab(state: &DeskState) -> String {
    match state.shell.active_tab {
        Tab::SearchAssign => search_panel(state),
        Tab::MarkEntry => entry_panel(state),
        Tab::Participants => participants_panel(state),
        Tab::Entries => entries_panel(state),
        Tab::Stats => stats_panel(state),
        Tab::Upload => upload_panel(state),
    }
}

/// Render a transient status message in its severity color
#[must_use]
pub fn status_line(status: &StatusMessage) -> String {
    match status.kind {
        StatusKind::Info => status.text.yellow().to_string(),
        StatusKind::Success => status.text.green().to_string(),
        StatusKind::Error => status.text.red().to_string(),
    }
}

fn participant_row(participant: &Participant) -> String {
    format!(
        "{} — {} — {}  Barcode: {}",
        participant.name,
        participant.email,
        participant.reference_no,
        participant
            .barcode
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or("—")
            .bold(),
    )
}

fn entry_row(entry: &EntryEvent) -> String {
    let local = entry.timestamp.with_timezone(&chrono::Local);
    format!("{} - {}", entry.venue, local.format("%Y-%m-%d %H:%M:%S"))
}

fn search_panel(state: &DeskState) -> String {
    let mut out = String::new();
    let search = &state.search;

    if search.results.is_empty() {
        out.push_str(&"(no results)\n".dimmed().to_string());
    } else {
        for (i, participant) in search.results.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", i + 1, participant_row(participant));
        }
    }

    if let Some(selection) = &search.selection {
        let _ = writeln!(
            out,
            "\nSelected: {} ({})",
            selection.participant.name.bold(),
            selection.participant.email
        );
        let _ = writeln!(out, "Barcode input: {}", selection.barcode_input);
        if selection.submitting {
            let _ = writeln!(out, "{}", "Submitting…".yellow());
        }
    }

    if let Some(status) = &search.status {
        let _ = writeln!(out, "{}", status_line(status));
    }
    out
}

fn entry_panel(state: &DeskState) -> String {
    let mut out = String::new();
    let entry = &state.entry;

    if entry.submitting {
        let _ = writeln!(out, "{}", "Marking entry…".yellow());
    }

    match &entry.history_barcode {
        Some(barcode) => {
            let _ = writeln!(out, "Entry history for {} (recent):", barcode.bold());
            if entry.history.is_empty() {
                out.push_str(&"(no entries)\n".dimmed().to_string());
            }
            for event in &entry.history {
                let _ = writeln!(out, "  {}", entry_row(event));
            }
        },
        None => out.push_str(&"(no barcode queried yet)\n".dimmed().to_string()),
    }

    if let Some(status) = &entry.status {
        let _ = writeln!(out, "{}", status_line(status));
    }
    out
}

fn participants_panel(state: &DeskState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} participants", state.roster.participants.len());
    for participant in &state.roster.participants {
        let _ = writeln!(out, "  {}", participant_row(participant));
    }
    append_roster_status(state, &mut out);
    out
}

fn entries_panel(state: &DeskState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} entries", state.roster.entries.len());
    for event in &state.roster.entries {
        let _ = writeln!(out, "  {}  {}", event.barcode, entry_row(event));
    }
    append_roster_status(state, &mut out);
    out
}

fn stats_panel(state: &DeskState) -> String {
    let mut out = String::new();
    match &state.roster.stats {
        Some(stats) => {
            let _ = writeln!(out, "Total entries:       {}", stats.total_entries);
            let _ = writeln!(out, "Unique participants: {}", stats.unique_participants);
        },
        None => out.push_str(&"No stats loaded\n".dimmed().to_string()),
    }
    append_roster_status(state, &mut out);
    out
}

fn upload_panel(state: &DeskState) -> String {
    let mut out = String::new();
    if state.roster.uploading {
        let _ = writeln!(out, "{}", "Uploading…".yellow());
    }
    match &state.roster.last_import {
        Some(summary) => {
            let _ = writeln!(
                out,
                "Last import: {} imported, {} skipped",
                summary.imported, summary.skipped
            );
            for error in &summary.errors {
                let _ = writeln!(out, "  {}", error.red());
            }
        },
        None => out.push_str(&"No roster uploaded yet\n".dimmed().to_string()),
    }
    append_roster_status(state, &mut out);
    out
}

fn append_roster_status(state: &DeskState, out: &mut String) {
    if let Some(status) = &state.roster.status {
        let _ = writeln!(out, "{}", status_line(status));
    }
}
