//! Operator command parsing
//!
//! One line of input, one command. Field-level validation (empty term,
//! missing venue) stays in the reducers so every front-end shares it;
//! the parser only decides which command the operator meant.

use smart_entry_api::Venue;
use smart_entry_desk::Tab;
use std::path::PathBuf;

/// A parsed operator command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `login <identifier> <password>`
    Login {
        /// Email or staff id
        identifier: String,
        /// Password
        password: String,
    },
    /// `logout`
    Logout,
    /// `search <term…>`
    Search {
        /// Free-text search term (may be empty; the reducer rejects it)
        term: String,
    },
    /// `select <n>` (1-based result row)
    Select {
        /// 0-based index into the result list
        index: usize,
    },
    /// `assign [code]` — no argument re-submits the pre-filled barcode
    Assign {
        /// Explicit barcode, when given
        code: Option<String>,
    },
    /// `deassign`
    Deassign,
    /// `mark <barcode> [venue…]`
    Mark {
        /// Badge barcode (may be empty; the reducer rejects it)
        barcode: String,
        /// Venue, when one was given and parsed
        venue: Option<Venue>,
    },
    /// `history <barcode>`
    History {
        /// Badge barcode
        barcode: String,
    },
    /// `tab <name>`
    Tab {
        /// Target tab
        tab: Tab,
    },
    /// `refresh` — re-fetch every reporting view
    Refresh,
    /// `upload <path>`
    Upload {
        /// Spreadsheet to upload
        path: PathBuf,
    },
    /// `show` — re-render the current tab
    Show,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

/// Parse one line of operator input
///
/// # Errors
///
/// Returns a user-facing message for unknown commands, unknown tabs or
/// venues, and malformed arguments.
pub fn parse(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err("Empty command".to_string());
    };
    let rest: Vec<&str> = words.collect();

    match keyword.to_ascii_lowercase().as_str() {
        "login" => match rest.as_slice() {
            [identifier, password] => Ok(Command::Login {
                identifier: (*identifier).to_string(),
                password: (*password).to_string(),
            }),
            _ => Err("Usage: login <identifier> <password>".to_string()),
        },
        "logout" => Ok(Command::Logout),
        "search" => Ok(Command::Search {
            term: rest.join(" "),
        }),
        "select" => match rest.as_slice() {
            [n] => n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map(|index| Command::Select { index })
                .ok_or_else(|| "Usage: select <result number>".to_string()),
            _ => Err("Usage: select <result number>".to_string()),
        },
        "assign" => Ok(Command::Assign {
            code: match rest.as_slice() {
                [] => None,
                [code] => Some((*code).to_string()),
                _ => return Err("Usage: assign [barcode]".to_string()),
            },
        }),
        "deassign" => Ok(Command::Deassign),
        "mark" => {
            let barcode = rest.first().map_or_else(String::new, |s| (*s).to_string());
            let venue = if rest.len() > 1 {
                Some(
                    rest[1..]
                        .join(" ")
                        .parse::<Venue>()
                        .map_err(|e| e.to_string())?,
                )
            } else {
                None
            };
            Ok(Command::Mark { barcode, venue })
        },
        "history" => Ok(Command::History {
            barcode: rest.join(" "),
        }),
        "tab" => {
            let name = rest.join(" ");
            parse_tab(&name)
                .map(|tab| Command::Tab { tab })
                .ok_or_else(|| {
                    format!(
                        "Unknown tab '{name}' (valid: search, mark, participants, entries, stats, upload)"
                    )
                })
        },
        "refresh" => Ok(Command::Refresh),
        "upload" => match rest.as_slice() {
            [path] => Ok(Command::Upload {
                path: PathBuf::from(path),
            }),
            _ => Err("Usage: upload <path-to-spreadsheet>".to_string()),
        },
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{other}' (try 'help')")),
    }
}

fn parse_tab(name: &str) -> Option<Tab> {
    match name.to_ascii_lowercase().as_str() {
        "search" | "search-assign" | "assign" => Some(Tab::SearchAssign),
        "mark" | "mark-entry" | "entry" => Some(Tab::MarkEntry),
        "participants" | "roster" => Some(Tab::Participants),
        "entries" | "log" => Some(Tab::Entries),
        "stats" | "statistics" => Some(Tab::Stats),
        "upload" => Some(Tab::Upload),
        _ => None,
    }
}

/// One line per command, shown by `help`
pub const HELP: &str = "\
Commands:
  login <identifier> <password>   Log in as admin or staff
  logout                          End the session
  tab <name>                      Switch tab (search, mark, participants, entries, stats, upload)
  search <term>                   Search participants by email, name, ref, mobile, or barcode
  select <n>                      Select result row n
  assign [barcode]                Assign a barcode to the selected participant
  deassign                        Remove the selected participant's barcode
  mark <barcode> <venue>          Record an entry (Main Hall, Exhibition Hall, Dining Hall, Auditorium)
  history <barcode>               Show recent entries for a barcode
  refresh                         Re-fetch all reporting views (admin)
  upload <path>                   Upload a roster spreadsheet (admin)
  show                            Re-render the current tab
  quit                            Exit";
