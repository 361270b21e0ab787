//! Interactive operator shell
//!
//! Wires the API client, session store, and desk store together and
//! drives them from a readline REPL. The shell is deliberately thin:
//! every behavior lives in the reducers, and the shell only parses
//! commands, waits for the matching terminal action, and renders state.

use crate::commands::{self, Command};
use crate::config::Config;
use crate::render;
use anyhow::Context as _;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use smart_entry_api::{ApiClient, Role, SessionHandle};
use smart_entry_desk::{DeskAction, DeskEnvironment, DeskReducer, DeskState, Tab};
use smart_entry_runtime::{Store, StoreError};
use smart_entry_session::{
    SessionAction, SessionEnvironment, SessionReducer, SessionState, TokenCache,
};
use std::sync::Arc;
use std::time::Duration;

/// How long a command waits for its terminal action
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type SessionStore = Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;
type DeskStore = Store<DeskState, DeskAction, DeskEnvironment, DeskReducer>;

struct Shell {
    session: SessionStore,
    desk: DeskStore,
}

/// Run the shell until the operator quits
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cache = config.token_cache();
    let restored = cache.load();

    let handle = match &restored {
        Some(token) => SessionHandle::with_token(token.clone()),
        None => SessionHandle::new(),
    };
    let api = ApiClient::new(config.api_url.clone(), handle);

    let session_state = restored
        .clone()
        .map_or_else(SessionState::new, SessionState::restored);
    let session = Store::new(
        session_state,
        SessionReducer::new(),
        SessionEnvironment::new(api.clone(), Arc::new(cache)),
    );
    let desk = Store::new(
        DeskState::default(),
        DeskReducer::new(),
        DeskEnvironment::new(api),
    );

    println!("{}", "Smart Entry".bold().green());
    if restored.is_some() {
        println!("{}", "Restored session from cached token; log in again to refresh your role.".yellow());
    }
    println!("Type {} for commands, {} to exit.\n", "help".yellow(), "quit".yellow());

    let shell = Shell { session, desk };
    shell.repl().await
}

impl Shell {
    async fn repl(&self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new().context("failed to initialize readline")?;

        loop {
            let prompt = self.prompt_line().await;
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(&line);

                    match commands::parse(trimmed) {
                        Ok(Command::Quit) => break,
                        Ok(command) => {
                            if let Err(error) = self.handle(command).await {
                                eprintln!("{}: {error}", "error".red());
                            }
                        },
                        Err(message) => eprintln!("{}", message.red()),
                    }
                },
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("{}: {error}", "error".red());
                    break;
                },
            }
        }

        // Let in-flight effects finish before exiting
        let _ = self.desk.shutdown(Duration::from_secs(5)).await;
        let _ = self.session.shutdown(Duration::from_secs(5)).await;
        Ok(())
    }

    async fn prompt_line(&self) -> String {
        let (authenticated, role) = self
            .session
            .state(|s| (s.is_authenticated(), s.user().map(|u| u.role)))
            .await;

        match (authenticated, role) {
            (true, Some(role)) => format!("{}({role})> ", "smart-entry".green()),
            (true, None) => format!("{}> ", "smart-entry".green()),
            (false, _) => format!("{}> ", "smart-entry".dimmed()),
        }
    }

    async fn render(&self) {
        let state = self.desk.state(Clone::clone).await;
        println!("\n{}", render::tab_bar(&state));
        print!("{}", render::current_tab(&state));
    }

    async fn handle(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Help => {
                println!("{}", commands::HELP);
                Ok(())
            },
            Command::Show => {
                self.render().await;
                Ok(())
            },
            Command::Login {
                identifier,
                password,
            } => self.login(identifier, password).await,
            Command::Logout => self.logout().await,
            other => {
                if !self.session.state(SessionState::is_authenticated).await {
                    println!("{}", "Please log in first".yellow());
                    return Ok(());
                }
                self.handle_desk(other).await
            },
        }
    }

    async fn login(&self, identifier: String, password: String) -> anyhow::Result<()> {
        let result = self
            .session
            .send_and_wait_for(
                SessionAction::Login {
                    identifier,
                    password,
                },
                |a| {
                    matches!(
                        a,
                        SessionAction::LoginSucceeded { .. } | SessionAction::LoginFailed { .. }
                    )
                },
                REQUEST_TIMEOUT,
            )
            .await;

        match result {
            Ok(SessionAction::LoginSucceeded { user, .. }) => {
                println!("Logged in as {} ({})", user.email.bold(), user.role);
                self.desk
                    .send(DeskAction::RoleChanged {
                        role: Some(user.role),
                    })
                    .await?;
                self.render().await;
            },
            Ok(SessionAction::LoginFailed { error }) => {
                println!("{}", error.to_string().red());
            },
            Ok(_) => {},
            Err(StoreError::Timeout) => println!("{}", "Login timed out".red()),
            Err(error) => return Err(error.into()),
        }
        Ok(())
    }

    async fn logout(&self) -> anyhow::Result<()> {
        self.session.send(SessionAction::Logout).await?;
        self.desk
            .send(DeskAction::RoleChanged { role: None })
            .await?;
        println!("Logged out");
        Ok(())
    }

    /// Tear the session down after a request observed an auth failure
    async fn teardown_session(&self) -> anyhow::Result<()> {
        self.session.send(SessionAction::AuthFailureObserved).await?;
        self.desk
            .send(DeskAction::RoleChanged { role: None })
            .await?;
        println!("{}", "Session expired — please log in again".red());
        Ok(())
    }

    /// Send a desk action and wait for its terminal event
    ///
    /// Auth failures tear the session down; timeouts are reported but
    /// leave the shell usable.
    async fn wait_desk<F>(&self, action: DeskAction, terminal: F) -> anyhow::Result<()>
    where
        F: Fn(&DeskAction) -> bool,
    {
        match self
            .desk
            .send_and_wait_for(action, terminal, REQUEST_TIMEOUT)
            .await
        {
            Ok(result) => {
                if result.is_auth_failure() {
                    self.teardown_session().await?;
                }
                Ok(())
            },
            Err(StoreError::Timeout) => {
                println!("{}", "Timed out waiting for the server".red());
                Ok(())
            },
            Err(error) => Err(error.into()),
        }
    }

    #[allow(clippy::too_many_lines)] // One arm per operator command
    async fn handle_desk(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Search { term } => {
                if term.trim().is_empty() {
                    // Rejected by the reducer without a network call
                    self.desk.send(DeskAction::Search { term }).await?;
                } else {
                    self.wait_desk(DeskAction::Search { term }, |a| {
                        matches!(
                            a,
                            DeskAction::SearchLoaded { .. } | DeskAction::SearchFailed { .. }
                        )
                    })
                    .await?;
                }
            },

            Command::Select { index } => {
                self.desk.send(DeskAction::Select { index }).await?;
            },

            Command::Assign { code } => {
                let resolved = match code {
                    Some(code) => code,
                    // Bare `assign` re-submits the pre-filled input
                    None => self
                        .desk
                        .state(|s| {
                            s.search
                                .selection
                                .as_ref()
                                .map(|sel| sel.barcode_input.clone())
                        })
                        .await
                        .unwrap_or_default(),
                };

                let will_submit = !resolved.trim().is_empty()
                    && self
                        .desk
                        .state(|s| {
                            s.search.selection.as_ref().is_some_and(|sel| !sel.submitting)
                        })
                        .await;

                let action = DeskAction::Assign { code: resolved };
                if will_submit {
                    self.wait_desk(action, |a| {
                        matches!(
                            a,
                            DeskAction::AssignSucceeded { .. } | DeskAction::AssignFailed { .. }
                        )
                    })
                    .await?;
                } else {
                    self.desk.send(action).await?;
                }
            },

            Command::Deassign => {
                let will_submit = self
                    .desk
                    .state(|s| {
                        s.search.selection.as_ref().is_some_and(|sel| {
                            !sel.submitting && sel.participant.has_barcode()
                        })
                    })
                    .await;

                if will_submit {
                    self.wait_desk(DeskAction::Deassign, |a| {
                        matches!(
                            a,
                            DeskAction::DeassignSucceeded { .. }
                                | DeskAction::DeassignFailed { .. }
                        )
                    })
                    .await?;
                } else {
                    self.desk.send(DeskAction::Deassign).await?;
                }
            },

            Command::Mark { barcode, venue } => {
                let will_submit = !barcode.trim().is_empty() && venue.is_some();
                let action = DeskAction::MarkEntry { barcode, venue };
                if will_submit {
                    // The flow is terminal once the refetched history (or
                    // the failure) lands
                    self.wait_desk(action, |a| {
                        matches!(
                            a,
                            DeskAction::HistoryLoaded { .. }
                                | DeskAction::HistoryLoadFailed { .. }
                                | DeskAction::MarkEntryFailed { .. }
                        )
                    })
                    .await?;
                } else {
                    self.desk.send(action).await?;
                }
            },

            Command::History { barcode } => {
                let will_submit = !barcode.trim().is_empty();
                let action = DeskAction::LoadHistory { barcode };
                if will_submit {
                    self.wait_desk(action, |a| {
                        matches!(
                            a,
                            DeskAction::HistoryLoaded { .. }
                                | DeskAction::HistoryLoadFailed { .. }
                        )
                    })
                    .await?;
                } else {
                    self.desk.send(action).await?;
                }
            },

            Command::Tab { tab } => {
                if !self.desk.state(|s| s.shell.allows(tab)).await {
                    println!("{}", "Admin role required".yellow());
                    return Ok(());
                }

                let action = DeskAction::SwitchTab { tab };
                match tab {
                    Tab::Participants => {
                        self.wait_desk(action, |a| {
                            matches!(
                                a,
                                DeskAction::ParticipantsLoaded { .. }
                                    | DeskAction::RosterLoadFailed { .. }
                            )
                        })
                        .await?;
                    },
                    Tab::Entries => {
                        self.wait_desk(action, |a| {
                            matches!(
                                a,
                                DeskAction::EntriesLoaded { .. }
                                    | DeskAction::RosterLoadFailed { .. }
                            )
                        })
                        .await?;
                    },
                    Tab::Stats => {
                        self.wait_desk(action, |a| {
                            matches!(
                                a,
                                DeskAction::StatsLoaded { .. }
                                    | DeskAction::RosterLoadFailed { .. }
                            )
                        })
                        .await?;
                    },
                    Tab::SearchAssign | Tab::MarkEntry | Tab::Upload => {
                        self.desk.send(action).await?;
                    },
                }
            },

            Command::Refresh => self.refresh_all().await?,

            Command::Upload { path } => {
                if !self
                    .desk
                    .state(|s| s.shell.role == Some(Role::Admin))
                    .await
                {
                    println!("{}", "Admin role required".yellow());
                    return Ok(());
                }

                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("could not read {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .and_then(std::ffi::OsStr::to_str)
                    .unwrap_or("roster.xlsx")
                    .to_string();

                let will_submit = self.desk.state(|s| !s.roster.uploading).await;

                let action = DeskAction::UploadRoster { file_name, bytes };
                if will_submit {
                    self.wait_desk(action, |a| {
                        matches!(
                            a,
                            DeskAction::RosterUploaded { .. } | DeskAction::UploadFailed { .. }
                        )
                    })
                    .await?;
                } else {
                    self.desk.send(action).await?;
                }
            },

            // Handled before dispatch
            Command::Login { .. }
            | Command::Logout
            | Command::Help
            | Command::Show
            | Command::Quit => {},
        }

        self.render().await;
        Ok(())
    }

    /// Re-issue every reporting fetch and wait for all three results
    async fn refresh_all(&self) -> anyhow::Result<()> {
        let mut rx = self.desk.subscribe_actions();
        self.desk.send(DeskAction::RefreshAll).await?;

        let mut auth_failed = false;
        let _ = tokio::time::timeout(REQUEST_TIMEOUT, async {
            let (mut participants, mut entries, mut stats) = (false, false, false);
            while !(participants && entries && stats) {
                match rx.recv().await {
                    Ok(action) => {
                        if action.is_auth_failure() {
                            auth_failed = true;
                            break;
                        }
                        match action {
                            DeskAction::ParticipantsLoaded { .. } => participants = true,
                            DeskAction::EntriesLoaded { .. } => entries = true,
                            DeskAction::StatsLoaded { .. } => stats = true,
                            // The failure is already in the status line
                            DeskAction::RosterLoadFailed { .. } => break,
                            _ => {},
                        }
                    },
                    Err(_) => break,
                }
            }
        })
        .await;

        if auth_failed {
            self.teardown_session().await?;
        }
        Ok(())
    }
}
