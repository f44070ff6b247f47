//! Interactive command shell
//!
//! Reads line-oriented commands from a terminal, dispatches to the mailbox
//! client, and renders plain-text summaries. The session moves through three
//! states: awaiting authentication, the ready loop, and terminated. All
//! remote failures are printed and the loop continues; only authentication
//! failure terminates the session.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::warn;

use crate::auth::{AuthStatus, CredentialStore};
use crate::client::MailboxClient;
use crate::error::{GmailError, Result};

/// How many identifiers a list-style command displays, regardless of how
/// many were fetched. A display policy, not a data-layer limit.
pub const DEFAULT_DISPLAY_LIMIT: usize = 5;

/// How many messages list-style commands fetch when no count is given
const DEFAULT_FETCH_COUNT: u32 = 10;

const MENU: &str = "\nAvailable commands:
1. list [count] - List recent emails
2. details <messageId> - Get email details
3. filter <query> [count] - Filter emails by query
4. search-sender <email> [count] - Search by sender
5. search-subject <text> [count] - Search by subject
6. search-label <name> [count] - Search by label
7. search-unread [count] - List unread emails
8. labels - List all labels
9. create-label <name> - Create new label
10. add-label <messageId> <labelId> - Add label to email
11. remove-label <messageId> <labelId> - Remove label from email
12. archive <messageId> - Archive email
13. unarchive <messageId> - Unarchive email
14. quit - Exit the application";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { count: u32 },
    Details { message_id: String },
    Filter { query: String, count: u32 },
    SearchSender { sender: String, count: u32 },
    SearchSubject { subject: String, count: u32 },
    SearchLabel { label: String, count: u32 },
    SearchUnread { count: u32 },
    Labels,
    CreateLabel { name: String },
    AddLabel { message_id: String, label_id: String },
    RemoveLabel { message_id: String, label_id: String },
    Archive { message_id: String },
    Unarchive { message_id: String },
    Quit,
}

/// Local input errors; caught in the shell, printed, loop continues
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Please provide {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command. Please try again.")]
    Unknown(String),
}

impl Command {
    /// Parse one input line: whitespace-tokenized, command name matched
    /// case-insensitively. Blank lines parse to `None`.
    pub fn parse(line: &str) -> std::result::Result<Option<Command>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        let count = |index: usize| -> u32 {
            args.get(index)
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FETCH_COUNT)
        };

        let command = match name.to_lowercase().as_str() {
            "list" => Command::List { count: count(0) },
            "details" => Command::Details {
                message_id: required(&args, 0, "a message ID")?.to_string(),
            },
            "filter" => Command::Filter {
                query: required(&args, 0, "a search query")?.to_string(),
                count: count(1),
            },
            "search-sender" => Command::SearchSender {
                sender: required(&args, 0, "sender email address")?.to_string(),
                count: count(1),
            },
            "search-subject" => Command::SearchSubject {
                subject: required(&args, 0, "subject text to search for")?.to_string(),
                count: count(1),
            },
            "search-label" => Command::SearchLabel {
                label: required(&args, 0, "a label name")?.to_string(),
                count: count(1),
            },
            "search-unread" => Command::SearchUnread { count: count(0) },
            "labels" => Command::Labels,
            "create-label" => Command::CreateLabel {
                name: required(&args, 0, "a label name")?.to_string(),
            },
            "add-label" => Command::AddLabel {
                message_id: required(&args, 0, "messageId and labelId")?.to_string(),
                label_id: required(&args, 1, "messageId and labelId")?.to_string(),
            },
            "remove-label" => Command::RemoveLabel {
                message_id: required(&args, 0, "messageId and labelId")?.to_string(),
                label_id: required(&args, 1, "messageId and labelId")?.to_string(),
            },
            "archive" => Command::Archive {
                message_id: required(&args, 0, "a message ID")?.to_string(),
            },
            "unarchive" => Command::Unarchive {
                message_id: required(&args, 0, "a message ID")?.to_string(),
            },
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    what: &'static str,
) -> std::result::Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or(CommandError::MissingArgument(what))
}

/// Run the AWAITING_AUTH phase
///
/// Loads the persisted token, or prints the authorization URL and prompts
/// for a one-time code. Returns whether the session is authenticated; a
/// `false` return terminates the session.
pub async fn authenticate<R: BufRead, W: Write>(
    store: &mut CredentialStore,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    match store.ensure_authenticated().await? {
        AuthStatus::Authorized => {
            writeln!(output, "Using existing authentication token")?;
            Ok(true)
        }
        AuthStatus::ConsentRequired { auth_url } => {
            writeln!(
                output,
                "No existing token found. Please run the authentication flow."
            )?;
            writeln!(output, "Authorize this app by visiting this url: {}", auth_url)?;
            writeln!(output, "\nFirst time setup required.")?;
            writeln!(output, "1. Visit the URL above to authorize the app")?;
            writeln!(output, "2. Copy the authorization code")?;
            write!(output, "\nEnter the authorization code: ")?;
            output.flush()?;

            let mut code = String::new();
            if input.read_line(&mut code)? == 0 {
                return Ok(false);
            }
            let code = code.trim();
            if code.is_empty() {
                return Ok(false);
            }

            match store.complete_authorization(code).await {
                Ok(()) => {
                    writeln!(output, "Token stored successfully")?;
                    Ok(true)
                }
                Err(e) => {
                    warn!("Authorization exchange failed: {}", e);
                    writeln!(output, "Error retrieving access token: {}", e)?;
                    Ok(false)
                }
            }
        }
    }
}

/// The READY command loop
pub struct InteractiveShell<C, R, W> {
    client: C,
    input: R,
    output: W,
    display_limit: usize,
}

impl<C, R, W> InteractiveShell<C, R, W>
where
    C: MailboxClient,
    R: BufRead,
    W: Write,
{
    pub fn new(client: C, input: R, output: W) -> Self {
        Self {
            client,
            input,
            output,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }

    /// Override how many entries list-style commands display
    pub fn with_display_limit(mut self, display_limit: usize) -> Self {
        self.display_limit = display_limit;
        self
    }

    /// Run the loop until `quit`/`exit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            write!(self.output, "\nEnter command: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            match Command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Quit)) => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                Ok(Some(command)) => self.dispatch(command).await?,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::List { count } => {
                writeln!(self.output, "\nFetching {} recent emails...", count)?;
                let result = self.client.list_recent(count).await;
                self.render_id_list(result).await?;
            }
            Command::Details { message_id } => match self.client.get_details(&message_id).await {
                Ok(details) => {
                    writeln!(self.output, "\nEmail Details:")?;
                    self.render_summary(&details)?;
                }
                Err(e) => {
                    warn!("Error fetching email details: {}", e);
                    writeln!(self.output, "Email not found or error occurred")?;
                }
            },
            Command::Filter { query, count } => {
                let result = self.client.filter(&query, count).await;
                self.render_id_list(result).await?;
            }
            Command::SearchSender { sender, count } => {
                let result = self.client.search_by_sender(&sender, count).await;
                self.render_id_list(result).await?;
            }
            Command::SearchSubject { subject, count } => {
                let result = self.client.search_by_subject(&subject, count).await;
                self.render_id_list(result).await?;
            }
            Command::SearchLabel { label, count } => {
                let result = self.client.search_by_label(&label, count).await;
                self.render_id_list(result).await?;
            }
            Command::SearchUnread { count } => {
                let result = self.client.search_unread(count).await;
                self.render_id_list(result).await?;
            }
            Command::Labels => match self.client.list_labels().await {
                Ok(labels) => {
                    writeln!(self.output, "\nAvailable Labels:")?;
                    for label in labels {
                        writeln!(self.output, "ID: {} | Name: {}", label.id, label.name)?;
                    }
                }
                Err(e) => self.report_failure("fetching labels", &e)?,
            },
            Command::CreateLabel { name } => match self.client.create_label(&name).await {
                Ok(label) => writeln!(
                    self.output,
                    "Label created successfully: {} (ID: {})",
                    label.name, label.id
                )?,
                Err(e) => self.report_failure("creating label", &e)?,
            },
            Command::AddLabel {
                message_id,
                label_id,
            } => match self.client.add_label(&message_id, &label_id).await {
                Ok(()) => writeln!(self.output, "Label added successfully")?,
                Err(e) => self.report_failure("adding label", &e)?,
            },
            Command::RemoveLabel {
                message_id,
                label_id,
            } => match self.client.remove_label(&message_id, &label_id).await {
                Ok(()) => writeln!(self.output, "Label removed successfully")?,
                Err(e) => self.report_failure("removing label", &e)?,
            },
            Command::Archive { message_id } => match self.client.archive(&message_id).await {
                Ok(()) => writeln!(self.output, "Email archived successfully")?,
                Err(e) => self.report_failure("archiving email", &e)?,
            },
            Command::Unarchive { message_id } => match self.client.unarchive(&message_id).await {
                Ok(()) => writeln!(self.output, "Email unarchived successfully")?,
                Err(e) => self.report_failure("unarchiving email", &e)?,
            },
            Command::Quit => unreachable!("Quit is handled by the run loop"),
        }
        Ok(())
    }

    /// Render a list-command result: fetch details for the first
    /// `display_limit` identifiers and print one block per message
    async fn render_id_list(&mut self, result: Result<Vec<String>>) -> Result<()> {
        let ids = match result {
            Ok(ids) => ids,
            Err(e) => return self.report_failure("fetching emails", &e),
        };

        for id in ids.iter().take(self.display_limit) {
            match self.client.get_details(id).await {
                Ok(details) => {
                    writeln!(self.output)?;
                    self.render_summary(&details)?;
                    writeln!(self.output, "{}", "-".repeat(50))?;
                }
                Err(e) => warn!("Skipping message {}: {}", id, e),
            }
        }
        Ok(())
    }

    fn render_summary(&mut self, details: &crate::models::MessageSummary) -> Result<()> {
        writeln!(self.output, "ID: {}", details.id)?;
        writeln!(self.output, "From: {}", details.from)?;
        writeln!(self.output, "Subject: {}", details.subject)?;
        writeln!(self.output, "Date: {}", details.date)?;
        writeln!(self.output, "Labels: {}", details.labels.join(", "))?;
        writeln!(self.output, "Preview: {}", details.snippet)?;
        Ok(())
    }

    fn report_failure(&mut self, action: &str, err: &GmailError) -> Result<()> {
        warn!("Error {}: {}", action, err);
        writeln!(self.output, "Error {}: {}", action, err)?;
        Ok(())
    }
}
