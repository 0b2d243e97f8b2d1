//! Interactive audit session.
//!
//! The operator is asked for a library id, the source is authenticated, the
//! library is audited, and the operator decides whether to audit another one:
//!
//! ```text
//! AwaitingLibraryId --valid id--> Authenticated --audit--> Reporting --yes--> AwaitingLibraryId
//!        ^   |                                                 |
//!        +---+ bad input                                       +--no--> Done
//! ```
//!
//! Collaborator failures end the current library run (they are shown to the
//! operator and logged) but never the session; only prompt I/O errors do.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use log::{error, warn};

use crate::error::{Error, Result};
use crate::renzoku::RenzokuConfig;
use crate::report::ReportSink;
use crate::source::LibrarySource;
use crate::types::AuditSummary;

pub const LIBRARY_ID_PROMPT: &str = "Enter the Library ID";
pub const CHECK_ANOTHER_PROMPT: &str = "Would you like to check another library?";
pub const LIBRARY_ID_REQUIRED: &str = "Error: Library ID is required.";
pub const LIBRARY_ID_NOT_NUMERIC: &str = "Error: Library ID must be a number.";

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingLibraryId,
    /// Credentials obtained; the library is audited on the next step.
    Authenticated { library_id: i64 },
    /// The library run has ended (successfully or not); waiting for the operator.
    Reporting { library_id: i64 },
    Done,
}

/// Operator interaction used by a [`Session`].
pub trait Prompter {
    /// Asks for the id of the library to audit. The raw input is validated by the session.
    fn library_id(&mut self) -> Result<String>;

    /// Asks whether another library should be audited.
    fn check_another(&mut self) -> Result<bool>;

    /// Shows a message to the operator.
    fn notify(&mut self, message: &str);
}

/// [`Prompter`] backed by the terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn library_id(&mut self) -> Result<String> {
        let input = Input::<String>::with_theme(&self.theme)
            .with_prompt(LIBRARY_ID_PROMPT)
            .allow_empty(true)
            .interact_text()?;
        Ok(input)
    }

    fn check_another(&mut self) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(CHECK_ANOTHER_PROMPT)
            .default(false)
            .interact()?;
        Ok(answer)
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Parses operator input into a library id.
pub fn parse_library_id(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidLibraryId(String::new()));
    }
    trimmed
        .parse()
        .map_err(|_| Error::InvalidLibraryId(trimmed.to_string()))
}

/// Drives the interactive audit loop.
pub struct Session<'a, S: ?Sized, P> {
    config: &'a RenzokuConfig,
    source: &'a S,
    prompter: P,
    state: SessionState,
    summaries: Vec<AuditSummary>,
}

impl<'a, S, P> Session<'a, S, P>
where
    S: LibrarySource + ?Sized,
    P: Prompter,
{
    pub fn new(config: &'a RenzokuConfig, source: &'a S, prompter: P) -> Self {
        Self {
            config,
            source,
            prompter,
            state: SessionState::AwaitingLibraryId,
            summaries: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Summaries of the library runs that completed so far.
    pub fn summaries(&self) -> &[AuditSummary] {
        &self.summaries
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Performs a single transition and returns the new state.
    pub async fn step<K>(&mut self, sink: &mut K) -> Result<&SessionState>
    where
        K: ReportSink + ?Sized,
    {
        self.state = match self.state {
            SessionState::AwaitingLibraryId => {
                let input = self.prompter.library_id()?;
                match parse_library_id(&input) {
                    Ok(library_id) => match self.source.authenticate().await {
                        Ok(()) => SessionState::Authenticated { library_id },
                        Err(e) => {
                            warn!("Authentication failed: {}", e);
                            self.prompter.notify(&format!("Error: {}", e));
                            SessionState::Reporting { library_id }
                        }
                    },
                    Err(_) if input.trim().is_empty() => {
                        self.prompter.notify(LIBRARY_ID_REQUIRED);
                        SessionState::AwaitingLibraryId
                    }
                    Err(_) => {
                        self.prompter.notify(LIBRARY_ID_NOT_NUMERIC);
                        SessionState::AwaitingLibraryId
                    }
                }
            }
            SessionState::Authenticated { library_id } => {
                match self
                    .config
                    .audit_library(self.source, library_id, sink)
                    .await
                {
                    Ok(summary) => self.summaries.push(summary),
                    Err(e) => {
                        error!("Audit of library {} failed: {}", library_id, e);
                        self.prompter.notify(&format!("Error: {}", e));
                    }
                }
                SessionState::Reporting { library_id }
            }
            SessionState::Reporting { .. } => {
                if self.prompter.check_another()? {
                    SessionState::AwaitingLibraryId
                } else {
                    SessionState::Done
                }
            }
            SessionState::Done => SessionState::Done,
        };
        Ok(&self.state)
    }

    /// Steps until the operator is done and returns every completed run's summary.
    pub async fn run<K>(&mut self, sink: &mut K) -> Result<Vec<AuditSummary>>
    where
        K: ReportSink + ?Sized,
    {
        while self.step(sink).await? != &SessionState::Done {}
        Ok(std::mem::take(&mut self.summaries))
    }
}
