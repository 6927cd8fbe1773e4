//! Line-oriented interactive session.
//!
//! The [`Shell`] reads commands from any [`BufRead`], turns them into
//! controller actions, and prints the resulting page to any [`Write`].
//! Forms are filled by prompting for one field at a time.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::cli::render::{field_prompt, render_page, render_stats};
use crate::cli::OutputFormat;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::record::RecordDraft;
use crate::state::{Action, Mode};
use crate::validation::Field;
use crate::view::PageNav;

const PROMPT: &str = "> ";

const HELP: &str = "\
Commands:
  list              Show the current page
  add               Add a record
  edit              Edit the selected record
  delete            Delete the selected record
  select <row>      Select or unselect a row on this page
  search <text>     Filter the page by keyword or description
  clear             Clear the search
  first, prev, next, last
                    Move between pages
  page <n>          Jump to page n
  stats             Show store statistics
  help              Show this help
  quit              Leave the session
";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Print the current page.
    List,
    /// Fill in and submit the add form.
    Add,
    /// Fill in and submit the edit form.
    Edit,
    /// Delete the selected record after confirmation.
    Delete,
    /// Toggle selection of a 1-based row on the page.
    Select(usize),
    /// Set the search text.
    Search(String),
    /// Clear the search text.
    Clear,
    /// Move between pages.
    Navigate(PageNav),
    /// Print store statistics.
    Stats,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

/// Why a command line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line was blank.
    #[error("empty command")]
    Empty,
    /// The command word is not known.
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),
    /// The command needs an argument that was not given.
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    /// The argument is not a positive number.
    #[error("'{0}' is not a positive number")]
    InvalidNumber(String),
}

fn positive(arg: &str) -> std::result::Result<usize, ParseError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidNumber(arg.to_string())),
    }
}

impl FromStr for Instruction {
    type Err = ParseError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let instruction = match word.to_lowercase().as_str() {
            "" => return Err(ParseError::Empty),
            "list" | "ls" => Self::List,
            "add" => Self::Add,
            "edit" => Self::Edit,
            "delete" | "del" => Self::Delete,
            "select" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("select"));
                }
                Self::Select(positive(rest)?)
            }
            // Searching for nothing is the same as clearing.
            "search" | "find" => Self::Search(rest.to_string()),
            "clear" => Self::Clear,
            "first" => Self::Navigate(PageNav::First),
            "prev" => Self::Navigate(PageNav::Prev),
            "next" => Self::Navigate(PageNav::Next),
            "last" => Self::Navigate(PageNav::Last),
            "page" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("page"));
                }
                Self::Navigate(PageNav::To(positive(rest)?))
            }
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(instruction)
    }
}

/// How the shell prints pages.
#[derive(Debug, Clone)]
pub struct ShellSettings {
    /// Table layout.
    pub format: OutputFormat,
    /// `strftime` format for timestamps.
    pub timestamp_format: String,
}

/// An interactive session over a controller.
#[derive(Debug)]
pub struct Shell<R, W> {
    controller: Controller,
    input: R,
    output: W,
    settings: ShellSettings,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a session reading from `input` and printing to `output`.
    #[must_use]
    pub fn new(controller: Controller, input: R, output: W, settings: ShellSettings) -> Self {
        Self {
            controller,
            input,
            output,
            settings,
        }
    }

    /// Give back the controller and the output sink.
    #[must_use]
    pub fn into_parts(self) -> (Controller, W) {
        (self.controller, self.output)
    }

    /// Run until `quit` or end of input.
    ///
    /// Rejected commands are reported and the session continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        info!("Session started");
        self.print_page()?;

        while let Some(line) = self.read_line(PROMPT)? {
            let instruction = match line.parse::<Instruction>() {
                Ok(instruction) => instruction,
                Err(ParseError::Empty) => continue,
                Err(err) => {
                    writeln!(self.output, "error: {err}")?;
                    continue;
                }
            };
            if instruction == Instruction::Quit {
                break;
            }

            match self.execute(instruction) {
                Ok(()) => {}
                Err(err @ Error::Io(_)) => return Err(err),
                Err(err) => writeln!(self.output, "error: {err}")?,
            }
        }

        info!(records = self.controller.store().len(), "Session ended");
        Ok(())
    }

    fn execute(&mut self, instruction: Instruction) -> Result<()> {
        debug!(?instruction, "Executing");
        match instruction {
            Instruction::List => self.print_page(),
            Instruction::Add => {
                self.controller.dispatch(Action::OpenAdd)?;
                self.fill_form()
            }
            Instruction::Edit => {
                self.controller.dispatch(Action::OpenEdit)?;
                self.fill_form()
            }
            Instruction::Delete => self.delete(),
            Instruction::Select(row) => {
                // Rows are numbered from 1 on screen.
                self.act(Action::ToggleRow(row - 1)).map_err(|err| match err {
                    Error::RowOutOfRange { visible, .. } => Error::RowOutOfRange { row, visible },
                    other => other,
                })
            }
            Instruction::Search(text) => self.act(Action::SetSearch(text)),
            Instruction::Clear => self.act(Action::SetSearch(String::new())),
            Instruction::Navigate(nav) => self.act(Action::Navigate(nav)),
            Instruction::Stats => {
                let stats = render_stats(
                    &self.controller.store().stats(),
                    &self.settings.timestamp_format,
                );
                write!(self.output, "{stats}")?;
                Ok(())
            }
            Instruction::Help => {
                write!(self.output, "{HELP}")?;
                Ok(())
            }
            Instruction::Quit => Ok(()),
        }
    }

    fn act(&mut self, action: Action) -> Result<()> {
        self.controller.dispatch(action)?;
        self.print_page()
    }

    /// Prompt for each field of the open form and submit it.
    ///
    /// Only fields that failed validation are asked again.
    fn fill_form(&mut self) -> Result<()> {
        let editing = matches!(self.controller.state().mode(), Mode::EditModalOpen { .. });
        let mut fields = Field::ALL.to_vec();

        loop {
            for field in fields {
                let current = self
                    .controller
                    .state()
                    .mode()
                    .form()
                    .map(|form| form.value(field).to_string());
                let shown = if editing { current.as_deref() } else { None };
                let Some(answer) = self.read_line(&field_prompt(field, shown))? else {
                    self.controller.dispatch(Action::CloseModal)?;
                    writeln!(self.output, "Cancelled.")?;
                    return Ok(());
                };
                if editing && answer.is_empty() {
                    continue;
                }
                self.controller.dispatch(Action::SetField {
                    field,
                    value: answer,
                })?;
            }

            match self.controller.dispatch(Action::Submit) {
                Ok(_) => return self.print_page(),
                Err(Error::Validation(errors)) => {
                    for (field, error) in errors.iter() {
                        writeln!(self.output, "  {}: {}", field.label(), error.message(field))?;
                    }
                    fields = errors.iter().map(|(field, _)| field).collect();
                }
                Err(Error::FormUnchanged) => {
                    self.controller.dispatch(Action::CloseModal)?;
                    writeln!(self.output, "Nothing changed.")?;
                    return Ok(());
                }
                Err(err) => {
                    if self.controller.state().mode().form().is_some() {
                        self.controller.dispatch(Action::CloseModal)?;
                    }
                    return Err(err);
                }
            }
        }
    }

    fn delete(&mut self) -> Result<()> {
        self.controller.dispatch(Action::RequestDelete)?;
        let answer = self.read_line("Delete the selected record? [y/N]: ")?;
        let confirmed = answer.is_some_and(|a| matches!(a.to_lowercase().as_str(), "y" | "yes"));
        if confirmed {
            self.act(Action::ConfirmDelete)
        } else {
            self.controller.dispatch(Action::CancelDelete)?;
            writeln!(self.output, "Kept.")?;
            Ok(())
        }
    }

    fn print_page(&mut self) -> Result<()> {
        for notice in self.controller.active_notices() {
            writeln!(self.output, "* {notice}")?;
        }
        let page = render_page(
            &self.controller,
            self.settings.format,
            &self.settings.timestamp_format,
        )?;
        writeln!(self.output, "{}", page.trim_end())?;
        Ok(())
    }

    /// Print `prompt` and read one line, without its line ending.
    ///
    /// Returns `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Parse seed drafts from a JSON array of `{"keyword", "description"}`.
///
/// # Errors
///
/// Returns [`Error::Json`] if the text is not such an array.
pub fn parse_seed(text: &str) -> Result<Vec<RecordDraft>> {
    Ok(serde_json::from_str(text)?)
}

/// Read seed drafts from a JSON file.
///
/// Drafts are returned in file order; loading them in that order leaves the
/// last one at the top of the table.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or [`Error::Json`] if it
/// is malformed.
pub fn load_seed(path: &Path) -> Result<Vec<RecordDraft>> {
    let text = fs::read_to_string(path)?;
    let drafts = parse_seed(&text)?;
    debug!(path = %path.display(), count = drafts.len(), "Read seed file");
    Ok(drafts)
}
