//! Menu loop and request handlers
//!
//! A [`Session`] owns the engine and the console for the lifetime of the
//! process. Each menu selection runs one request to completion; a failed
//! request is reported with `Operation failed: ...` and the menu comes back.
//! End of input anywhere ends the session the same way selecting exit does.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use crate::console::Console;
use crate::engine::{MemoryEngine, RecordEngine};
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::ops::{delete_rows, insert_rows, update_rows, BatchReport, MatchMode, OpsResult};
use crate::schema::configure_attributes;

use super::args::Cli;
use super::config::Config;
use super::errors::{CliError, CliResult};

const MENU: &str = "\nDatabase Operations Menu\n\
[1] Construct Table\n\
[2] Remove Table\n\
[3] Add Entry\n\
[4] Erase Entry\n\
[5] Modify Entry\n\
[6] Exit System\n\
Choices: ";

/// One menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ConstructTable,
    RemoveTable,
    AddEntry,
    EraseEntry,
    ModifyEntry,
    Exit,
}

impl MenuChoice {
    /// Map a menu number to its entry
    pub fn from_selection(selection: i64) -> Option<Self> {
        match selection {
            1 => Some(Self::ConstructTable),
            2 => Some(Self::RemoveTable),
            3 => Some(Self::AddEntry),
            4 => Some(Self::EraseEntry),
            5 => Some(Self::ModifyEntry),
            6 => Some(Self::Exit),
            _ => None,
        }
    }

    /// Name used for log events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConstructTable => "construct_table",
            Self::RemoveTable => "remove_table",
            Self::AddEntry => "add_entry",
            Self::EraseEntry => "erase_entry",
            Self::ModifyEntry => "modify_entry",
            Self::Exit => "exit",
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// An interactive session against one engine
pub struct Session<E, R, W> {
    engine: E,
    console: Console<R, W>,
    match_mode: MatchMode,
}

impl<E: RecordEngine, R: BufRead, W: Write> Session<E, R, W> {
    pub fn new(engine: E, console: Console<R, W>, match_mode: MatchMode) -> Self {
        Self {
            engine,
            console,
            match_mode,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Give back the engine and console
    pub fn into_parts(self) -> (E, Console<R, W>) {
        (self.engine, self.console)
    }

    /// Run the menu until exit or end of input, then shut the engine down
    pub fn run(&mut self) -> CliResult<()> {
        log_event_with_fields(Event::SessionBegin, &[("match_mode", self.match_mode.as_str())]);

        loop {
            self.console.prompt(MENU)?;
            let token = match self.console.next_token() {
                Ok(token) => token,
                Err(e) if e.is_end_of_input() => break,
                Err(e) => return Err(e.into()),
            };

            let choice = token.parse().ok().and_then(MenuChoice::from_selection);
            let flow = match choice {
                Some(MenuChoice::Exit) => Flow::Exit,
                Some(choice) => self.dispatch(choice)?,
                None => {
                    self.console.say("Selection not recognized.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }

        if let Err(e) = self.engine.shutdown() {
            let reason = e.to_string();
            log_event_with_fields(Event::EngineShutdownFailed, &[("reason", reason.as_str())]);
        }
        log_event(Event::SessionEnd);
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> CliResult<Flow> {
        let result = match choice {
            MenuChoice::ConstructTable => self.construct_table(),
            MenuChoice::RemoveTable => self.remove_table(),
            MenuChoice::AddEntry => self
                .run_batch(|engine, console, _| insert_rows(engine, console), "Insertion"),
            MenuChoice::EraseEntry => self.run_batch(delete_rows, "Deletion"),
            MenuChoice::ModifyEntry => self.run_batch(update_rows, "Modification"),
            MenuChoice::Exit => return Ok(Flow::Exit),
        };

        match result {
            Ok(()) => Ok(Flow::Continue),
            Err(e) if e.is_end_of_input() => Ok(Flow::Exit),
            Err(e) => {
                let reason = e.to_string();
                let discarded = self.console.discard_pending().to_string();
                log_event_with_fields(
                    Event::RequestAborted,
                    &[
                        ("request", choice.as_str()),
                        ("reason", reason.as_str()),
                        ("discarded_tokens", discarded.as_str()),
                    ],
                );
                self.console.say(&format!("Operation failed: {}", reason))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn construct_table(&mut self) -> OpsResult<()> {
        let name = self.console.ask_name("Table identifier: ")?;
        let schema = configure_attributes(&mut self.console)?.into_schema()?;
        let shape = schema.to_string();
        let keys = schema.key_attrs().len().to_string();
        self.engine.create_table(&name, schema)?;
        log_event_with_fields(
            Event::TableCreated,
            &[
                ("table", name.as_str()),
                ("schema", shape.as_str()),
                ("key_attrs", keys.as_str()),
            ],
        );
        self.console.say("Construction complete.")?;
        Ok(())
    }

    fn remove_table(&mut self) -> OpsResult<()> {
        let name = self.console.ask_name("Table to erase: ")?;
        self.engine.delete_table(&name)?;
        log_event_with_fields(Event::TableRemoved, &[("table", name.as_str())]);
        self.console.say("Erasure complete.")?;
        Ok(())
    }

    fn run_batch<F>(&mut self, batch: F, label: &str) -> OpsResult<()>
    where
        F: FnOnce(&mut E, &mut Console<R, W>, MatchMode) -> OpsResult<BatchReport>,
    {
        let report = batch(&mut self.engine, &mut self.console, self.match_mode)?;
        self.console.say(&format!("{} complete.", label))?;
        self.console.say(&report.to_string())?;
        Ok(())
    }
}

/// Main CLI entry point
///
/// Parses arguments, resolves configuration and runs one session against an
/// in-memory engine.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::resolve(&cli)?;
    Logger::set_min_severity(config.severity()?);

    let max_text = config.max_text_len.to_string();
    let max_name = config.max_name_len.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("match_mode", config.match_mode.as_str()),
            ("max_text_len", max_text.as_str()),
            ("max_name_len", max_name.as_str()),
        ],
    );

    let engine = MemoryEngine::new();
    match &cli.input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                CliError::io_error(format!("Failed to open input {}: {}", path.display(), e))
            })?;
            let console = Console::new(BufReader::new(file), io::stdout(), config.limits());
            Session::new(engine, console, config.match_mode).run()
        }
        None => {
            let console = Console::new(io::stdin().lock(), io::stdout(), config.limits());
            Session::new(engine, console, config.match_mode).run()
        }
    }
}
