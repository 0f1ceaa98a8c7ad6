//! Interactive front end.
//!
//! Drives a [`ScanSession`] through its stages and owns every prompt. Each
//! prompt is a loop around a validating parser: bad answers print a short
//! message and ask again, so nothing downstream ever sees invalid input.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::cli::Cli;
use crate::config::{Config, ConfigError};
use crate::duplicates::SortOrder;
use crate::error::ExitCode;
use crate::logging::init_logging;
use crate::progress::Progress;
use crate::report::Report;
use crate::session::{ScanSession, SessionConfig, SessionError};
use crate::signal::{install_handler, ShutdownHandler};

const EXTENSION_PROMPT: &str = "Enter file format:";
const SORT_PROMPT: &str = "Size sorting options:\n1. Descending\n2. Ascending\nEnter a sorting option:";
const CHECK_PROMPT: &str = "Check for duplicates?";
const DELETE_PROMPT: &str = "Delete files?";
const SELECTION_PROMPT: &str = "Enter file numbers to delete:";

/// Errors specific to the interactive front end.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input ended while an answer was still needed.
    #[error("input closed while waiting for an answer to {0:?}")]
    InputClosed(String),
}

/// Run with the process's stdin and stdout.
///
/// Initializes logging and the Ctrl+C handler, then hands over to
/// [`Frontend::run`].
///
/// # Errors
///
/// Any error that ends the run; map it with [`ExitCode::from_error`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);
    let shutdown = install_handler()?;

    let color = !cli.no_color && io::stdout().is_terminal();
    let report = Report::new(color, !cli.quiet);

    let stdin = io::stdin();
    let stdout = io::stdout();
    Frontend::new(stdin.lock(), stdout.lock(), shutdown)
        .with_report(report)
        .run(cli)
}

/// Prompt-driven console over any reader and writer.
pub struct Frontend<R, W> {
    input: R,
    output: W,
    // Summaries stay off `output` so it carries only prompts and listings.
    diagnostics: Box<dyn Write>,
    report: Report,
    shutdown: ShutdownHandler,
}

impl<R: BufRead, W: Write> Frontend<R, W> {
    /// Create a front end with plain (uncoloured) output.
    pub fn new(input: R, output: W, shutdown: ShutdownHandler) -> Self {
        Self {
            input,
            output,
            diagnostics: Box::new(io::stderr()),
            report: Report::default(),
            shutdown,
        }
    }

    /// Replace the renderer.
    #[must_use]
    pub fn with_report(mut self, report: Report) -> Self {
        self.report = report;
        self
    }

    /// Send summary lines somewhere other than stderr.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: impl Write + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Give back the writer, e.g. to inspect captured output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run one complete scan-review-delete cycle.
    ///
    /// # Errors
    ///
    /// Configuration, walk, deletion and I/O failures, and
    /// [`SessionError::Interrupted`] after Ctrl+C.
    pub fn run(&mut self, cli: Cli) -> Result<ExitCode> {
        let root = match cli.directory.clone().ok_or(ConfigError::MissingDirectory) {
            Ok(root) => root,
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(ExitCode::MissingDirectory);
            }
        };

        let mut config = Config::load(cli.config.as_deref())?;
        config.merge_cli(&cli);
        config.validate()?;
        log::debug!("Effective configuration: {:?}", config);

        if config.extension.is_none() {
            config.extension = Some(self.prompt(EXTENSION_PROMPT)?);
        }
        let order = match config.sort_order {
            Some(order) => order,
            None => self.ask_sort_order()?,
        };

        let progress = Arc::new(Progress::new(cli.quiet));
        let session_config = SessionConfig::new(&root)
            .with_walker(config.walker_config())
            .with_sort_order(order)
            .with_hash(config.hash_config().with_progress_callback(progress))
            .with_delete(config.delete_config());
        let mut session = ScanSession::new(session_config).with_shutdown_flag(self.shutdown.flag());

        let size_groups = session
            .scan()
            .with_context(|| format!("Failed to scan {}", root.display()))?;
        self.report.size_listing(&mut self.output, size_groups, order)?;

        if !self.ask_yes_no(CHECK_PROMPT)? {
            return Ok(ExitCode::Success);
        }

        let catalog = session.group()?;
        if catalog.is_empty() {
            self.report.no_duplicates(&mut self.output)?;
            return Ok(ExitCode::Success);
        }
        self.report.catalog_listing(&mut self.output, catalog)?;
        if let Some(stats) = session.hash_stats() {
            self.report.hash_summary(&mut self.diagnostics, stats)?;
        }
        let skipped_files = session.hash_stats().is_some_and(|s| s.failed_files > 0);

        if !self.ask_yes_no(DELETE_PROMPT)? {
            return Ok(exit_code(skipped_files));
        }

        let selection = loop {
            let answer = self.prompt(SELECTION_PROMPT)?;
            match session.parse_selection(&answer) {
                Ok(selection) => break selection,
                Err(SessionError::Selection(e)) => {
                    log::debug!("Rejected selection {:?}: {}", answer, e);
                    writeln!(self.output, "\nWrong format\n")?;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let deletion = session.delete(&selection)?;
        self.report.deletion(&mut self.output, &deletion)?;
        Ok(exit_code(skipped_files || !deletion.all_succeeded()))
    }

    /// Print `message` on its own line and read one answer line.
    fn prompt(&mut self, message: &str) -> Result<String> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if self.shutdown.is_shutdown_requested() {
            return Err(SessionError::Interrupted.into());
        }
        if read == 0 {
            let question = message.lines().last().unwrap_or(message);
            return Err(AppError::InputClosed(question.to_string()).into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_sort_order(&mut self) -> Result<SortOrder> {
        loop {
            let answer = self.prompt(SORT_PROMPT)?;
            match SortOrder::from_menu_choice(&answer) {
                Some(order) => return Ok(order),
                None => writeln!(self.output, "\nWrong option\n")?,
            }
        }
    }

    fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        loop {
            match self.prompt(question)?.as_str() {
                "yes" => return Ok(true),
                "no" => return Ok(false),
                _ => writeln!(self.output, "Wrong option!\n")?,
            }
        }
    }
}

fn exit_code(partial: bool) -> ExitCode {
    if partial {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}
