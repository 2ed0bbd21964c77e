use std::io::{self, Write};

use serde::Serialize;

use crate::app::{FetchResult, FetchStatus, ImageOutcome, ProgressEvent, ProgressSink};
use crate::catalog::Catalog;
use crate::selection::SelectionSet;
use crate::session::Session;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_catalog(catalog: &Catalog) -> io::Result<()> {
        Self::print_json(catalog)
    }

    pub fn print_fetch(result: &FetchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_selection(selection: &SelectionSet) -> io::Result<()> {
        Self::print_json(selection)
    }

    pub fn print_session(session: &Session) -> io::Result<()> {
        Self::print_json(session)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Plain-text listings on stdout, progress on stderr.
pub struct TextOutput;

impl TextOutput {
    pub fn print_catalog(catalog: &Catalog, selection: &SelectionSet) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if catalog.is_empty() {
            writeln!(stdout, "no breeds available")?;
            return Ok(());
        }
        for breed in catalog.breeds() {
            let mark = if selection.contains(breed) { "x" } else { " " };
            writeln!(stdout, "[{mark}] {breed}")?;
        }
        Ok(())
    }

    pub fn print_selection(selection: &SelectionSet) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if selection.is_empty() {
            writeln!(stdout, "nothing selected")?;
        }
        for breed in selection.as_slice() {
            writeln!(stdout, "{breed}")?;
        }
        Ok(())
    }

    pub fn print_fetch(result: &FetchResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if result.is_empty() {
            writeln!(stdout, "no breeds selected")?;
        }
        for entry in &result.entries {
            match &entry.outcome {
                ImageOutcome::Image { url } => writeln!(stdout, "{}: {url}", entry.breed)?,
                ImageOutcome::Failed { reason } => {
                    writeln!(stdout, "{}: failed ({reason})", entry.breed)?
                }
            }
        }
        match result.status {
            FetchStatus::Complete => {}
            FetchStatus::Partial => eprintln!(
                "warning: {} of {} images could not be fetched",
                result.failures().count(),
                result.entries.len()
            ),
            FetchStatus::Aborted => {
                eprintln!("warning: fetch stopped at the first failure, later breeds skipped")
            }
        }
        Ok(())
    }
}

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => eprintln!("{} ({} ms)", event.message, elapsed.as_millis()),
            None => eprintln!("{}", event.message),
        }
    }
}
