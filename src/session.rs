use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::app::{App, FetchResult, ProgressSink};
use crate::catalog::Catalog;
use crate::dog_ceo::DogApiClient;
use crate::domain::BreedId;
use crate::error::DogError;
use crate::selection::SelectionSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Browsing,
    Viewing,
}

impl ViewState {
    fn label(self) -> &'static str {
        match self {
            ViewState::Browsing => "browsing",
            ViewState::Viewing => "viewing",
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State a front end reads and drives: catalog, selection, last fetch result
/// and which view is active.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    catalog: Catalog,
    selection: SelectionSet,
    last_result: Option<FetchResult>,
    view: ViewState,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Result of the most recent fetch. Stale once the session is back in
    /// `Browsing`; replaced wholesale by the next fetch.
    pub fn last_result(&self) -> Option<&FetchResult> {
        self.last_result.as_ref()
    }

    pub fn toggle(&mut self, id: &BreedId) -> bool {
        self.selection.toggle(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Fetches images for the current selection and switches to `Viewing`
    /// once the fetch has resolved. Only valid while `Browsing`.
    pub async fn request_show_images<C: DogApiClient>(
        &mut self,
        app: &App<C>,
        sink: &dyn ProgressSink,
    ) -> Result<&FetchResult, DogError> {
        if self.view != ViewState::Browsing {
            return Err(DogError::InvalidTransition {
                command: "show",
                state: self.view.label(),
            });
        }
        debug!(selected = self.selection.len(), "show images requested");
        let result = app.fetch_all(self.selection.as_slice(), sink).await;
        self.view = ViewState::Viewing;
        Ok(&*self.last_result.insert(result))
    }

    /// Returns to `Browsing`. Only valid while `Viewing`.
    pub fn request_back(&mut self) -> Result<(), DogError> {
        if self.view != ViewState::Viewing {
            return Err(DogError::InvalidTransition {
                command: "back",
                state: self.view.label(),
            });
        }
        self.view = ViewState::Browsing;
        Ok(())
    }
}

/// One line of input in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Toggle(String),
    Clear,
    Selected,
    Show,
    Back,
    Status,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = DogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match command.to_lowercase().as_str() {
            "list" | "ls" => Ok(SessionCommand::List),
            "toggle" | "t" => {
                if rest.is_empty() {
                    return Err(DogError::InvalidCommand(
                        "toggle requires a breed name".to_string(),
                    ));
                }
                Ok(SessionCommand::Toggle(rest.to_string()))
            }
            "clear" | "reset" => Ok(SessionCommand::Clear),
            "selected" => Ok(SessionCommand::Selected),
            "show" => Ok(SessionCommand::Show),
            "back" => Ok(SessionCommand::Back),
            "status" => Ok(SessionCommand::Status),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            "" => Err(DogError::InvalidCommand("empty command".to_string())),
            _ => Err(DogError::InvalidCommand(trimmed.to_string())),
        }
    }
}
