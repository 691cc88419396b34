//! Single source of truth for the canonical search term.

use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::{ResultType, SearchResult};
use crate::query::Location;

/// Canonical query state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// `None` until something has been searched; `Some("")` is an explicit empty search
    pub term: Option<String>,
    /// 1-based page index
    pub page: usize,
    pub debug_mode: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            term: None,
            page: 1,
            debug_mode: false,
        }
    }
}

/// Correlates a search response with the canonical term that triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub term: String,
    pub result_type: ResultType,
}

/// Results held for the current canonical term
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsState {
    /// No canonical term yet
    #[default]
    NotRequested,
    Loading,
    Loaded(Vec<SearchResult>),
    /// Fetch failed; the message is shown as a non-fatal notice
    Failed(String),
}

/// Keeps the draft, the canonical term and the fetched results consistent.
///
/// Only canonical-term transitions issue a [`FetchTicket`]. Each ticket
/// carries a generation; a response whose generation is not the latest is
/// rejected as stale so a slow earlier fetch can never overwrite newer state.
#[derive(Debug, Clone)]
pub struct QuerySynchronizer {
    state: QueryState,
    draft: String,
    result_type: ResultType,
    generation: u64,
    results: ResultsState,
}

impl QuerySynchronizer {
    pub fn new(result_type: ResultType) -> Self {
        Self {
            state: QueryState::default(),
            draft: String::new(),
            result_type,
            generation: 0,
            results: ResultsState::NotRequested,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    /// Navigable form of the canonical term
    pub fn location(&self) -> Location {
        Location {
            result_type: self.result_type,
            term: self.state.term.clone(),
        }
    }

    /// Update the in-progress input. Never fetches.
    pub fn set_draft(&mut self, term: impl Into<String>) {
        self.draft = term.into();
    }

    /// Promote the draft to canonical and start exactly one fetch for it
    pub fn submit(&mut self) -> FetchTicket {
        let term = self.draft.clone();
        info!(term = %term, "Search submitted");
        self.begin_fetch(term)
    }

    /// Adopt a term from external navigation (back/forward, shared link).
    ///
    /// Returns `None` when nothing changed or when the location carries no
    /// term; otherwise behaves like [`submit`](Self::submit) without reading
    /// the draft.
    pub fn restore_from_location(&mut self, location: &Location) -> Option<FetchTicket> {
        if location.term == self.state.term && location.result_type == self.result_type {
            debug!(location = %location, "Location unchanged, no refetch");
            return None;
        }

        self.result_type = location.result_type;
        match &location.term {
            Some(term) => {
                info!(term = %term, "Search restored from location");
                self.draft = term.clone();
                Some(self.begin_fetch(term.clone()))
            }
            None => {
                // invalidate anything still in flight
                self.generation += 1;
                self.draft.clear();
                self.state.term = None;
                self.state.page = 1;
                self.results = ResultsState::NotRequested;
                None
            }
        }
    }

    fn begin_fetch(&mut self, term: String) -> FetchTicket {
        self.generation += 1;
        self.state.term = Some(term.clone());
        self.state.page = 1;
        self.results = ResultsState::Loading;
        FetchTicket {
            generation: self.generation,
            term,
            result_type: self.result_type,
        }
    }

    /// Apply a search outcome, rejecting responses for superseded tickets
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: Result<Vec<SearchResult>>) -> Result<()> {
        if ticket.generation != self.generation {
            debug!(
                term = %ticket.term,
                generation = ticket.generation,
                current = self.generation,
                "Dropping stale search response"
            );
            return Err(AppError::StaleResponse {
                generation: ticket.generation,
                current: self.generation,
            });
        }

        self.results = match outcome {
            Ok(results) => {
                info!(term = %ticket.term, count = results.len(), "Search results received");
                ResultsState::Loaded(results)
            }
            Err(e) => {
                warn!(term = %ticket.term, error_code = e.error_code(), error = %e, "Search failed");
                ResultsState::Failed(e.to_string())
            }
        };
        Ok(())
    }

    /// Change page only; results are already held
    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.max(1);
    }

    /// Flip debug mode; purely presentational
    pub fn toggle_debug(&mut self) -> bool {
        self.state.debug_mode = !self.state.debug_mode;
        self.state.debug_mode
    }
}
