//! A single search session: the query synchronizer, the spellcheck advisor,
//! the feature snapshot and the navigation history, owned together and
//! driven by user events and tagged backend responses.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::SearchBackend;
use crate::config::SearchConfig;
use crate::error::{AppError, Result};
use crate::explain::{explain, Explanation};
use crate::features::FeatureRegistry;
use crate::models::{SearchResult, SpellcheckSuggestion};
use crate::pagination::Page;
use crate::query::{FetchTicket, History, Location, QueryState, QuerySynchronizer, ResultsState};
use crate::spellcheck::{AdvisorState, SpellTicket, SpellcheckAdvisor};

/// Backend work requested by a session transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Search(FetchTicket),
    Spellcheck(SpellTicket),
}

/// Outcome of a [`FetchRequest`], still tagged with its ticket
#[derive(Debug)]
pub enum FetchResponse {
    Search(FetchTicket, Result<Vec<SearchResult>>),
    Spellcheck(SpellTicket, Result<String>),
}

impl FetchRequest {
    /// Perform the request. Failures are carried in the response, never raised.
    pub async fn run(self, backend: &dyn SearchBackend) -> FetchResponse {
        match self {
            FetchRequest::Search(ticket) => {
                let outcome = backend.search(&ticket.term, ticket.result_type).await;
                FetchResponse::Search(ticket, outcome)
            }
            FetchRequest::Spellcheck(ticket) => {
                let outcome = backend.spell_check(&ticket.term).await;
                FetchResponse::Spellcheck(ticket, outcome)
            }
        }
    }
}

pub struct SearchSession {
    sync: QuerySynchronizer,
    advisor: SpellcheckAdvisor,
    registry: FeatureRegistry,
    history: History,
    page_size: usize,
    debug_allowed: bool,
}

impl SearchSession {
    pub fn new(config: &SearchConfig) -> Self {
        let result_type = config.default_result_type;
        Self {
            sync: QuerySynchronizer::new(result_type),
            advisor: SpellcheckAdvisor::new(),
            registry: FeatureRegistry::new(),
            history: History::new(Location::unset(result_type)),
            page_size: config.page_size,
            debug_allowed: config.debug_allowed,
        }
    }

    /// Open a session at a location (e.g. a bookmarked link)
    pub fn open(config: &SearchConfig, location: Location) -> (Self, Vec<FetchRequest>) {
        let mut session = Self::new(config);
        let requests = session.restore(location);
        (session, requests)
    }

    pub fn query(&self) -> &QueryState {
        self.sync.state()
    }

    pub fn draft(&self) -> &str {
        self.sync.draft()
    }

    pub fn location(&self) -> Location {
        self.sync.location()
    }

    pub fn results(&self) -> &ResultsState {
        self.sync.results()
    }

    pub fn spellcheck_state(&self) -> AdvisorState {
        self.advisor.state()
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Install a feature registry snapshot for the debug explainer
    pub fn replace_registry(&mut self, registry: FeatureRegistry) {
        self.registry = registry;
    }

    /// Typing: update the draft and warm the spelling suggestion
    pub fn set_draft(&mut self, term: impl Into<String>) -> Vec<FetchRequest> {
        let term = term.into();
        let warm = self.advisor.on_draft_changed(&term);
        self.sync.set_draft(term);
        vec![FetchRequest::Spellcheck(warm)]
    }

    /// Enter: make the draft canonical, record the location and fetch
    pub fn submit(&mut self) -> Vec<FetchRequest> {
        let ticket = self.sync.submit();
        self.history.push(self.sync.location());

        let spell = self.advisor.on_submit(&ticket.term);
        let mut requests = vec![FetchRequest::Search(ticket)];
        requests.extend(spell.map(FetchRequest::Spellcheck));
        requests
    }

    /// Follow the displayed "did you mean" link
    pub fn accept_suggestion(&mut self) -> Vec<FetchRequest> {
        let Some(suggested) = self.advisor.visible_suggestion().map(|s| s.suggested.clone()) else {
            return Vec::new();
        };
        let mut requests = self.set_draft(suggested);
        requests.extend(self.submit());
        requests
    }

    /// External navigation to `location`
    pub fn navigate(&mut self, location: Location) -> Vec<FetchRequest> {
        let requests = self.restore(location.clone());
        self.history.push(location);
        requests
    }

    pub fn back(&mut self) -> Vec<FetchRequest> {
        match self.history.back().cloned() {
            Some(location) => self.restore(location),
            None => Vec::new(),
        }
    }

    pub fn forward(&mut self) -> Vec<FetchRequest> {
        match self.history.forward().cloned() {
            Some(location) => self.restore(location),
            None => Vec::new(),
        }
    }

    fn restore(&mut self, location: Location) -> Vec<FetchRequest> {
        let Some(ticket) = self.sync.restore_from_location(&location) else {
            if self.sync.state().term.is_none() {
                self.advisor.on_cleared();
            }
            return Vec::new();
        };

        let spell = self.advisor.on_submit(&ticket.term);
        let mut requests = vec![FetchRequest::Search(ticket)];
        requests.extend(spell.map(FetchRequest::Spellcheck));
        requests
    }

    pub fn set_page(&mut self, page: usize) {
        self.sync.set_page(page);
    }

    /// Toggle debug mode; ignored unless debug is allowed for this session
    pub fn toggle_debug(&mut self) -> bool {
        if !self.debug_allowed {
            return false;
        }
        self.sync.toggle_debug()
    }

    /// Apply a tagged backend response. Stale responses are returned as
    /// errors for the caller to drop; everything else is absorbed into state.
    pub fn apply(&mut self, response: FetchResponse) -> Result<()> {
        let applied = match response {
            FetchResponse::Search(ticket, outcome) => self.sync.complete(&ticket, outcome),
            FetchResponse::Spellcheck(ticket, outcome) => self.advisor.on_resolved(&ticket, outcome),
        };
        if let Err(e) = &applied {
            debug!(error_code = e.error_code(), error = %e, "Response not applied");
        }
        applied
    }

    /// Run requests one after another against `backend`, applying each response.
    /// Stale responses are dropped; any other rejection is logged.
    pub async fn settle(&mut self, backend: &dyn SearchBackend, requests: Vec<FetchRequest>) {
        for request in requests {
            let response = request.run(backend).await;
            match self.apply(response) {
                Ok(()) | Err(AppError::StaleResponse { .. }) => {}
                Err(e) => warn!(error_code = e.error_code(), error = %e, "Response dropped"),
            }
        }
    }

    /// What the results area shows right now
    pub fn view(&self) -> SessionView<'_> {
        let state = self.sync.state();
        let debug = state.debug_mode && self.debug_allowed;
        let results = match (&state.term, self.sync.results()) {
            (None, _) | (_, ResultsState::NotRequested) => ResultsView::Prompt,
            (Some(_), ResultsState::Loading) => ResultsView::Loading,
            (Some(term), ResultsState::Failed(message)) => ResultsView::Failed {
                term,
                message,
            },
            (Some(term), ResultsState::Loaded(results)) if results.is_empty() => {
                ResultsView::NoResults { term }
            }
            (Some(_), ResultsState::Loaded(results)) => {
                let page = Page::new(results.as_slice(), state.page, self.page_size);
                let items = page
                    .items
                    .iter()
                    .map(|result| ResultItem {
                        result,
                        explanation: debug.then(|| explain(result, &self.registry)),
                    })
                    .collect();
                ResultsView::Results {
                    items,
                    page: page.page,
                    page_count: page.page_count,
                    total: page.total,
                    show_pagination: page.shows_controls(),
                }
            }
        };

        SessionView {
            location: self.sync.location(),
            suggestion: self.advisor.visible_suggestion(),
            debug_mode: debug,
            formula: debug.then(|| self.registry.render_formula()),
            results,
        }
    }
}

/// One displayed result with its optional debug explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem<'a> {
    pub result: &'a SearchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

/// Results area
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView<'a> {
    /// Nothing searched yet
    Prompt,
    Loading,
    /// A term was searched and nothing matched
    NoResults { term: &'a str },
    /// Search failed; shown as a notice, the session stays usable
    Failed { term: &'a str, message: &'a str },
    Results {
        items: Vec<ResultItem<'a>>,
        page: usize,
        page_count: usize,
        total: usize,
        show_pagination: bool,
    },
}

/// Everything needed to draw the search screen
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView<'a> {
    pub location: Location,
    pub suggestion: Option<&'a SpellcheckSuggestion>,
    pub debug_mode: bool,
    pub formula: Option<String>,
    pub results: ResultsView<'a>,
}

pub const PROMPT_MESSAGE: &str = "Enter something you want to search in the box above";

impl fmt::Display for SessionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.location)?;
        if let Some(suggestion) = self.suggestion {
            writeln!(f, "Do you mean {}?", suggestion.suggested)?;
        }
        if let Some(formula) = &self.formula {
            writeln!(f, "{}", formula)?;
        }

        match &self.results {
            ResultsView::Prompt => writeln!(f, "{}", PROMPT_MESSAGE),
            ResultsView::Loading => writeln!(f, "Loading..."),
            ResultsView::NoResults { term } => {
                writeln!(f, "We cannot find anything matching {}", term)
            }
            ResultsView::Failed { term, message } => {
                writeln!(f, "Search for {:?} failed: {}", term, message)
            }
            ResultsView::Results {
                items,
                page,
                page_count,
                total,
                show_pagination,
            } => {
                if items.is_empty() {
                    writeln!(f, "Page {} is past the end of {} results", page, total)?;
                }
                for item in items {
                    writeln!(f, "{}", item.result.display_title())?;
                    writeln!(f, "  {}", item.result.url)?;
                    writeln!(f, "  {}", item.result.snippet())?;
                    if let Some(explanation) = &item.explanation {
                        writeln!(f, "  Debug: {}", explanation.to_string().replace('\n', "\n  "))?;
                    }
                }
                if *show_pagination {
                    writeln!(f, "Page {} of {} ({} results)", page, page_count, total)?;
                }
                Ok(())
            }
        }
    }
}
