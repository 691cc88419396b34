//! Spelling-correction advisor.
//!
//! Every term change issues a suggestion fetch so the suggestion is warm by
//! the time the user submits. Whether the suggestion is *shown* is decided
//! by the submit/edit state machine below:
//!
//! ```text
//!            draft edit                submit (fetch pending)
//!   Idle ──────────────► Suppressed ─────────────────────────► Pending
//!                          ▲    ▲                                 │
//!                draft edit│    │ failure / no correction         │ resolved
//!                          │    └─────────────────────────────────┤
//!                          └──────────────── Ready ◄──────────────┘
//! ```
//!
//! Only the most recently issued fetch may resolve; older responses are
//! stale. Failures are absorbed and never retried: submitting a term whose
//! fetch already failed settles on "no suggestion". Clearing the canonical
//! term returns the advisor to `Idle`.

use std::fmt;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::SpellcheckSuggestion;

/// Display state of the advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorState {
    /// Nothing typed or submitted yet
    Idle,
    /// Submitted, waiting for the suggestion for the submitted term
    Pending,
    /// A correction for the submitted term is available
    Ready,
    /// Draft edited since the last submit, or nothing worth showing
    Suppressed,
}

impl fmt::Display for AdvisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisorState::Idle => write!(f, "idle"),
            AdvisorState::Pending => write!(f, "pending"),
            AdvisorState::Ready => write!(f, "ready"),
            AdvisorState::Suppressed => write!(f, "suppressed"),
        }
    }
}

/// Correlates a spellcheck response with the request that asked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellTicket {
    pub generation: u64,
    pub term: String,
}

#[derive(Debug, Clone)]
pub struct SpellcheckAdvisor {
    state: AdvisorState,
    generation: u64,
    in_flight: Option<SpellTicket>,
    submitted: Option<String>,
    latest: Option<SpellcheckSuggestion>,
    /// Term whose most recent fetch failed
    failed: Option<String>,
}

impl SpellcheckAdvisor {
    pub fn new() -> Self {
        Self {
            state: AdvisorState::Idle,
            generation: 0,
            in_flight: None,
            submitted: None,
            latest: None,
            failed: None,
        }
    }

    pub fn state(&self) -> AdvisorState {
        self.state
    }

    fn issue(&mut self, term: &str) -> SpellTicket {
        self.generation += 1;
        let ticket = SpellTicket {
            generation: self.generation,
            term: term.to_string(),
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// The draft changed without a submit: suppress display and warm the suggestion
    pub fn on_draft_changed(&mut self, draft: &str) -> SpellTicket {
        self.state = AdvisorState::Suppressed;
        self.issue(draft)
    }

    /// A term became canonical. Returns a ticket only when no usable fetch
    /// for that term is already resolved or in flight.
    pub fn on_submit(&mut self, term: &str) -> Option<SpellTicket> {
        self.submitted = Some(term.to_string());

        if let Some(latest) = self.latest.as_ref().filter(|s| s.original == term) {
            self.state = if latest.is_correction() {
                AdvisorState::Ready
            } else {
                AdvisorState::Suppressed
            };
            return None;
        }

        if self.in_flight.as_ref().is_some_and(|t| t.term == term) {
            self.state = AdvisorState::Pending;
            return None;
        }

        if self.failed.as_deref() == Some(term) {
            debug!(term, "Spellcheck already failed for term, not refetching");
            self.state = AdvisorState::Suppressed;
            return None;
        }

        self.state = AdvisorState::Pending;
        Some(self.issue(term))
    }

    /// The canonical term was cleared (navigation to a location without a term)
    pub fn on_cleared(&mut self) {
        self.submitted = None;
        self.state = AdvisorState::Idle;
    }

    /// Apply a fetch outcome. Stale tickets are rejected; failures are absorbed.
    pub fn on_resolved(&mut self, ticket: &SpellTicket, outcome: Result<String>) -> Result<()> {
        if ticket.generation != self.generation {
            return Err(AppError::StaleResponse {
                generation: ticket.generation,
                current: self.generation,
            });
        }
        self.in_flight = None;

        let suggestion = match outcome {
            Ok(suggested) => SpellcheckSuggestion {
                original: ticket.term.clone(),
                suggested: suggested.trim().to_string(),
            },
            Err(e) => {
                debug!(term = %ticket.term, error = %e, "Spellcheck failed, treating as no suggestion");
                self.latest = None;
                self.failed = Some(ticket.term.clone());
                if self.state == AdvisorState::Pending {
                    self.state = AdvisorState::Suppressed;
                }
                return Ok(());
            }
        };

        let for_submitted = self.submitted.as_deref() == Some(ticket.term.as_str());
        if self.state == AdvisorState::Pending && for_submitted {
            self.state = if suggestion.is_correction() {
                AdvisorState::Ready
            } else {
                AdvisorState::Suppressed
            };
        }
        self.failed = None;
        self.latest = Some(suggestion);
        Ok(())
    }

    /// Suggestion to display, if any
    pub fn visible_suggestion(&self) -> Option<&SpellcheckSuggestion> {
        if self.state != AdvisorState::Ready {
            return None;
        }
        let submitted = self.submitted.as_deref()?;
        self.latest
            .as_ref()
            .filter(|s| s.original == submitted && s.is_correction())
    }
}

impl Default for SpellcheckAdvisor {
    fn default() -> Self {
        Self::new()
    }
}
