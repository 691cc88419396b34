//! Navigable location: the addressable form of the canonical term.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::error::{AppError, Result};
use crate::models::ResultType;

/// Name of the query parameter carrying the canonical term
pub const TERM_PARAM: &str = "q";

const LOCAL_ORIGIN: &str = "search-console://local/";

/// `/search/<type>` optionally followed by `?q=<term>`.
///
/// `term: None` (no `q` parameter) and `term: Some("")` (`?q=`) are
/// distinct: the first is "nothing searched yet", the second an explicit
/// empty search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub result_type: ResultType,
    pub term: Option<String>,
}

impl Location {
    pub fn unset(result_type: ResultType) -> Self {
        Self {
            result_type,
            term: None,
        }
    }

    pub fn with_term(result_type: ResultType, term: impl Into<String>) -> Self {
        Self {
            result_type,
            term: Some(term.into()),
        }
    }

    /// Parse a path such as `/search/pdf?q=rust` or a full URL.
    ///
    /// A missing or unknown type segment falls back to `default_type`;
    /// parameters other than `q` are ignored.
    pub fn parse(input: &str, default_type: ResultType) -> Result<Self> {
        let origin = local_origin()?;
        let url = origin
            .join(input.trim())
            .map_err(|e| AppError::Validation(format!("Invalid location {:?}: {}", input, e)))?;

        let result_type = url
            .path_segments()
            .and_then(|mut segments| {
                segments.find(|s| *s == "search")?;
                segments.next()
            })
            .and_then(|segment| ResultType::from_str(segment).ok())
            .unwrap_or(default_type);

        let term = url
            .query_pairs()
            .find(|(key, _)| key == TERM_PARAM)
            .map(|(_, value)| value.into_owned());

        Ok(Self { result_type, term })
    }
}

fn local_origin() -> Result<Url> {
    Url::parse(LOCAL_ORIGIN).map_err(|e| AppError::Configuration(e.to_string()))
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/search/{}", self.result_type)?;
        if let Some(term) = &self.term {
            let query: String = Url::parse_with_params(LOCAL_ORIGIN, &[(TERM_PARAM, term)])
                .ok()
                .and_then(|url| url.query().map(str::to_string))
                .unwrap_or_else(|| format!("{}=", TERM_PARAM));
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

/// Back/forward stack of visited locations
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.cursor]
    }

    /// Record a new location, discarding any forward entries.
    /// Pushing the current location again is a no-op.
    pub fn push(&mut self, location: Location) {
        if *self.current() == location {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        self.cursor += 1;
    }

    pub fn back(&mut self) -> Option<&Location> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }
}
