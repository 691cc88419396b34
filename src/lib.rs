//! Search-result browsing client with relevance explanation.
//!
//! The crate keeps one canonical search term in step with a navigable
//! location, fetches ranked results from a backend, paginates them, offers
//! spelling corrections and, in debug mode, explains each result's score
//! against an ordered registry of weighted features.
//!
//! ```no_run
//! use std::sync::Arc;
//! use search_console::{backend::HttpBackend, config::Config, session::SearchSession};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let backend = Arc::new(HttpBackend::new(&config.backend, config.access_token())?);
//!
//!     let mut session = SearchSession::new(&config.search);
//!     let mut requests = session.set_draft("rust");
//!     requests.extend(session.submit());
//!     session.settle(backend.as_ref(), requests).await;
//!
//!     print!("{}", session.view());
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod engine_config;
pub mod error;
pub mod explain;
pub mod features;
pub mod models;
pub mod pagination;
pub mod query;
pub mod session;
pub mod spellcheck;
pub mod telemetry;
pub mod trending;

pub use error::{AppError, Result};
