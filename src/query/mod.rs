//! Query state synchronization with navigable location state

mod location;
mod synchronizer;

pub use location::{History, Location, TERM_PARAM};
pub use synchronizer::{FetchTicket, QueryState, QuerySynchronizer, ResultsState};
