//! Interactive completion over stored history.
//!
//! `query` builds candidate lists and the visibility filter applied to them
//! while the user types; `navigator` cycles the selection through a list.

pub mod navigator;
pub mod query;

pub use navigator::{Direction, Navigator, SelectFn, Selection};
pub use query::{CandidateSink, candidates, fill_candidates, filter, matches, split_terms};
