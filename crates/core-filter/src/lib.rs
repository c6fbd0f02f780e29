//! Candidate storage, fuzzy matching and ranking.
//!
//! * [`candidate`] parses input records into a [`CandidateSet`].
//! * [`matcher`] scores one candidate against the query (shortest ordered window, or
//!   bounded edit distance).
//! * [`ranking`] orders candidates by descending score, input order on ties.
//! * [`scheduler`] drives a filter pass and abandons it when fresher input is waiting.

pub mod candidate;
pub mod matcher;
pub mod ranking;
pub mod scheduler;

pub use candidate::{Candidate, CandidateSet};
pub use matcher::{MatchResult, MatchSpan, score};
pub use ranking::rank;
pub use scheduler::{ABORT_CHECK_INTERVAL, FilterScheduler, PassStats};

/// Case fold used for matching: the single-codepoint lowercase mapping, or the codepoint
/// itself when lowercasing expands (e.g. `İ`).
#[inline]
pub fn fold(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(c), None) => c,
        _ => ch,
    }
}
