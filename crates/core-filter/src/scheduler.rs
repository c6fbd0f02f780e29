//! Filter pass scheduling.
//!
//! A pass scores candidates in input order and polls the [`InputProbe`] every
//! [`ABORT_CHECK_INTERVAL`] candidates; when newer input is waiting the pass stops where
//! it is. Ranking runs exactly once per pass, complete or aborted, so the candidate set
//! always holds a fully ordered snapshot.
//!
//! Growth shortcut: when the last completed standard pass used a query that is an
//! ordered subsequence of the new one, a candidate that scored 0 then cannot match now
//! and is left untouched.

use std::sync::atomic::Ordering;

use core_events::{
    CANDIDATES_SCORED, CANDIDATES_SKIPPED, FILTER_ABORTS, FILTER_PASSES, InputProbe,
};
use core_text::{MatchMode, Query};

use crate::matcher::{fold_query, score_folded};
use crate::ranking::rank;
use crate::CandidateSet;

/// Candidates scored between two input probes.
pub const ABORT_CHECK_INTERVAL: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Candidates whose score was recomputed.
    pub scored: usize,
    /// Candidates left at zero by the growth shortcut.
    pub skipped: usize,
    pub aborted: bool,
}

#[derive(Debug, Default)]
pub struct FilterScheduler {
    sort: bool,
    /// Folded query of the last completed standard-mode pass.
    baseline: Option<Vec<char>>,
}

impl FilterScheduler {
    /// `sort = false` keeps input order among matches: every match scores exactly 1.
    pub fn new(sort: bool) -> Self {
        Self {
            sort,
            baseline: None,
        }
    }

    pub fn refilter(
        &mut self,
        set: &mut CandidateSet,
        query: &Query,
        probe: &dyn InputProbe,
    ) -> PassStats {
        let needle = fold_query(query.as_str());
        let mode = query.mode();
        let grown = mode == MatchMode::Standard
            && self
                .baseline
                .as_deref()
                .is_some_and(|prev| is_subsequence(prev, &needle));

        let mut stats = PassStats::default();
        for (i, cand) in set.items_mut().iter_mut().enumerate() {
            if i > 0 && i % ABORT_CHECK_INTERVAL == 0 && probe.input_pending() {
                stats.aborted = true;
                break;
            }
            if grown && cand.score <= 0.0 {
                stats.skipped += 1;
                continue;
            }
            cand.reset();
            let mut result = score_folded(cand.text(), &needle, mode);
            if !self.sort && result.is_match() {
                result.score = 1.0;
            }
            cand.score = result.score;
            cand.span = result.span;
            stats.scored += 1;
        }

        let order = rank(set.items());
        set.set_order(order);

        self.baseline = match (stats.aborted, mode) {
            (false, MatchMode::Standard) => Some(needle),
            _ => None,
        };

        FILTER_PASSES.fetch_add(1, Ordering::Relaxed);
        CANDIDATES_SCORED.fetch_add(stats.scored as u64, Ordering::Relaxed);
        CANDIDATES_SKIPPED.fetch_add(stats.skipped as u64, Ordering::Relaxed);
        if stats.aborted {
            FILTER_ABORTS.fetch_add(1, Ordering::Relaxed);
        }
        tracing::debug!(
            target: "filter.pass",
            query_len = query.len(),
            mode = mode.as_str(),
            candidates = set.len(),
            scored = stats.scored,
            skipped = stats.skipped,
            aborted = stats.aborted,
            "filter_pass"
        );
        stats
    }
}

fn is_subsequence(short: &[char], long: &[char]) -> bool {
    let mut it = long.iter();
    short.iter().all(|c| it.any(|l| l == c))
}
