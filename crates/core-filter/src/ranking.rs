//! Ranking: descending score, input order on ties.

use std::cmp::Ordering;

use crate::Candidate;

/// Indices of `candidates` ordered by descending score. Equal scores keep input order,
/// so the result is deterministic for identical input and query.
pub fn rank(candidates: &[Candidate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| compare(&candidates[a], a, &candidates[b], b));
    order
}

fn compare(a: &Candidate, ai: usize, b: &Candidate, bi: usize) -> Ordering {
    b.score.total_cmp(&a.score).then(ai.cmp(&bi))
}
