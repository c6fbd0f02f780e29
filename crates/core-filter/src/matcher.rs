//! Match engine.
//!
//! Standard mode finds the shortest window of the candidate that contains the query's
//! codepoints in order (case-folded), preferring the left-most window among equal
//! lengths, and scores it `query_len / window_len / candidate_len`.
//!
//! Edit-distance mode finds the substring with the smallest Levenshtein distance to the
//! query, capped at [`MAX_DISTANCE`], and scores it `(M + 1 - d) / M`.
//!
//! Escape sequences (CSI / OSC) embedded in the candidate are skipped: they never match
//! and do not count toward the candidate length. Lengths are in matchable codepoints.

use core_text::MatchMode;
use core_text::ansi::visible_chars;

use crate::fold;

/// Largest edit distance that still counts as a match.
pub const MAX_DISTANCE: usize = 2;
/// Query and candidate must both be shorter than this (in codepoints) for edit-distance
/// scoring.
pub const EDIT_DISTANCE_CEILING: usize = 512;

/// Byte range `[start, end)` within the candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub score: f64,
    pub span: Option<MatchSpan>,
}

impl MatchResult {
    pub const NONE: MatchResult = MatchResult {
        score: 0.0,
        span: None,
    };
    pub const EVERYTHING: MatchResult = MatchResult {
        score: 1.0,
        span: None,
    };

    pub fn is_match(&self) -> bool {
        self.score > 0.0
    }
}

/// A matchable codepoint of the candidate: folded value plus its source byte range.
#[derive(Debug, Clone, Copy)]
struct Unit {
    ch: char,
    start: usize,
    end: usize,
}

fn units(text: &str) -> Vec<Unit> {
    visible_chars(text)
        .map(|(start, ch)| Unit {
            ch: fold(ch),
            start,
            end: start + ch.len_utf8(),
        })
        .collect()
}

/// Fold a query into the codepoint sequence matched against candidates.
pub fn fold_query(query: &str) -> Vec<char> {
    query.chars().map(fold).collect()
}

/// Score `text` against `query` under `mode`.
pub fn score(text: &str, query: &str, mode: MatchMode) -> MatchResult {
    let needle = fold_query(query);
    score_folded(text, &needle, mode)
}

/// As [`score`], with the query already folded. The scheduler folds once per pass.
pub fn score_folded(text: &str, needle: &[char], mode: MatchMode) -> MatchResult {
    if needle.is_empty() {
        return MatchResult::EVERYTHING;
    }
    let hay = units(text);
    if hay.is_empty() {
        return MatchResult::NONE;
    }
    match mode {
        MatchMode::Standard => standard(&hay, needle),
        MatchMode::EditDistance => edit_distance(&hay, needle),
    }
}

fn standard(hay: &[Unit], needle: &[char]) -> MatchResult {
    let Some((start, end)) = min_window(hay, needle) else {
        return MatchResult::NONE;
    };
    let window = end - start;
    let score = needle.len() as f64 / window as f64 / hay.len() as f64;
    MatchResult {
        score,
        span: Some(MatchSpan {
            start: hay[start].start,
            end: hay[end - 1].end,
        }),
    }
}

/// Shortest window `[start, end)` (unit indices) containing `needle` as an ordered
/// subsequence. Iterates start offsets; the greedy forward scan from each start yields the
/// earliest end for that start.
fn min_window(hay: &[Unit], needle: &[char]) -> Option<(usize, usize)> {
    let first = needle[0];
    let mut best: Option<(usize, usize)> = None;
    for start in 0..hay.len() {
        if hay[start].ch != first {
            continue;
        }
        let mut matched = 1;
        let mut pos = start + 1;
        while matched < needle.len() && pos < hay.len() {
            if hay[pos].ch == needle[matched] {
                matched += 1;
            }
            pos += 1;
        }
        if matched < needle.len() {
            // A later start sees a suffix of this one and cannot complete either.
            break;
        }
        let len = pos - start;
        if best.is_none_or(|(s, e)| len < e - s) {
            best = Some((start, pos));
            if len == needle.len() {
                break;
            }
        }
    }
    best
}

fn edit_distance(hay: &[Unit], needle: &[char]) -> MatchResult {
    if needle.len() >= EDIT_DISTANCE_CEILING || hay.len() >= EDIT_DISTANCE_CEILING {
        return MatchResult::NONE;
    }
    let Some((distance, start, end)) = min_substring_distance(hay, needle) else {
        return MatchResult::NONE;
    };
    let m = MAX_DISTANCE as f64;
    let score = (m + 1.0 - distance as f64) / m;
    let span = (start < end).then(|| MatchSpan {
        start: hay[start].start,
        end: hay[end - 1].end,
    });
    MatchResult { score, span }
}

/// Minimum Levenshtein distance between `needle` and any substring of `hay`, with the
/// substring's unit range. `None` when the distance exceeds [`MAX_DISTANCE`].
///
/// The range is the earliest-ending substring at that distance, and the shortest such
/// substring when several share the end.
fn min_substring_distance(hay: &[Unit], needle: &[char]) -> Option<(usize, usize, usize)> {
    let n = hay.len();
    // row[j]: distance of needle[..i] to the closest substring ending at j.
    let mut prev = vec![0; n + 1];
    let mut cur = vec![0; n + 1];
    for (i, &qc) in needle.iter().enumerate() {
        cur[0] = i + 1;
        for j in 1..=n {
            let cost = usize::from(hay[j - 1].ch != qc);
            cur[j] = (prev[j - 1] + cost).min(prev[j] + 1).min(cur[j - 1] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    let distance = prev.iter().copied().min()?;
    if distance > MAX_DISTANCE {
        return None;
    }
    let end = prev.iter().position(|&d| d == distance)?;
    let start = end - shortest_suffix(&hay[..end], needle, distance);
    Some((distance, start, end))
}

/// Length of the shortest suffix of `hay` at Levenshtein distance `distance` from
/// `needle`. Runs the plain DP on both sequences reversed, so `row[k]` is the distance to
/// the last `k` units.
fn shortest_suffix(hay: &[Unit], needle: &[char], distance: usize) -> usize {
    let n = hay.len();
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut cur = vec![0; n + 1];
    for (i, &qc) in needle.iter().rev().enumerate() {
        cur[0] = i + 1;
        for k in 1..=n {
            let cost = usize::from(hay[n - k].ch != qc);
            cur[k] = (prev[k - 1] + cost).min(prev[k] + 1).min(cur[k - 1] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev.iter().position(|&d| d == distance).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn std_score(text: &str, query: &str) -> MatchResult {
        score(text, query, MatchMode::Standard)
    }

    fn span(r: &MatchResult) -> Option<(usize, usize)> {
        r.span.map(|s| (s.start, s.end))
    }

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(std_score("anything", ""), MatchResult::EVERYTHING);
        assert_eq!(std_score("", ""), MatchResult::EVERYTHING);
    }

    #[test]
    fn empty_candidate_scores_zero() {
        assert_eq!(std_score("", "a"), MatchResult::NONE);
    }

    #[test]
    fn shortest_window_spans_whole_candidate() {
        let r = std_score("foobar", "fbr");
        assert_eq!(span(&r), Some((0, 6)));
        assert!((r.score - 3.0 / 6.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn shorter_window_beats_left_most() {
        let r = std_score("abXabY", "aY");
        assert_eq!(span(&r), Some((3, 6)));
    }

    #[test]
    fn left_most_wins_equal_length_windows() {
        let r = std_score("xabxab", "ab");
        assert_eq!(span(&r), Some((1, 3)));
    }

    #[test]
    fn case_insensitive_both_ways() {
        assert!(std_score("FooBar", "fb").is_match());
        assert!(std_score("foobar", "FB").is_match());
        assert!(std_score("ÄRGER", "är").is_match());
    }

    #[test]
    fn out_of_order_is_no_match() {
        assert_eq!(std_score("abc", "ca"), MatchResult::NONE);
        assert_eq!(std_score("alpha", "z"), MatchResult::NONE);
    }

    #[test]
    fn span_uses_byte_offsets_of_multibyte_text() {
        let r = std_score("día-uno", "au");
        // "a" at byte 3 (after 'd', 'í' = 2 bytes), "u" at byte 5.
        assert_eq!(span(&r), Some((3, 6)));
    }

    #[test]
    fn escapes_are_skipped_and_not_counted() {
        let plain = std_score("red", "rd");
        let coloured = std_score("\x1b[31mred\x1b[0m", "rd");
        assert_eq!(plain.score, coloured.score);
        assert_eq!(span(&coloured), Some((5, 8)));
        // SGR parameter bytes never match.
        assert_eq!(std_score("\x1b[31mx", "3"), MatchResult::NONE);
    }

    #[test]
    fn shorter_candidate_ranks_higher_for_same_window() {
        assert!(std_score("ab", "ab").score > std_score("abcdef", "ab").score);
    }

    #[test]
    fn edit_distance_exact_substring() {
        let r = score("hello world", "world", MatchMode::EditDistance);
        assert_eq!(r.score, 1.5);
        assert_eq!(span(&r), Some((6, 11)));
    }

    #[test]
    fn edit_distance_tolerates_typos() {
        let r = score("configuration", "cnofig", MatchMode::EditDistance);
        assert!(r.is_match());
        assert!(r.score <= 1.0);
        let miss = score("abc", "zzzzzz", MatchMode::EditDistance);
        assert_eq!(miss, MatchResult::NONE);
    }

    #[test]
    fn edit_distance_respects_ceiling() {
        let long = "a".repeat(EDIT_DISTANCE_CEILING);
        assert_eq!(score(&long, "a", MatchMode::EditDistance), MatchResult::NONE);
        let short = "a".repeat(EDIT_DISTANCE_CEILING - 1);
        assert!(score(&short, "a", MatchMode::EditDistance).is_match());
    }
}
