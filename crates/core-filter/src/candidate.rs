//! Candidate records.
//!
//! A candidate keeps its display line (`text`, or `text NUL description`) immutable and
//! carries per-pass scoring fields that the scheduler overwrites on every filter pass.

use crate::matcher::MatchSpan;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    line: String,
    /// Byte length of the primary text within `line`.
    text_end: usize,
    pub score: f64,
    /// Byte offsets into the primary text of the last match window.
    pub span: Option<MatchSpan>,
}

impl Candidate {
    pub fn new(text: &str) -> Self {
        Self {
            line: text.to_owned(),
            text_end: text.len(),
            score: 0.0,
            span: None,
        }
    }

    pub fn with_description(text: &str, description: &str) -> Self {
        let mut line = String::with_capacity(text.len() + 1 + description.len());
        line.push_str(text);
        line.push('\0');
        line.push_str(description);
        Self {
            line,
            text_end: text.len(),
            score: 0.0,
            span: None,
        }
    }

    /// Text used for matching and emitted on commit.
    pub fn text(&self) -> &str {
        &self.line[..self.text_end]
    }

    /// Description, empty when none was split off.
    pub fn description(&self) -> &str {
        self.line.get(self.text_end + 1..).unwrap_or("")
    }

    /// Full line as rendered; the separator is a NUL placeholder.
    pub fn display(&self) -> &str {
        &self.line
    }

    pub(crate) fn reset(&mut self) {
        self.score = 0.0;
        self.span = None;
    }
}

/// All candidates in input order, plus the ranked order of the last filter pass.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    items: Vec<Candidate>,
    order: Vec<usize>,
}

impl CandidateSet {
    pub fn new(items: Vec<Candidate>) -> Self {
        let order = (0..items.len()).collect();
        Self { items, order }
    }

    /// Parse newline-terminated records. A final line without a newline is kept and
    /// invalid UTF-8 is replaced. With `descriptions`, the description starts after the
    /// last occurrence of any character of `separators`.
    pub fn parse(input: &[u8], descriptions: bool, separators: &str) -> Self {
        if input.is_empty() {
            return Self::default();
        }
        let text = String::from_utf8_lossy(input);
        let body = text.strip_suffix('\n').unwrap_or(&text);
        let items = body
            .split('\n')
            .map(|line| {
                let split = if descriptions {
                    line.char_indices()
                        .rev()
                        .find(|(_, c)| separators.contains(*c))
                } else {
                    None
                };
                match split {
                    Some((at, sep)) => {
                        Candidate::with_description(&line[..at], &line[at + sep.len_utf8()..])
                    }
                    None => Candidate::new(line),
                }
            })
            .collect();
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [Candidate] {
        &mut self.items
    }

    /// Indices in ranked order (input order before the first pass).
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub(crate) fn set_order(&mut self, order: Vec<usize>) {
        self.order = order;
    }

    /// Candidate at ranked position `rank`.
    pub fn ranked(&self, rank: usize) -> Option<&Candidate> {
        self.order.get(rank).and_then(|&i| self.items.get(i))
    }

    /// Length of the leading run of positive scores in ranked order.
    pub fn positive_prefix(&self) -> usize {
        self.order
            .iter()
            .take_while(|&&i| self.items[i].score > 0.0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(set: &CandidateSet) -> Vec<(&str, &str)> {
        set.items()
            .iter()
            .map(|c| (c.text(), c.description()))
            .collect()
    }

    #[test]
    fn parse_plain_lines() {
        let set = CandidateSet::parse(b"alpha\nbeta\ngamma\n", false, " ");
        assert_eq!(
            texts(&set),
            vec![("alpha", ""), ("beta", ""), ("gamma", "")]
        );
        assert_eq!(set.order(), &[0, 1, 2]);
    }

    #[test]
    fn parse_keeps_trailing_partial_line_and_blank_lines() {
        let set = CandidateSet::parse(b"a\n\nb", false, " ");
        assert_eq!(texts(&set), vec![("a", ""), ("", ""), ("b", "")]);
    }

    #[test]
    fn parse_empty_input() {
        assert!(CandidateSet::parse(b"", false, " ").is_empty());
        assert_eq!(CandidateSet::parse(b"\n", false, " ").len(), 1);
    }

    #[test]
    fn description_follows_last_separator() {
        let set = CandidateSet::parse(b"a b c\nnosep\n", true, " ");
        assert_eq!(texts(&set), vec![("a b", "c"), ("nosep", "")]);
        assert_eq!(set.get(0).map(Candidate::display), Some("a b\0c"));
    }

    #[test]
    fn custom_separator_set() {
        let set = CandidateSet::parse(b"key=val:ue\n", true, "=:");
        assert_eq!(texts(&set), vec![("key=val", "ue")]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let set = CandidateSet::parse(b"ok\xff\n", false, " ");
        assert_eq!(set.get(0).map(Candidate::text), Some("ok\u{fffd}"));
    }

    #[test]
    fn positive_prefix_stops_at_first_zero() {
        let mut set = CandidateSet::new(vec![
            Candidate::new("a"),
            Candidate::new("b"),
            Candidate::new("c"),
        ]);
        set.items_mut()[0].score = 0.5;
        set.items_mut()[2].score = 0.7;
        set.set_order(vec![2, 0, 1]);
        assert_eq!(set.positive_prefix(), 2);
        assert_eq!(set.ranked(0).map(Candidate::text), Some("c"));
    }
}
