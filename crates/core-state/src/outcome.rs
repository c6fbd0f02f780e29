use std::io::{self, Write};

use core_filter::CandidateSet;

/// Terminal state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input index of the chosen candidate.
    Committed(usize),
    /// Raw query text, accepted as a synthetic candidate with an empty description.
    FreeText(String),
    Cancelled,
}

impl Outcome {
    /// Write the result to `out`: the text, then the description line when
    /// `output_description` is set. Nothing is written on cancel.
    pub fn emit<W: Write + ?Sized>(
        &self,
        set: &CandidateSet,
        output_description: bool,
        out: &mut W,
    ) -> io::Result<()> {
        let (text, description) = match self {
            Outcome::Committed(i) => match set.get(*i) {
                Some(c) => (c.text(), c.description()),
                None => return Ok(()),
            },
            Outcome::FreeText(q) => (q.as_str(), ""),
            Outcome::Cancelled => return Ok(()),
        };
        writeln!(out, "{text}")?;
        if output_description {
            writeln!(out, "{description}")?;
        }
        out.flush()
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Cancelled => 1,
            _ => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Committed(_) => "committed",
            Outcome::FreeText(_) => "free_text",
            Outcome::Cancelled => "cancelled",
        }
    }
}
