use std::io::{self, Write};

use core_config::Options;
use core_events::{Event, InputProbe, Key};
use core_filter::{Candidate, CandidateSet, FilterScheduler, PassStats};
use core_text::Query;
use tracing::{debug, trace};

use crate::outcome::Outcome;
use crate::view::ViewState;

/// What the event loop should do after [`Session::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Geometry changed: measure the terminal and call [`Session::resize`].
    Resize,
    /// Restore the terminal, stop the process, re-enter on resume.
    Suspend,
    Finish(Outcome),
}

/// Owns the query, the candidate set, the filter scheduler and the view. Every state
/// change goes through [`Session::handle`], [`Session::resize`] or [`Session::refresh`].
#[derive(Debug)]
pub struct Session {
    options: Options,
    query: Query,
    candidates: CandidateSet,
    scheduler: FilterScheduler,
    view: ViewState,
    /// Query changed, or the last pass was aborted.
    dirty: bool,
    cursor_col: usize,
    last_pass: PassStats,
}

impl Session {
    /// Nothing is scored until the first [`Session::refresh`].
    pub fn new(options: Options, candidates: CandidateSet, cols: u16, rows: u16) -> Self {
        let query = Query::new(&options.initial_query).with_mode(options.match_mode);
        let scheduler = FilterScheduler::new(options.sort);
        Self {
            options,
            query,
            candidates,
            scheduler,
            view: ViewState::new(cols, rows),
            dirty: true,
            cursor_col: 0,
            last_pass: PassStats::default(),
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Query cursor column within the horizontally scrolled query line.
    pub fn cursor_column(&self) -> usize {
        self.cursor_col
    }

    pub fn last_pass(&self) -> PassStats {
        self.last_pass
    }

    /// Candidates that may be selected and drawn: all of them for an empty query,
    /// otherwise the leading run of positive scores.
    pub fn visible_count(&self) -> usize {
        if self.query.is_empty() {
            self.candidates.len()
        } else {
            self.candidates.positive_prefix()
        }
    }

    /// Candidate at ranked position `rank`, if it is visible.
    pub fn visible(&self, rank: usize) -> Option<&Candidate> {
        if rank < self.visible_count() {
            self.candidates.ranked(rank)
        } else {
            None
        }
    }

    /// Input index of the selected candidate.
    pub fn selected(&self) -> Option<usize> {
        if self.visible_count() == 0 {
            return None;
        }
        self.candidates.order().get(self.view.selection).copied()
    }

    /// Run a filter pass if one is owed, then settle the view.
    pub fn refresh(&mut self, probe: &dyn InputProbe) {
        if self.dirty {
            self.last_pass = self.scheduler.refilter(&mut self.candidates, &self.query, probe);
            self.dirty = self.last_pass.aborted;
            self.view.clamp(self.visible_count());
        }
        self.cursor_col = self.view.sync_x_scroll(&self.query);
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.view.resize(cols, rows, self.visible_count());
        self.cursor_col = self.view.sync_x_scroll(&self.query);
        debug!(target: "runtime", cols, rows, "resized");
    }

    pub fn handle(&mut self, event: Event, probe: &dyn InputProbe) -> Control {
        let control = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize => Control::Resize,
            Event::Interrupt => Control::Finish(Outcome::Cancelled),
            Event::Suspend => Control::Suspend,
        };
        if let Control::Finish(outcome) = &control {
            debug!(target: "runtime", outcome = outcome.name(), "session_finished");
            return control;
        }
        self.refresh(probe);
        trace!(
            target: "runtime",
            event = event.name(),
            visible = self.visible_count(),
            selection = self.view.selection,
            "event_handled"
        );
        control
    }

    fn handle_key(&mut self, key: Key) -> Control {
        let count = self.visible_count();
        let edited = match key {
            Key::Enter => {
                return match self.selected() {
                    Some(i) => Control::Finish(Outcome::Committed(i)),
                    None => Control::Continue,
                };
            }
            Key::AltEnter => {
                return Control::Finish(Outcome::FreeText(self.query.as_str().to_owned()));
            }
            Key::Printable(ch) => self.query.insert_at_cursor(ch).is_ok(),
            Key::Backspace => self.query.delete_before_cursor(),
            Key::Delete => self.query.delete_at_cursor(),
            Key::WordErase => self.query.erase_word(),
            Key::KillBefore => {
                self.query.kill_before_cursor();
                true
            }
            Key::KillAfter => {
                self.query.kill_after_cursor();
                true
            }
            Key::Left => {
                self.query.move_left();
                false
            }
            Key::Right => {
                self.query.move_right();
                false
            }
            Key::LineStart => {
                self.query.move_home();
                false
            }
            Key::LineEnd => {
                self.query.move_end();
                false
            }
            Key::Up => {
                self.view.up();
                false
            }
            Key::Down => {
                self.view.down(count);
                false
            }
            Key::PageUp => {
                self.view.page_up();
                false
            }
            Key::PageDown => {
                self.view.page_down(count);
                false
            }
            Key::ListHome => {
                self.view.home();
                false
            }
            Key::ListEnd => {
                self.view.end(count);
                false
            }
            Key::Unknown => false,
        };
        if edited {
            self.dirty = true;
            self.view.reset();
        }
        Control::Continue
    }

    /// Write `outcome` to the result channel using this session's options.
    pub fn emit<W: Write + ?Sized>(&self, outcome: &Outcome, out: &mut W) -> io::Result<()> {
        outcome.emit(&self.candidates, self.options.output_description, out)
    }
}
