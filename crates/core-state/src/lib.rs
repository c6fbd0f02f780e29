//! Selection state machine.
//!
//! A [`Session`] starts in the editing state and ends in one of the [`Outcome`]s:
//! a committed candidate, the raw query accepted as free text, or a cancel.
//!
//! Editing keys change the query, owe a filter pass and reset the selection to the top.
//! Cursor keys only move the query cursor; list keys only move the selection and the
//! vertical scroll. Passes run in [`Session::refresh`], which every handled event ends
//! with; an aborted pass leaves the session dirty so the next refresh rescans.

pub mod outcome;
pub mod session;
pub mod view;

pub use outcome::Outcome;
pub use session::{Control, Session};
pub use view::ViewState;
