//! Drawing the picker.
//!
//! [`FrameRenderer`] turns a [`core_state::Session`] into one batch of terminal output:
//! the horizontally scrolled query line followed by the window of visible candidates,
//! with the match window underlined and the selected row in standout. Lines go through
//! [`LineRenderer`], which does all width accounting.
//!
//! Control strings come from a [`core_terminal::CapabilityProvider`]; nothing here
//! hard-codes escape sequences beyond CR/LF.

pub mod frame;
pub mod line;
pub mod style;
pub mod timing;
pub mod writer;

pub use frame::{FrameRenderer, FrameStats};
pub use line::LineRenderer;
pub use writer::{Command, Writer, WriterStats};
