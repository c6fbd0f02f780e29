use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    /// A control string the renderer depends on is absent.
    #[error("terminal lacks required capability `{0}`")]
    MissingCapability(&'static str),
    #[error("no controlling terminal")]
    NotATerminal,
    #[error(transparent)]
    Io(#[from] io::Error),
}
