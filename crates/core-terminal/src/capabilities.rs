//! Terminal capability provider.
//!
//! Control strings are looked up by name and treated as opaque bytes by the decoder and
//! renderer. The built-in table renders crossterm commands to their ANSI form, which
//! covers xterm and its descendants; `TERM=dumb` yields an empty table so startup fails
//! with a [`TerminalError::MissingCapability`] instead of drawing garbage.

use std::collections::HashMap;

use crossterm::Command;
use crossterm::cursor::{Hide, MoveRight, MoveUp, Show};
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::TerminalError;

/// Named, parameterless control strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ClearToEndOfScreen,
    EnterStandout,
    ExitStandout,
    EnterUnderline,
    ExitUnderline,
    ExitAttributes,
    EnterAltScreen,
    ExitAltScreen,
    CursorVisible,
    CursorInvisible,
}

impl Capability {
    /// terminfo name, used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::ClearToEndOfScreen => "ed",
            Capability::EnterStandout => "smso",
            Capability::ExitStandout => "rmso",
            Capability::EnterUnderline => "smul",
            Capability::ExitUnderline => "rmul",
            Capability::ExitAttributes => "sgr0",
            Capability::EnterAltScreen => "smcup",
            Capability::ExitAltScreen => "rmcup",
            Capability::CursorVisible => "cnorm",
            Capability::CursorInvisible => "civis",
        }
    }
}

/// Directional and editing key strings a terminal sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCapability {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
}

impl KeyCapability {
    pub const ALL: [KeyCapability; 9] = [
        KeyCapability::Up,
        KeyCapability::Down,
        KeyCapability::Left,
        KeyCapability::Right,
        KeyCapability::Home,
        KeyCapability::End,
        KeyCapability::PageUp,
        KeyCapability::PageDown,
        KeyCapability::Delete,
    ];
}

pub trait CapabilityProvider {
    fn string(&self, cap: Capability) -> Option<&str>;
    /// Parameterised cursor-up by `n` rows. Terminals treat `n = 0` as 1.
    fn cursor_up(&self, n: u16) -> Option<String>;
    /// Parameterised cursor-right by `n` columns. Terminals treat `n = 0` as 1.
    fn cursor_right(&self, n: u16) -> Option<String>;
    fn key(&self, key: KeyCapability) -> Option<&str>;
    /// Terminal size as `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16), TerminalError>;

    fn require(&self, cap: Capability) -> Result<&str, TerminalError> {
        self.string(cap)
            .ok_or(TerminalError::MissingCapability(cap.name()))
    }
}

/// Capabilities the picker cannot draw without.
pub fn check_required(
    caps: &dyn CapabilityProvider,
    alternate_screen: bool,
) -> Result<(), TerminalError> {
    for cap in [
        Capability::ClearToEndOfScreen,
        Capability::EnterStandout,
        Capability::ExitStandout,
        Capability::EnterUnderline,
        Capability::ExitUnderline,
        Capability::ExitAttributes,
    ] {
        caps.require(cap)?;
    }
    if caps.cursor_up(1).is_none() {
        return Err(TerminalError::MissingCapability("cuu"));
    }
    if caps.cursor_right(1).is_none() {
        return Err(TerminalError::MissingCapability("cuf"));
    }
    if alternate_screen {
        caps.require(Capability::EnterAltScreen)?;
        caps.require(Capability::ExitAltScreen)?;
    }
    Ok(())
}

fn ansi(cmd: impl Command) -> String {
    let mut s = String::new();
    // Formatting into a String cannot fail.
    let _ = cmd.write_ansi(&mut s);
    s
}

#[derive(Debug, Clone, Default)]
pub struct TerminalCapabilities {
    strings: HashMap<Capability, String>,
    keys: HashMap<KeyCapability, String>,
    parameterised: bool,
}

impl TerminalCapabilities {
    /// Select a table for the `TERM` value.
    pub fn for_term(term: Option<&str>) -> Self {
        match term {
            Some("dumb") => Self::default(),
            _ => Self::xterm(),
        }
    }

    pub fn xterm() -> Self {
        let strings = HashMap::from([
            (
                Capability::ClearToEndOfScreen,
                ansi(Clear(ClearType::FromCursorDown)),
            ),
            (Capability::EnterStandout, ansi(SetAttribute(Attribute::Reverse))),
            (Capability::ExitStandout, ansi(SetAttribute(Attribute::NoReverse))),
            (
                Capability::EnterUnderline,
                ansi(SetAttribute(Attribute::Underlined)),
            ),
            (
                Capability::ExitUnderline,
                ansi(SetAttribute(Attribute::NoUnderline)),
            ),
            (Capability::ExitAttributes, ansi(SetAttribute(Attribute::Reset))),
            (Capability::EnterAltScreen, ansi(EnterAlternateScreen)),
            (Capability::ExitAltScreen, ansi(LeaveAlternateScreen)),
            (Capability::CursorVisible, ansi(Show)),
            (Capability::CursorInvisible, ansi(Hide)),
        ]);
        // Application cursor mode, as reported by xterm's terminfo entry.
        let keys = HashMap::from([
            (KeyCapability::Up, "\x1bOA".to_owned()),
            (KeyCapability::Down, "\x1bOB".to_owned()),
            (KeyCapability::Right, "\x1bOC".to_owned()),
            (KeyCapability::Left, "\x1bOD".to_owned()),
            (KeyCapability::Home, "\x1bOH".to_owned()),
            (KeyCapability::End, "\x1bOF".to_owned()),
            (KeyCapability::PageUp, "\x1b[5~".to_owned()),
            (KeyCapability::PageDown, "\x1b[6~".to_owned()),
            (KeyCapability::Delete, "\x1b[3~".to_owned()),
        ]);
        Self {
            strings,
            keys,
            parameterised: true,
        }
    }
}

impl CapabilityProvider for TerminalCapabilities {
    fn string(&self, cap: Capability) -> Option<&str> {
        self.strings.get(&cap).map(String::as_str)
    }

    fn cursor_up(&self, n: u16) -> Option<String> {
        self.parameterised.then(|| ansi(MoveUp(n)))
    }

    fn cursor_right(&self, n: u16) -> Option<String> {
        self.parameterised.then(|| ansi(MoveRight(n)))
    }

    fn key(&self, key: KeyCapability) -> Option<&str> {
        self.keys.get(&key).map(String::as_str)
    }

    fn size(&self) -> Result<(u16, u16), TerminalError> {
        Ok(crossterm::terminal::size()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xterm_strings_are_ansi() {
        let caps = TerminalCapabilities::xterm();
        assert_eq!(caps.string(Capability::ClearToEndOfScreen), Some("\x1b[J"));
        assert_eq!(caps.string(Capability::EnterStandout), Some("\x1b[7m"));
        assert_eq!(caps.string(Capability::EnterUnderline), Some("\x1b[4m"));
        assert_eq!(caps.string(Capability::ExitAttributes), Some("\x1b[0m"));
        assert_eq!(caps.cursor_up(3).as_deref(), Some("\x1b[3A"));
        assert_eq!(caps.cursor_right(12).as_deref(), Some("\x1b[12C"));
        assert!(check_required(&caps, true).is_ok());
    }

    #[test]
    fn dumb_terminal_is_rejected() {
        let caps = TerminalCapabilities::for_term(Some("dumb"));
        match check_required(&caps, false) {
            Err(TerminalError::MissingCapability(name)) => assert_eq!(name, "ed"),
            other => panic!("expected missing capability, got {other:?}"),
        }
    }

    #[test]
    fn require_names_the_capability() {
        let caps = TerminalCapabilities::default();
        let err = caps.require(Capability::EnterAltScreen).unwrap_err();
        assert_eq!(err.to_string(), "terminal lacks required capability `smcup`");
    }

    #[test]
    fn xterm_has_every_key_string() {
        let caps = TerminalCapabilities::xterm();
        assert!(KeyCapability::ALL.iter().all(|&k| caps.key(k).is_some()));
        assert_eq!(caps.key(KeyCapability::Up), Some("\x1bOA"));
    }
}
