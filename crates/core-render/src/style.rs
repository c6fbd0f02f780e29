//! Attribute state while a line is emitted.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const STANDOUT  = 0b0000_0001; // selected row
        const UNDERLINE = 0b0000_0010; // match window
    }
}
