// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.


//! Terminal environment utilities.
//!
//! Background colour is changed with OSC escape sequences (OSC 11 to set,
//! OSC 111 to reset); most modern terminals understand both. Mouse capture
//! and focus reporting go through crossterm so pointer motion, buttons and
//! focus changes arrive as events.

use std::io::{self, Write};

use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};

/// Sets the terminal background colour, e.g. `"#1e1e1e"`.
pub(crate) fn set_terminal_bg(hex_color: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]11;{}\x07", hex_color)?;
    stdout.flush()
}

/// Reverts the background to the user's own configuration.
pub(crate) fn reset_terminal_bg() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]111\x07")?;
    stdout.flush()
}

pub(crate) fn enable_mouse() -> io::Result<()> {
    execute!(io::stdout(), EnableMouseCapture)
}

pub(crate) fn disable_mouse() -> io::Result<()> {
    execute!(io::stdout(), DisableMouseCapture)
}

pub(crate) fn enable_focus_reports() -> io::Result<()> {
    execute!(io::stdout(), EnableFocusChange)
}

pub(crate) fn disable_focus_reports() -> io::Result<()> {
    execute!(io::stdout(), DisableFocusChange)
}
