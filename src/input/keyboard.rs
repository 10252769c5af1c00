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


//! Keyboard translation.
//!
//! Terminal key reports become engine key-command events. Only presses and
//! auto-repeats are forwarded; release reports (sent by some platforms) are
//! dropped.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::events::{Event, EventSink};

pub(crate) fn key_handler(key: KeyEvent, sink: &mut impl EventSink) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    sink.send(Event::KeyCommand(key));
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn releases_are_dropped() {
        let mut events = Vec::new();

        key_handler(key(KeyEventKind::Press), &mut events);
        key_handler(key(KeyEventKind::Release), &mut events);
        key_handler(key(KeyEventKind::Repeat), &mut events);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Event::KeyCommand(key(KeyEventKind::Press)));
    }
}
