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

//! Keys that work regardless of which window is in front.
//!
//! The window stack hands an event here only when no window consumed it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use crate::{
    config::MAX_VOLUME,
    events::Event,
    session::{MenuRequest, Session},
    window::WindowEventResult,
};

/// Default handler installed on the window stack.
pub(crate) fn process_global_event(event: &Event, session: &mut Session) -> WindowEventResult {
    match event {
        Event::KeyCommand(key) => process_global_key_event(session, *key),
        _ => WindowEventResult::Ignored,
    }
}

fn process_global_key_event(session: &mut Session, key: KeyEvent) -> WindowEventResult {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
            session.request(MenuRequest::Quit);
        }

        (KeyCode::Char('-'), _) => adjust_music_volume(session, -1),
        (KeyCode::Char('='), _) | (KeyCode::Char('+'), _) => adjust_music_volume(session, 1),

        _ => return WindowEventResult::Ignored,
    }

    WindowEventResult::Handled
}

fn adjust_music_volume(session: &mut Session, delta: i8) {
    let volume = session.config.music.music_volume.saturating_add_signed(delta).min(MAX_VOLUME);
    debug!("Music volume {volume}");
    session.config.music.music_volume = volume;
    session.songs.set_volume(volume);
    session.sync_music_settings();
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::{menu::testing::key, session::testing::session};

    #[test]
    fn control_q_requests_quit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = session(dir.path());

        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        let result = process_global_event(&Event::KeyCommand(ctrl_q), &mut session);

        assert_eq!(result, WindowEventResult::Handled);
        assert_eq!(session.take_requests(), vec![MenuRequest::Quit]);
    }

    #[test]
    fn volume_keys_stay_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, music) = session(dir.path());
        session.config.music.music_volume = MAX_VOLUME;

        process_global_event(&Event::KeyCommand(key(KeyCode::Char('='))), &mut session);
        assert_eq!(session.config.music.music_volume, MAX_VOLUME);

        process_global_event(&Event::KeyCommand(key(KeyCode::Char('-'))), &mut session);
        assert_eq!(session.config.music.music_volume, MAX_VOLUME - 1);
        assert_eq!(music.volume(), MAX_VOLUME - 1);
    }

    #[test]
    fn other_events_fall_through() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = session(dir.path());

        let result = process_global_event(&Event::KeyCommand(key(KeyCode::Char('x'))), &mut session);

        assert_eq!(result, WindowEventResult::Ignored);
        assert_eq!(process_global_event(&Event::Idle, &mut session), WindowEventResult::Ignored);
    }
}
