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

//! The options menu, leading to the settings menus.

use crate::{
    menu::{Menu, MenuDelegate, MenuItem},
    session::{MenuRequest, Session},
    window::WindowEventResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionsItem {
    Sound,
    Resolution,
}

pub(crate) struct OptionsMenu {
    menu: Menu<OptionsItem>,
}

impl OptionsMenu {
    pub(crate) fn new() -> Self {
        Self {
            menu: Menu::new(
                "Options",
                vec![
                    MenuItem::command(OptionsItem::Sound, "Sound & music..."),
                    MenuItem::command(OptionsItem::Resolution, "Screen resolution..."),
                ],
            ),
        }
    }
}

impl MenuDelegate for OptionsMenu {
    type Key = OptionsItem;

    fn menu(&mut self) -> &mut Menu<OptionsItem> {
        &mut self.menu
    }

    fn selected(&mut self, key: OptionsItem, session: &mut Session) -> WindowEventResult {
        session.request(match key {
            OptionsItem::Sound => MenuRequest::Sound,
            OptionsItem::Resolution => MenuRequest::Resolution,
        });
        WindowEventResult::Handled
    }

    fn closing(&mut self, session: &mut Session) {
        session.request(MenuRequest::SaveConfig);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::{
        events::Event,
        menu::{MenuWindow, testing::key},
        session::testing,
        window::{Canvas, WindowHandler},
    };

    #[test]
    fn closing_saves_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = testing::session(dir.path());
        let mut window = MenuWindow(OptionsMenu::new());
        let canvas = Canvas::new(0, 0, 30, 4);

        window.handle(&canvas, &Event::KeyCommand(key(KeyCode::Down)), &mut session);
        window.handle(&canvas, &Event::KeyCommand(key(KeyCode::Enter)), &mut session);
        let esc = window.handle(&canvas, &Event::KeyCommand(key(KeyCode::Esc)), &mut session);
        window.handle(&canvas, &Event::WindowClose, &mut session);

        assert_eq!(esc, WindowEventResult::Close);
        assert_eq!(
            session.take_requests(),
            vec![MenuRequest::Resolution, MenuRequest::SaveConfig]
        );
    }
}
