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

//! The main menu.

use crate::{
    menu::{Menu, MenuDelegate, MenuItem},
    session::{MenuRequest, Session},
    window::WindowEventResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MainItem {
    NewGame,
    Options,
    Quit,
}

pub(crate) struct MainMenu {
    menu: Menu<MainItem>,
}

impl MainMenu {
    pub(crate) fn new() -> Self {
        Self {
            menu: Menu::new(
                "Descent",
                vec![
                    MenuItem::command(MainItem::NewGame, "New game"),
                    MenuItem::command(MainItem::Options, "Options..."),
                    MenuItem::command(MainItem::Quit, "Quit"),
                ],
            ),
        }
    }
}

impl MenuDelegate for MainMenu {
    type Key = MainItem;

    fn menu(&mut self) -> &mut Menu<MainItem> {
        &mut self.menu
    }

    fn selected(&mut self, key: MainItem, session: &mut Session) -> WindowEventResult {
        session.request(match key {
            MainItem::NewGame => MenuRequest::NewGame,
            MainItem::Options => MenuRequest::Options,
            MainItem::Quit => MenuRequest::Quit,
        });
        WindowEventResult::Handled
    }

    // Leaving is only possible through Quit.
    fn allow_close(&self) -> bool {
        false
    }
}
