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

//! User interface rendering logic.
//!
//! The screen is the window stack plus a one-line status bar underneath it.
//! [`draw`] is called after every handled application event.

mod player;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position},
    style::{Modifier, Style},
    widgets::Block,
};

use crate::{App, input::mouse::CursorVisibility, render::player::draw_player};

const POINTER: &str = "\u{25C6}";

/// Renders the whole frame.
///
/// # Arguments
///
/// * `f` - The current terminal frame used for drawing.
/// * `app` - The application state; windows may update their own view state
///   (list scroll positions) while drawing.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    f.render_widget(Block::default().style(Style::default().bg(app.theme.background_colour)), outer[0]);

    app.windows.render(f, &app.session, &app.theme);

    draw_player(f, outer[1], app);

    if app.input.mouse.cursor() == CursorVisibility::Shown {
        let (x, y) = app.session.pointer;
        if x >= 0 && y >= 0 {
            let position = Position::new(x as u16, y as u16);
            if outer[0].contains(position)
                && let Some(cell) = f.buffer_mut().cell_mut(position)
            {
                cell.set_symbol(POINTER)
                    .set_style(Style::default().fg(app.theme.accent_colour).add_modifier(Modifier::BOLD));
            }
        }
    }
}
