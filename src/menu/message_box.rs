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

//! Modal message box with a single OK button.

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    events::Event,
    input::MouseButton,
    session::Session,
    theme::Theme,
    window::{Canvas, Placement, WindowEventResult, WindowHandler},
};

pub(crate) struct MessageBox {
    title: String,
    lines: Vec<String>,
}

impl MessageBox {
    pub(crate) fn new(title: &str, text: &str) -> Self {
        Self {
            title: title.to_string(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub(crate) fn placement(&self) -> Placement {
        let widest = self
            .lines
            .iter()
            .map(|line| line.chars().count())
            .chain(std::iter::once(self.title.chars().count()))
            .max()
            .unwrap_or(0);
        Placement::Centered {
            width: (widest + 4).max(20).min(usize::from(u16::MAX)) as u16,
            height: (self.lines.len() + 4).min(usize::from(u16::MAX)) as u16,
        }
    }
}

impl WindowHandler<Session> for MessageBox {
    fn handle(&mut self, canvas: &Canvas, event: &Event, session: &mut Session) -> WindowEventResult {
        match event {
            Event::KeyCommand(key) => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => WindowEventResult::Close,
                _ => WindowEventResult::Handled,
            },
            Event::MouseButtonUp(MouseButton::Left) => {
                let (x, y) = session.pointer;
                if canvas.contains(x, y) {
                    WindowEventResult::Close
                } else {
                    WindowEventResult::Handled
                }
            }
            _ => WindowEventResult::Ignored,
        }
    }

    fn render(&mut self, f: &mut Frame, canvas: &Canvas, _session: &Session, theme: &Theme) {
        let area = canvas.rect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent_colour))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD),
            ));

        let mut text: Vec<Line> = self
            .lines
            .iter()
            .map(|line| Line::from(line.as_str()).style(Style::default().fg(theme.text_colour)))
            .collect();
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "[ OK ]",
            Style::default().bg(theme.highlight_colour).fg(theme.text_colour),
        )));

        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{menu::testing::key, session::testing};

    #[test]
    fn sized_to_text() {
        let message = MessageBox::new("Warning", "Entered resolution is too small.\nReverting ...");

        assert_eq!(message.placement(), Placement::Centered { width: 36, height: 6 });
    }

    #[test]
    fn closes_on_confirm_and_swallows_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = testing::session(dir.path());
        let mut message = MessageBox::new("Warning", "text");
        let canvas = Canvas::new(0, 0, 20, 5);

        let other = message.handle(&canvas, &Event::KeyCommand(key(KeyCode::Char('q'))), &mut session);
        let enter = message.handle(&canvas, &Event::KeyCommand(key(KeyCode::Enter)), &mut session);

        assert_eq!(other, WindowEventResult::Handled);
        assert_eq!(enter, WindowEventResult::Close);
    }
}
