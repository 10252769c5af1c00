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

//! File and directory picker.
//!
//! Shows a [`DirectoryBrowser`] listing and writes the chosen absolute path
//! into the setting named by its [`BrowseTarget`].

use std::path::PathBuf;

use crossterm::event::KeyCode;
use log::info;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::{
    browser::{BrowserEntry, BrowserOutcome, DirectoryBrowser, resolve_start},
    events::Event,
    input::MouseButton,
    session::{BrowseTarget, Session},
    theme::Theme,
    window::{Canvas, Placement, WindowEventResult, WindowHandler},
};

static NO_EXTENSIONS: [&str; 0] = [];
static LEVEL_MUSIC_EXTENSIONS: [&str; 1] = ["m3u"];
static SONG_EXTENSIONS: [&str; 5] = ["hmp", "mid", "ogg", "flac", "mp3"];

const SONG_NAMES: [&str; 5] = ["main menu", "briefing", "escape sequence", "game ending", "credits"];

pub(crate) struct FileBrowser {
    target: BrowseTarget,
    title: Vec<String>,
    browser: DirectoryBrowser,
}

impl FileBrowser {
    pub(crate) fn new(target: BrowseTarget, session: &Session) -> Self {
        let music = &session.config.music;
        let (title, current, extensions, select_dir): (String, &str, &[&'static str], bool) = match target {
            BrowseTarget::LevelMusic => (
                "Select directory or\nM3U playlist to\nplay level music from".to_string(),
                music.level_music_path.as_str(),
                &LEVEL_MUSIC_EXTENSIONS[..],
                true,
            ),
            BrowseTarget::Song(song) => (
                format!("Select {} music", SONG_NAMES.get(song).copied().unwrap_or("song")),
                music.misc_music.get(song).map(String::as_str).unwrap_or_default(),
                &SONG_EXTENSIONS[..],
                false,
            ),
            BrowseTarget::CdRipDir => (
                "Select directory of\nripped CD tracks".to_string(),
                music.cd_rip_dir.as_str(),
                &NO_EXTENSIONS[..],
                true,
            ),
        };

        let base = session
            .args
            .data_dirs
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("."));
        let base = std::path::absolute(&base).unwrap_or(base);
        let start = resolve_start(current, &base);

        Self {
            target,
            title: title.lines().map(str::to_string).collect(),
            browser: DirectoryBrowser::new(start, extensions, select_dir),
        }
    }

    pub(crate) fn placement() -> Placement {
        Placement::Centered { width: 60, height: 20 }
    }

    fn choose(&mut self, session: &mut Session) -> WindowEventResult {
        match self.browser.choose() {
            BrowserOutcome::Chosen(path) => {
                self.store(&path, session);
                WindowEventResult::Close
            }
            BrowserOutcome::Listed | BrowserOutcome::Stay => WindowEventResult::Handled,
        }
    }

    fn store(&self, path: &std::path::Path, session: &mut Session) {
        let value = path.to_string_lossy().into_owned();
        info!("Selected {value} for {:?}", self.target);

        let music = &mut session.config.music;
        match self.target {
            BrowseTarget::LevelMusic => music.level_music_path = value,
            BrowseTarget::Song(song) => {
                if let Some(slot) = music.misc_music.get_mut(song) {
                    *slot = value;
                }
            }
            BrowseTarget::CdRipDir => music.cd_rip_dir = value,
        }
        session.sync_music_settings();
    }

    fn list_top(&self, canvas: &Canvas) -> i32 {
        // Border, title lines and the directory line.
        canvas.y + 1 + self.title.len() as i32 + 1
    }
}

impl WindowHandler<Session> for FileBrowser {
    fn handle(&mut self, canvas: &Canvas, event: &Event, session: &mut Session) -> WindowEventResult {
        match event {
            Event::KeyCommand(key) => match key.code {
                KeyCode::Esc => WindowEventResult::Close,
                KeyCode::Up => {
                    self.browser.previous();
                    WindowEventResult::Handled
                }
                KeyCode::Down => {
                    self.browser.next();
                    WindowEventResult::Handled
                }
                KeyCode::Enter => self.choose(session),
                _ => WindowEventResult::Handled,
            },
            Event::MouseButtonDown(MouseButton::Left) => {
                let (x, y) = session.pointer;
                if !canvas.contains(x, y) {
                    return WindowEventResult::Handled;
                }
                let row = y - self.list_top(canvas);
                if row < 0 {
                    return WindowEventResult::Handled;
                }
                let index = self.browser.state.offset() + row as usize;
                if index >= self.browser.entries().len() {
                    return WindowEventResult::Handled;
                }
                self.browser.select(index);
                self.choose(session)
            }
            Event::MouseButtonUp(MouseButton::Right) => WindowEventResult::Close,
            Event::MouseButtonDown(MouseButton::ZUp) => {
                self.browser.previous();
                WindowEventResult::Handled
            }
            Event::MouseButtonDown(MouseButton::ZDown) => {
                self.browser.next();
                WindowEventResult::Handled
            }
            _ => WindowEventResult::Ignored,
        }
    }

    fn render(&mut self, f: &mut Frame, canvas: &Canvas, _session: &Session, theme: &Theme) {
        let area = canvas.rect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_colour));
        let inner = block.inner(area);

        f.render_widget(Clear, area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.title.len() as u16),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title: Vec<Line> = self
            .title
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.as_str(),
                    Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        f.render_widget(Paragraph::new(title), chunks[0]);

        f.render_widget(
            Paragraph::new(self.browser.dir().to_string_lossy().into_owned())
                .style(Style::default().fg(theme.text_dim_colour)),
            chunks[1],
        );

        let rows: Vec<ListItem> = self
            .browser
            .entries()
            .iter()
            .map(|entry| {
                let style = match entry {
                    BrowserEntry::File(_) => Style::default().fg(theme.text_colour),
                    _ => Style::default().fg(theme.accent_colour),
                };
                ListItem::new(Line::from(entry.label().to_string()).style(style))
            })
            .collect();

        let list = List::new(rows).highlight_style(Style::default().bg(theme.highlight_colour).fg(Color::White));
        f.render_stateful_widget(list, chunks[2], &mut self.browser.state);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::{menu::testing::key, session::testing, songs::SONG_ENDGAME};

    #[test]
    fn level_music_starts_in_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("levels")).unwrap();
        let (mut session, _) = testing::session(dir.path());
        session.config.music.level_music_path = dir.path().join("levels").to_string_lossy().into_owned();

        let browser = FileBrowser::new(BrowseTarget::LevelMusic, &session);

        assert_eq!(browser.browser.dir(), dir.path().join("levels"));
        assert_eq!(browser.title.len(), 3);
        assert_eq!(browser.browser.entries()[1], BrowserEntry::ThisDirectory);
    }

    #[test]
    fn choosing_this_directory_stores_level_path() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = testing::session(dir.path());
        session.config.music.level_music_path = dir.path().to_string_lossy().into_owned();
        let mut browser = FileBrowser::new(BrowseTarget::LevelMusic, &session);
        let canvas = Canvas::new(0, 0, 60, 20);

        browser.handle(&canvas, &Event::KeyCommand(key(KeyCode::Down)), &mut session);
        let result = browser.handle(&canvas, &Event::KeyCommand(key(KeyCode::Enter)), &mut session);

        assert_eq!(result, WindowEventResult::Close);
        assert_eq!(session.songs.settings().level_music_path, dir.path().to_string_lossy());
    }

    #[test]
    fn choosing_a_file_stores_song_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ending.ogg"), b"").unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();
        let (mut session, _) = testing::session(dir.path());
        session.config.music.misc_music[SONG_ENDGAME] = dir.path().join("missing.ogg").to_string_lossy().into_owned();
        let mut browser = FileBrowser::new(BrowseTarget::Song(SONG_ENDGAME), &session);
        let canvas = Canvas::new(0, 0, 60, 20);

        assert_eq!(browser.browser.entries().len(), 2);
        // Border, title and directory lines come before "..", then the file.
        session.pointer = (5, 4);
        let result = browser.handle(&canvas, &Event::MouseButtonDown(MouseButton::Left), &mut session);

        assert_eq!(result, WindowEventResult::Close);
        assert_eq!(
            session.config.music.misc_music[SONG_ENDGAME],
            dir.path().join("ending.ogg").to_string_lossy()
        );
    }

    #[test]
    fn renders_entries_under_the_title() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ending.ogg"), b"").unwrap();
        let (mut session, _) = testing::session(dir.path());
        session.config.music.misc_music[SONG_ENDGAME] = dir.path().join("ending.ogg").to_string_lossy().into_owned();
        let mut browser = FileBrowser::new(BrowseTarget::Song(SONG_ENDGAME), &session);
        let canvas = Canvas::new(0, 0, 60, 20);

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| browser.render(f, &canvas, &session, &Theme::default()))
            .unwrap();

        let screen: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains(".."));
        assert!(screen.contains("ending.ogg"));
        assert_eq!(browser.browser.state.selected(), Some(0));
    }

    #[test]
    fn escape_closes_without_storing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = testing::session(dir.path());
        let mut browser = FileBrowser::new(BrowseTarget::CdRipDir, &session);

        let result = browser.handle(&Canvas::new(0, 0, 60, 20), &Event::KeyCommand(key(KeyCode::Esc)), &mut session);

        assert_eq!(result, WindowEventResult::Close);
        assert!(session.config.music.cd_rip_dir.is_empty());
    }
}
