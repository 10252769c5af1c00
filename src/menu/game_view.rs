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

//! The in-game screen.
//!
//! Stands in for the game proper: it owns the level number and drives level
//! music while the menus are hidden behind it. A looping engine hum on one
//! sound channel follows the mouse: the pointer pans it and the wheel sets
//! its volume.

use crossterm::event::KeyCode;
use log::debug;
use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    digi::channels::{CHANNEL_MAX_VOLUME, SoundStart},
    events::Event,
    input::MouseButton,
    session::{MenuRequest, Session},
    songs::SONG_ENDLEVEL,
    theme::Theme,
    viewport::F1_0,
    window::{Canvas, WindowEventResult, WindowHandler},
};

const LAST_LEVEL: i32 = 30;

const SOUND_ENGINE_HUM: u16 = 121;
const HUM_VOLUME_STEP: u32 = CHANNEL_MAX_VOLUME / 8;
const PAN_RIGHT: i32 = 0xffff;

pub(crate) struct GameView {
    last_input: Option<String>,
    hum: Option<usize>,
    hum_volume: u32,
}

impl GameView {
    pub(crate) fn new() -> Self {
        Self {
            last_input: None,
            hum: None,
            hum_volume: CHANNEL_MAX_VOLUME / 2,
        }
    }

    /// The hum channel, while the sound on it is still going.
    fn playing_hum(&self, session: &Session) -> Option<usize> {
        self.hum.filter(|&channel| session.digi.is_channel_playing(channel))
    }

    /// Starts the hum, or lets a running one finish its current pass.
    fn toggle_hum(&mut self, session: &mut Session) {
        if let Some(channel) = self.playing_hum(session) {
            session.digi.end_sound(channel);
            self.hum = None;
            return;
        }

        let start = SoundStart {
            looping: true,
            ..SoundStart::once(SOUND_ENGINE_HUM, session.sample_rate, self.hum_volume)
        };
        self.hum = session.digi.start_sound(start);
    }

    fn pan_hum(&self, canvas: &Canvas, session: &mut Session) {
        let Some(channel) = self.playing_hum(session) else {
            return;
        };
        let width = i32::from(canvas.w).max(2) - 1;
        let x = (session.pointer.0 - canvas.x).clamp(0, width);
        session.digi.set_channel_pan(channel, (x * PAN_RIGHT / width) as u32);
    }

    fn change_hum_volume(&mut self, session: &mut Session, louder: bool) {
        let Some(channel) = self.playing_hum(session) else {
            return;
        };
        self.hum_volume = if louder {
            (self.hum_volume + HUM_VOLUME_STEP).min(CHANNEL_MAX_VOLUME)
        } else {
            self.hum_volume.saturating_sub(HUM_VOLUME_STEP)
        };
        session.digi.set_channel_volume(channel, self.hum_volume);
    }

    fn change_level(&self, session: &mut Session, delta: i32) {
        let Some(level) = session.level else {
            return;
        };
        let next = (level + delta).clamp(1, LAST_LEVEL);
        if next != level {
            session.start_game(next);
        }
    }

    fn key(&mut self, code: KeyCode, session: &mut Session) -> WindowEventResult {
        let level = session.level.unwrap_or(1);
        match code {
            KeyCode::Esc => return WindowEventResult::Close,
            KeyCode::Char(']') => {
                session.songs.play_level_song(level, 1);
            }
            KeyCode::Char('[') => {
                session.songs.play_level_song(level, -1);
            }
            KeyCode::Char('p') => session.songs.pause_resume(),
            KeyCode::Char('n') => self.change_level(session, 1),
            KeyCode::Char('N') => self.change_level(session, -1),
            KeyCode::Char('e') => {
                session.songs.play_song(SONG_ENDLEVEL, false);
            }
            KeyCode::Char('h') => self.toggle_hum(session),
            KeyCode::Char('x') => {
                session.digi.stop_all_channels();
                self.hum = None;
            }
            _ => return WindowEventResult::Ignored,
        }
        WindowEventResult::Handled
    }
}

impl WindowHandler<Session> for GameView {
    fn handle(&mut self, canvas: &Canvas, event: &Event, session: &mut Session) -> WindowEventResult {
        match event {
            Event::KeyCommand(key) => self.key(key.code, session),
            Event::WindowClose => {
                if let Some(channel) = self.hum.take() {
                    session.digi.stop_sound(channel);
                }
                session.end_game();
                session.request(MenuRequest::ShowMenus);
                WindowEventResult::Handled
            }
            Event::MouseMoved { .. }
            | Event::MouseButtonDown(_)
            | Event::MouseButtonUp(_)
            | Event::MouseDoubleClicked(_)
            | Event::JoystickButtonDown(_)
            | Event::JoystickButtonUp(_)
            | Event::JoystickMoved { .. } => {
                debug!("Game input {event:?}");
                self.last_input = Some(format!("{event:?}"));
                match event {
                    Event::MouseMoved { .. } => self.pan_hum(canvas, session),
                    Event::MouseButtonDown(MouseButton::ZUp) => self.change_hum_volume(session, true),
                    Event::MouseButtonDown(MouseButton::ZDown) => self.change_hum_volume(session, false),
                    _ => {}
                }
                WindowEventResult::Handled
            }
            _ => WindowEventResult::Ignored,
        }
    }

    fn render(&mut self, f: &mut Frame, canvas: &Canvas, session: &Session, theme: &Theme) {
        let area = canvas.rect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_colour))
            .title(Span::styled(
                format!(" Level {} ", session.level.unwrap_or(0)),
                Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD),
            ));

        let (dx, dy, dz) = session.mouse_delta;
        let hum = self
            .playing_hum(session)
            .and_then(|channel| session.digi.channel_volume(channel).map(|volume| (channel, volume)));
        let hum = match hum {
            Some((channel, (volume, scale))) => format!("channel {channel} at {volume}/{scale}"),
            None => "off".to_string(),
        };
        let viewport = &session.viewport;
        let scale = |v: i32| f64::from(v) / f64::from(F1_0);
        let label = Style::default().fg(theme.text_dim_colour);
        let value = Style::default().fg(theme.text_colour);

        let lines = vec![
            Line::from(vec![
                Span::styled("Music:    ", label),
                Span::styled(session.songs.now_playing().unwrap_or("(none)").to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Song:     ", label),
                Span::styled(
                    session
                        .songs
                        .is_playing()
                        .map_or_else(|| "-".to_string(), |song| song.to_string()),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Viewport: ", label),
                Span::styled(
                    format!(
                        "{}x{} scale {:.3} x {:.3}",
                        viewport.canvas_width,
                        viewport.canvas_height,
                        scale(viewport.window_scale.x),
                        scale(viewport.window_scale.y)
                    ),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Sound:    ", label),
                Span::styled(
                    format!(
                        "{} at {} Hz, {}/{} voices",
                        session.digi.backend_name(),
                        session.sample_rate,
                        session.digi.debug_voices(),
                        session.digi.max_channels()
                    ),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Hum:      ", label),
                Span::styled(hum, value),
            ]),
            Line::from(vec![
                Span::styled("Input:    ", label),
                Span::styled(self.last_input.clone().unwrap_or_default(), value),
            ]),
            Line::from(vec![
                Span::styled("Mouse:    ", label),
                Span::styled(format!("{dx} {dy} {dz} per tick"), value),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "[ ] change track   p pause   n/N next/previous level   e end level   h hum   x silence   Esc leave",
                label,
            )),
        ];

        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
