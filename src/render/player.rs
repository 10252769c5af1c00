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

//! Render the status line.
//!
//! Shows what the music player is doing, the active music type and both
//! volume levels.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    App,
    config::{MAX_VOLUME, MusicType},
    player::PlayerState,
    util,
};

const ICON_PLAY: &str = "\u{25B6}";
const ICON_PAUSE: &str = "\u{23F8}";
const ICON_STOP: &str = "\u{23F9}";

fn music_type_label(music_type: MusicType) -> &'static str {
    match music_type {
        MusicType::None => "no music",
        MusicType::Builtin => "built-in",
        MusicType::Redbook => "CD",
        MusicType::Custom => "jukebox",
    }
}

/// Renders the status line into `area`.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let session = &app.session;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(44)])
        .split(area);

    let icon = match app.player_state {
        PlayerState::Playing => ICON_PLAY,
        PlayerState::Paused => ICON_PAUSE,
        PlayerState::Stopped => ICON_STOP,
    };
    let title = app
        .player_track_name
        .as_deref()
        .or_else(|| session.songs.now_playing())
        .unwrap_or("");
    let time = app.player_time.map(util::format::format_time).unwrap_or_default();

    let track_line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().add_modifier(Modifier::BOLD)).fg(theme.text_colour),
        Span::styled(title.to_string(), Style::default().add_modifier(Modifier::BOLD)).fg(theme.accent_colour),
        Span::raw(" "),
        Span::styled(time, Style::default()).fg(theme.text_dim_colour),
    ]);
    f.render_widget(
        Paragraph::new(track_line).style(Style::default().bg(theme.status_colour)),
        chunks[0],
    );

    let levels = Line::from(vec![
        Span::styled(music_type_label(session.songs.music_type()), Style::default()).fg(theme.accent_colour),
        Span::raw("  fx "),
        Span::raw(util::format::volume_bar(session.digi.digi_volume(), MAX_VOLUME)),
        Span::raw("  music "),
        Span::raw(util::format::volume_bar(session.config.music.music_volume, MAX_VOLUME)),
        Span::raw(" "),
    ]);
    f.render_widget(
        Paragraph::new(levels)
            .alignment(Alignment::Right)
            .style(Style::default().bg(theme.status_colour).fg(theme.text_colour)),
        chunks[1],
    );
}
