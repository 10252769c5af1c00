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

//! Events and the main event loop.
//!
//! Two kinds of event flow through the program:
//!
//! * [`AppEvent`]s arrive on the application channel from the input, tick and
//!   music worker threads and are handled one at a time by
//!   [`process_events`].
//! * Engine [`Event`]s are produced from raw input by the drivers in
//!   [`crate::input`] and offered to the window stack.

mod handlers;
pub(crate) mod key_handlers;

use handlers::*;

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{App, input::MouseButton, player::PlayerState, render::draw, songs::FinishedHook, window::Canvas};

/// An engine event, as seen by windows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    WindowCreated,
    WindowActivated,
    WindowDeactivated,
    WindowClose,
    Idle,

    KeyCommand(KeyEvent),

    MouseMoved { dx: i32, dy: i32, dz: i32 },
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    MouseDoubleClicked(MouseButton),

    JoystickButtonDown(usize),
    JoystickButtonUp(usize),
    JoystickMoved { axis: usize, value: i32 },
}

/// Somewhere input drivers can post engine events.
pub(crate) trait EventSink {
    fn send(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn send(&mut self, event: Event) {
        self.push(event);
    }
}

/// Screen area available to windows, one row is kept for the status line.
pub(crate) fn window_area(width: u16, height: u16) -> Canvas {
    Canvas::new(0, 0, width, height.saturating_sub(1))
}

#[derive(Debug)]
pub(crate) enum AppEvent {
    Terminal(crossterm::event::Event),

    PlayerStateChanged(PlayerState),
    TitleChanged(String),
    TimeChanged(f64),
    MusicFinished(FinishedHook),

    Tick,
    GameViewClosed,

    Error(String),
    FatalError(String),
}

pub(crate) fn process_events(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::Terminal(event) => handle_terminal_event(app, event),
            AppEvent::PlayerStateChanged(state) => handle_player_state_changed(app, state),
            AppEvent::TitleChanged(title) => handle_title_changed(app, title),
            AppEvent::TimeChanged(secs) => handle_time_changed(app, secs),
            AppEvent::MusicFinished(hook) => handle_music_finished(app, hook),
            AppEvent::Error(message) => handle_error(app, message),
            AppEvent::FatalError(message) => return Err(anyhow!(message)),
            AppEvent::Tick => handle_tick(app),
            AppEvent::GameViewClosed => handle_game_view_closed(app),
        }

        apply_requests(app)?;

        if app.quit {
            break;
        }

        terminal.draw(|f| draw(f, app))?;
    }
    Ok(())
}
