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

use anyhow::Result;
use crossterm::event::Event as TermEvent;
use log::{debug, warn};

use crate::{
    App,
    events::{AppEvent, Event, window_area},
    menu::{
        MenuWindow, file_browser::FileBrowser, game_view::GameView, message_box::MessageBox, options::OptionsMenu,
        resolution::ResolutionMenu, sound::SoundMenu,
    },
    player::PlayerState,
    session::MenuRequest,
    songs::FinishedHook,
    window::Placement,
};

pub(super) fn handle_terminal_event(app: &mut App, event: TermEvent) {
    match event {
        TermEvent::Resize(width, height) => {
            app.windows.resize(window_area(width, height));
            return;
        }
        TermEvent::FocusGained => app.session.focus_changed(true),
        TermEvent::FocusLost => app.session.focus_changed(false),
        _ => {}
    }

    let mut events = Vec::new();
    app.input.translate(event, app.timer.query(), &mut events);

    let (x, y, _) = app.input.mouse.position();
    app.session.pointer = (x, y);

    for event in &events {
        app.windows.send(event, &mut app.session);
    }
}

pub(super) fn handle_player_state_changed(app: &mut App, state: PlayerState) {
    app.player_state = state;
    if state == PlayerState::Stopped {
        app.player_track_name = None;
        app.player_time = None;
    }
}

pub(super) fn handle_title_changed(app: &mut App, title: String) {
    app.player_track_name = Some(title);
}

pub(super) fn handle_time_changed(app: &mut App, seconds: f64) {
    app.player_time = Some(seconds as u64);
}

pub(super) fn handle_music_finished(app: &mut App, hook: FinishedHook) {
    app.session.songs.track_finished(hook);
}

pub(super) fn handle_error(app: &mut App, message: String) {
    warn!("{message}");
    app.session.message_box("Error", message);
}

pub(super) fn handle_game_view_closed(app: &mut App) {
    app.input.mouse.enable_cursor();
}

pub(super) fn handle_tick(app: &mut App) {
    app.input.mouse.cursor_autohide(app.timer.query());
    app.session.mouse_delta = app.input.mouse.take_delta();
    app.windows.send(&Event::Idle, &mut app.session);

    let frames = app.session.sample_rate / 4;
    app.session.digi.advance(frames);
}

/// Carries out the window requests queued by handlers.
///
/// Opening a window can queue further requests, so this keeps going until
/// the queue is empty.
pub(super) fn apply_requests(app: &mut App) -> Result<()> {
    loop {
        let requests = app.session.take_requests();
        if requests.is_empty() {
            return Ok(());
        }

        for request in requests {
            debug!("Applying {request:?} over {} windows", app.windows.len());
            apply_request(app, request);
        }
    }
}

fn apply_request(app: &mut App, request: MenuRequest) {
    let windows = &mut app.windows;
    let session = &mut app.session;

    match request {
        MenuRequest::Options => {
            let mut menu = OptionsMenu::new();
            let placement = MenuWindow::placement(&mut menu);
            windows.create(placement, MenuWindow(menu), session);
        }
        MenuRequest::Sound => {
            let mut menu = SoundMenu::new(session);
            let placement = MenuWindow::placement(&mut menu);
            windows.create(placement, MenuWindow(menu), session);
        }
        MenuRequest::Resolution => {
            let mut menu = ResolutionMenu::new(session);
            let placement = MenuWindow::placement(&mut menu);
            windows.create(placement, MenuWindow(menu), session);
        }
        MenuRequest::NewGame => {
            if windows.hide_menus(session) {
                let id = windows.create(Placement::Fullscreen, GameView::new(), session);
                let tx = app.event_tx.clone();
                windows.on_close(id, move || {
                    let _ = tx.send(AppEvent::GameViewClosed);
                });
                app.input.mouse.disable_cursor();
                session.start_game(1);
            }
        }
        MenuRequest::Browse(target) => {
            let browser = FileBrowser::new(target, session);
            windows.create(FileBrowser::placement(), browser, session);
        }
        MenuRequest::MessageBox { title, text } => {
            let message = MessageBox::new(&title, &text);
            let id = windows.create(message.placement(), message, session);
            windows.set_modal(id, true);
        }
        MenuRequest::ShowMenus => windows.show_menus(session),
        MenuRequest::SaveConfig => {
            if let Err(e) = session.save() {
                warn!("{e:#}");
                session.message_box("Error", format!("Could not save settings:\n{e}"));
            }
        }
        MenuRequest::Quit => app.quit = true,
    }
}
