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

//! Device input translation.
//!
//! Raw platform reports go in, engine [`Event`]s come out through an
//! [`EventSink`]. Each driver owns its device state and has explicit
//! init/close entry points.
//!
//! The terminal reports absolute pointer cells, so [`InputDrivers`] turns
//! them into the relative motion the mouse driver expects, and maps terminal
//! buttons and wheel notches onto platform button numbers.

pub(crate) mod joystick;
pub(crate) mod keyboard;
pub(crate) mod mouse;

pub(crate) use mouse::MouseButton;

use crossterm::event::{self as term, MouseEventKind};

use crate::{
    events::EventSink,
    input::{
        joystick::JoystickInput,
        mouse::{MouseInput, RawMouseButton, RawMouseMotion},
    },
    timer::Fix64,
};

const RAW_LEFT: u8 = 1;
const RAW_MIDDLE: u8 = 2;
const RAW_RIGHT: u8 = 3;
const RAW_WHEEL_UP: u8 = 4;
const RAW_WHEEL_DOWN: u8 = 5;

pub(crate) struct InputDrivers {
    pub(crate) mouse: MouseInput,
    pub(crate) joystick: JoystickInput,
    last_pointer: Option<(i32, i32)>,
}

impl InputDrivers {
    pub(crate) fn new(mouse_enabled: bool, cursor_allowed: bool) -> Self {
        let mut mouse = MouseInput::new(mouse_enabled, cursor_allowed);
        mouse.init();
        mouse.enable_cursor();

        Self {
            mouse,
            joystick: JoystickInput::new(),
            last_pointer: None,
        }
    }

    /// Forgets held buttons and pending motion, e.g. when focus is lost.
    pub(crate) fn flush(&mut self) {
        let (x, y, _) = self.mouse.position();
        self.mouse.flush(x, y);
        self.joystick.flush();
    }

    pub(crate) fn close(&mut self) {
        self.mouse.close();
        self.joystick.close();
    }

    /// Translates one terminal event into engine events.
    pub(crate) fn translate(&mut self, event: term::Event, now: Fix64, sink: &mut impl EventSink) {
        match event {
            term::Event::Key(key) => keyboard::key_handler(key, sink),
            term::Event::Mouse(mouse) => self.translate_mouse(mouse, now, sink),
            term::Event::FocusLost => self.flush(),
            _ => {}
        }
    }

    fn translate_mouse(&mut self, event: term::MouseEvent, now: Fix64, sink: &mut impl EventSink) {
        let pointer = (i32::from(event.column), i32::from(event.row));
        match self.last_pointer {
            None => self.mouse.flush(pointer.0, pointer.1),
            Some((x, y)) if (x, y) != pointer => {
                let motion = RawMouseMotion {
                    xrel: pointer.0 - x,
                    yrel: pointer.1 - y,
                };
                self.mouse.motion_handler(motion, now, sink);
            }
            Some(_) => {}
        }
        self.last_pointer = Some(pointer);

        let button = |b: term::MouseButton| match b {
            term::MouseButton::Left => RAW_LEFT,
            term::MouseButton::Middle => RAW_MIDDLE,
            term::MouseButton::Right => RAW_RIGHT,
        };

        match event.kind {
            MouseEventKind::Down(b) => self.press(button(b), true, now, sink),
            MouseEventKind::Up(b) => self.press(button(b), false, now, sink),
            MouseEventKind::ScrollUp => self.notch(RAW_WHEEL_UP, now, sink),
            MouseEventKind::ScrollDown => self.notch(RAW_WHEEL_DOWN, now, sink),
            _ => {}
        }
    }

    fn press(&mut self, button: u8, pressed: bool, now: Fix64, sink: &mut impl EventSink) {
        self.mouse.button_handler(RawMouseButton { button, pressed }, now, sink);
    }

    fn notch(&mut self, button: u8, now: Fix64, sink: &mut impl EventSink) {
        self.press(button, true, now, sink);
        self.press(button, false, now, sink);
    }
}
