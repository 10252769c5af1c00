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

//! Joystick driver.
//!
//! Each opened stick gets a contiguous block of engine button and axis
//! numbers. Hats are exposed as four extra buttons per hat, placed after the
//! stick's real buttons.
//!
//! The driver is fed by the platform layer: whatever owns the device calls
//! [`JoystickInput::open`] and the raw button, axis and hat handlers, and the
//! engine events come out of the sink like any other input. A terminal has
//! no joystick source, so under the terminal host nothing feeds it and
//! [`InputDrivers`](crate::input::InputDrivers) only flushes and closes it.

use log::{debug, info};

use crate::events::{Event, EventSink};

pub(crate) const MAX_JOYSTICKS: usize = 8;
pub(crate) const MAX_AXES_PER_JOYSTICK: usize = 128;
pub(crate) const MAX_BUTTONS_PER_JOYSTICK: usize = 128;
pub(crate) const MAX_HATS_PER_JOYSTICK: usize = 4;

pub(crate) const JOY_MAX_AXES: usize = MAX_AXES_PER_JOYSTICK * MAX_JOYSTICKS;
pub(crate) const JOY_MAX_BUTTONS: usize = MAX_BUTTONS_PER_JOYSTICK * MAX_JOYSTICKS;

/// Hat direction bits as reported by the platform.
pub(crate) const HAT_UP: u8 = 0x01;
pub(crate) const HAT_RIGHT: u8 = 0x02;
pub(crate) const HAT_DOWN: u8 = 0x04;
pub(crate) const HAT_LEFT: u8 = 0x08;

const HAT_DIRECTIONS: [u8; 4] = [HAT_UP, HAT_RIGHT, HAT_DOWN, HAT_LEFT];

#[derive(Debug, Clone, Copy)]
pub(crate) struct RawJoyButton {
    pub(crate) which: usize,
    pub(crate) button: usize,
    pub(crate) pressed: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RawJoyAxis {
    pub(crate) which: usize,
    pub(crate) axis: usize,
    pub(crate) value: i16,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RawJoyHat {
    pub(crate) which: usize,
    pub(crate) hat: usize,
    pub(crate) value: u8,
}

#[derive(Debug, Clone, Copy, Default)]
struct Stick {
    button_base: usize,
    buttons: usize,
    axis_base: usize,
    axes: usize,
    hats: usize,
    hat_state: [u8; MAX_HATS_PER_JOYSTICK],
}

#[derive(Debug)]
pub(crate) struct JoystickInput {
    sticks: Vec<Stick>,
    button_state: Vec<bool>,
    axis_value: Vec<i32>,
    next_button: usize,
    next_axis: usize,
}

impl JoystickInput {
    pub(crate) fn new() -> Self {
        Self {
            sticks: Vec::new(),
            button_state: vec![false; JOY_MAX_BUTTONS],
            axis_value: vec![0; JOY_MAX_AXES],
            next_button: 0,
            next_axis: 0,
        }
    }

    /// Registers a stick, clamping its counts to the per-stick limits.
    ///
    /// Returns the platform index the stick answers to, or `None` once all
    /// slots are taken.
    pub(crate) fn open(&mut self, name: &str, buttons: usize, axes: usize, hats: usize) -> Option<usize> {
        if self.sticks.len() >= MAX_JOYSTICKS {
            return None;
        }

        let hats = hats.min(MAX_HATS_PER_JOYSTICK);
        let buttons = (buttons + hats * HAT_DIRECTIONS.len()).min(MAX_BUTTONS_PER_JOYSTICK);
        let axes = axes.min(MAX_AXES_PER_JOYSTICK);

        let stick = Stick {
            button_base: self.next_button,
            buttons,
            axis_base: self.next_axis,
            axes,
            hats,
            hat_state: [0; MAX_HATS_PER_JOYSTICK],
        };

        info!("Joystick {}: {} ({} axes, {} buttons, {} hats)", self.sticks.len(), name, axes, buttons, hats);

        self.next_button += buttons;
        self.next_axis += axes;
        self.sticks.push(stick);
        Some(self.sticks.len() - 1)
    }

    /// Forgets every stick.
    pub(crate) fn close(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn button_handler(&mut self, raw: RawJoyButton, sink: &mut impl EventSink) {
        let Some(stick) = self.sticks.get(raw.which) else {
            return;
        };
        let real_buttons = stick.buttons.saturating_sub(stick.hats * HAT_DIRECTIONS.len());
        if raw.button >= real_buttons {
            return;
        }

        let button = stick.button_base + raw.button;
        self.set_button(button, raw.pressed, sink);
    }

    /// Stores a new axis position, emitting a motion event only when the
    /// scaled value actually changed. Returns whether it did.
    pub(crate) fn axis_handler(&mut self, raw: RawJoyAxis, sink: &mut impl EventSink) -> bool {
        let Some(stick) = self.sticks.get(raw.which) else {
            return false;
        };
        if raw.axis >= stick.axes {
            return false;
        }

        let axis = stick.axis_base + raw.axis;
        let value = i32::from(raw.value) / 256;
        if self.axis_value[axis] == value {
            return false;
        }

        self.axis_value[axis] = value;
        debug!("Sending event EVENT_JOYSTICK_MOVED, axis: {axis}, value: {value}");
        sink.send(Event::JoystickMoved { axis, value });
        true
    }

    pub(crate) fn hat_handler(&mut self, raw: RawJoyHat, sink: &mut impl EventSink) {
        let Some(stick) = self.sticks.get_mut(raw.which) else {
            return;
        };
        if raw.hat >= stick.hats {
            return;
        }

        let old = stick.hat_state[raw.hat];
        stick.hat_state[raw.hat] = raw.value;

        let hat_base = stick.button_base + stick.buttons - stick.hats * HAT_DIRECTIONS.len()
            + raw.hat * HAT_DIRECTIONS.len();

        for (offset, direction) in HAT_DIRECTIONS.iter().enumerate() {
            let was = old & direction != 0;
            let is = raw.value & direction != 0;
            if was != is {
                self.set_button(hat_base + offset, is, sink);
            }
        }
    }

    fn set_button(&mut self, button: usize, pressed: bool, sink: &mut impl EventSink) {
        self.button_state[button] = pressed;
        debug!(
            "Sending event {}, button {}",
            if pressed { "EVENT_JOYSTICK_BUTTON_DOWN" } else { "EVENT_JOYSTICK_BUTTON_UP" },
            button
        );
        sink.send(if pressed {
            Event::JoystickButtonDown(button)
        } else {
            Event::JoystickButtonUp(button)
        });
    }

    pub(crate) fn is_pressed(&self, button: usize) -> bool {
        self.button_state.get(button).copied().unwrap_or(false)
    }

    pub(crate) fn axis(&self, axis: usize) -> i32 {
        self.axis_value.get(axis).copied().unwrap_or(0)
    }

    /// Releases all buttons and centres all axes without emitting events.
    pub(crate) fn flush(&mut self) {
        self.button_state.fill(false);
        self.axis_value.fill(0);
        for stick in &mut self.sticks {
            stick.hat_state = [0; MAX_HATS_PER_JOYSTICK];
        }
    }
}

impl Default for JoystickInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sticks() -> JoystickInput {
        let mut joy = JoystickInput::new();
        joy.open("pad", 10, 4, 1);
        joy.open("throttle", 2, 2, 0);
        joy
    }

    #[test]
    fn second_stick_buttons_follow_first_stick_block() {
        let mut joy = two_sticks();
        let mut events = Vec::new();

        joy.button_handler(RawJoyButton { which: 1, button: 1, pressed: true }, &mut events);

        // 10 real buttons plus 4 hat buttons on the first stick.
        assert_eq!(events, vec![Event::JoystickButtonDown(15)]);
        assert!(joy.is_pressed(15));
    }

    #[test]
    fn unknown_sticks_and_buttons_are_ignored() {
        let mut joy = two_sticks();
        let mut events = Vec::new();

        joy.button_handler(RawJoyButton { which: 5, button: 0, pressed: true }, &mut events);
        joy.button_handler(RawJoyButton { which: 0, button: 10, pressed: true }, &mut events);
        joy.hat_handler(RawJoyHat { which: 1, hat: 0, value: HAT_UP }, &mut events);

        assert!(events.is_empty());
    }

    #[test]
    fn axis_reports_only_changes() {
        let mut joy = two_sticks();
        let mut events = Vec::new();

        assert!(joy.axis_handler(RawJoyAxis { which: 0, axis: 2, value: 1024 }, &mut events));
        assert!(!joy.axis_handler(RawJoyAxis { which: 0, axis: 2, value: 1100 }, &mut events));
        assert!(joy.axis_handler(RawJoyAxis { which: 1, axis: 0, value: -512 }, &mut events));

        assert_eq!(
            events,
            vec![
                Event::JoystickMoved { axis: 2, value: 4 },
                Event::JoystickMoved { axis: 4, value: -2 },
            ]
        );
        assert_eq!(joy.axis(2), 4);
    }

    #[test]
    fn hat_transitions_press_and_release_virtual_buttons() {
        let mut joy = two_sticks();
        let mut events = Vec::new();

        joy.hat_handler(RawJoyHat { which: 0, hat: 0, value: HAT_UP | HAT_RIGHT }, &mut events);
        joy.hat_handler(RawJoyHat { which: 0, hat: 0, value: HAT_RIGHT }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::JoystickButtonDown(10),
                Event::JoystickButtonDown(11),
                Event::JoystickButtonUp(10),
            ]
        );
    }

    #[test]
    fn flush_releases_everything_silently() {
        let mut joy = two_sticks();
        let mut events = Vec::new();

        joy.button_handler(RawJoyButton { which: 0, button: 3, pressed: true }, &mut events);
        joy.axis_handler(RawJoyAxis { which: 0, axis: 0, value: 30000 }, &mut events);
        let before = events.len();

        joy.flush();

        assert_eq!(events.len(), before);
        assert!(!joy.is_pressed(3));
        assert_eq!(joy.axis(0), 0);
    }

    #[test]
    fn ninth_stick_is_refused() {
        let mut joy = JoystickInput::new();
        for i in 0..MAX_JOYSTICKS {
            assert_eq!(joy.open("stick", 1, 1, 0), Some(i));
        }
        assert_eq!(joy.open("stick", 1, 1, 0), None);
    }
}
