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

//! Mouse driver.
//!
//! Translates raw platform button and motion reports into engine events.
//! Platform buttons are 1-based and are remapped through a fixed table onto
//! the engine's semantic [`MouseButton`]s; anything past the end of the table
//! is dropped without touching state.
//!
//! Only relative motion is reported per event, the absolute pointer position
//! is accumulated here and read back with [`MouseInput::position`].

use log::debug;

use crate::{
    events::{Event, EventSink},
    timer::{F1_0, Fix64},
    window::{Canvas, WindowEventResult},
};

/// How far one wheel notch moves the virtual z axis.
pub(crate) const Z_SENSITIVITY: i32 = 100;

pub(crate) const MOUSE_MAX_BUTTONS: usize = 17;

const DOUBLE_CLICK_WINDOW: Fix64 = F1_0 / 5;
const CURSOR_IDLE_HIDE: Fix64 = F1_0 * 2;
const CURSOR_RESHOW_DELAY: Fix64 = F1_0 / 2;

/// Engine-level mouse buttons, in the engine's own numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MouseButton {
    Left,
    Right,
    Middle,
    ZUp,
    ZDown,
    PitchBackward,
    PitchForward,
    BankLeft,
    BankRight,
    HeadLeft,
    HeadRight,
    Button11,
    Button12,
    Button13,
    Button14,
    Button15,
    Button16,
}

impl MouseButton {
    fn index(self) -> usize {
        self as usize
    }
}

/// Platform button order differs from the engine's for the first three
/// buttons; wheel notches arrive as buttons 4 and 5.
const BUTTON_REMAP: [MouseButton; MOUSE_MAX_BUTTONS] = [
    MouseButton::Left,
    MouseButton::Middle,
    MouseButton::Right,
    MouseButton::ZUp,
    MouseButton::ZDown,
    MouseButton::PitchBackward,
    MouseButton::PitchForward,
    MouseButton::BankLeft,
    MouseButton::BankRight,
    MouseButton::HeadLeft,
    MouseButton::HeadRight,
    MouseButton::Button11,
    MouseButton::Button12,
    MouseButton::Button13,
    MouseButton::Button14,
    MouseButton::Button15,
    MouseButton::Button16,
];

/// A raw button report from the platform layer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawMouseButton {
    /// 1-based platform button number.
    pub(crate) button: u8,
    pub(crate) pressed: bool,
}

/// A raw relative motion report from the platform layer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawMouseMotion {
    pub(crate) xrel: i32,
    pub(crate) yrel: i32,
}

/// What the platform cursor should currently be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CursorVisibility {
    Shown,
    Hidden,
}

#[derive(Debug, Default, Clone, Copy)]
struct Deltas {
    x: i32,
    y: i32,
    z: i32,
    /// Cumulative wheel position.
    wheel: i32,
}

#[derive(Debug)]
pub(crate) struct MouseInput {
    enabled: bool,
    cursor_allowed: bool,

    deltas: Deltas,
    x: i32,
    y: i32,

    cursor_enabled: bool,
    cursor: CursorVisibility,
    cursor_time: Fix64,
    hidden_time: Fix64,
    time_last_pressed: [Fix64; MOUSE_MAX_BUTTONS],
}

impl MouseInput {
    /// Creates the mouse state.
    ///
    /// # Arguments
    ///
    /// * `enabled` - `false` turns both handlers into silent no-ops.
    /// * `cursor_allowed` - `false` keeps the cursor permanently hidden.
    pub(crate) fn new(enabled: bool, cursor_allowed: bool) -> Self {
        Self {
            enabled,
            cursor_allowed,
            deltas: Deltas::default(),
            x: 0,
            y: 0,
            cursor_enabled: false,
            cursor: CursorVisibility::Shown,
            cursor_time: 0,
            hidden_time: 0,
            time_last_pressed: [Fix64::MIN / 2; MOUSE_MAX_BUTTONS],
        }
    }

    /// Resets everything except the driver flags.
    pub(crate) fn init(&mut self) {
        *self = Self::new(self.enabled, self.cursor_allowed);
    }

    /// Restores the platform cursor on shutdown.
    pub(crate) fn close(&mut self) {
        self.cursor = CursorVisibility::Shown;
    }

    /// Handles a button press or release.
    ///
    /// A press on a wheel button first moves the virtual z axis and emits a
    /// motion event carrying only `dz`. Every press refreshes the button's
    /// last-press timestamp, and a second press inside a fifth of a time unit
    /// also emits a double-click after the button event.
    pub(crate) fn button_handler(
        &mut self,
        raw: RawMouseButton,
        now: Fix64,
        sink: &mut impl EventSink,
    ) {
        if !self.enabled {
            return;
        }

        let Some(index) = (raw.button as usize).checked_sub(1) else {
            return;
        };
        let Some(&button) = BUTTON_REMAP.get(index) else {
            return;
        };

        self.cursor_time = now;

        if raw.pressed {
            self.maybe_send_z_move(button, sink);
        }

        debug!(
            "Sending event {}, button {:?}, coords {},{},{}",
            if raw.pressed { "MOUSE_BUTTON_DOWN" } else { "MOUSE_BUTTON_UP" },
            button,
            self.x,
            self.y,
            self.deltas.wheel
        );
        sink.send(if raw.pressed {
            Event::MouseButtonDown(button)
        } else {
            Event::MouseButtonUp(button)
        });

        if raw.pressed {
            self.maybe_send_double_click(button, now, sink);
        }
    }

    /// Handles relative pointer motion.
    pub(crate) fn motion_handler(
        &mut self,
        raw: RawMouseMotion,
        now: Fix64,
        sink: &mut impl EventSink,
    ) {
        if !self.enabled {
            return;
        }

        self.cursor_time = now;
        self.x += raw.xrel;
        self.y += raw.yrel;
        self.deltas.x += raw.xrel;
        self.deltas.y += raw.yrel;

        sink.send(Event::MouseMoved {
            dx: raw.xrel,
            dy: raw.yrel,
            dz: 0,
        });
    }

    fn maybe_send_z_move(&mut self, button: MouseButton, sink: &mut impl EventSink) {
        let dz = match button {
            MouseButton::ZUp => Z_SENSITIVITY,
            MouseButton::ZDown => -Z_SENSITIVITY,
            _ => return,
        };

        self.deltas.z += dz;
        self.deltas.wheel += dz;
        sink.send(Event::MouseMoved { dx: 0, dy: 0, dz });
    }

    fn maybe_send_double_click(
        &mut self,
        button: MouseButton,
        now: Fix64,
        sink: &mut impl EventSink,
    ) {
        let when = &mut self.time_last_pressed[button.index()];
        let then = *when;
        *when = now;

        if now >= then + DOUBLE_CLICK_WINDOW {
            return;
        }

        debug!(
            "Sending event MOUSE_DOUBLE_CLICKED, button {:?}, coords {},{}",
            button, self.x, self.y
        );
        sink.send(Event::MouseDoubleClicked(button));
    }

    /// Clears pending deltas and resynchronises the absolute position, which
    /// relative polling cannot recover on its own.
    pub(crate) fn flush(&mut self, abs_x: i32, abs_y: i32) {
        self.deltas = Deltas::default();
        self.x = abs_x;
        self.y = abs_y;
    }

    pub(crate) fn position(&self) -> (i32, i32, i32) {
        (self.x, self.y, self.deltas.wheel)
    }

    /// Returns the motion accumulated since the last call and clears it.
    pub(crate) fn take_delta(&mut self) -> (i32, i32, i32) {
        let delta = (self.deltas.x, self.deltas.y, self.deltas.z);
        self.deltas.x = 0;
        self.deltas.y = 0;
        self.deltas.z = 0;
        delta
    }

    pub(crate) fn enable_cursor(&mut self) {
        self.change_cursor(true);
    }

    pub(crate) fn disable_cursor(&mut self) {
        self.change_cursor(false);
    }

    fn change_cursor(&mut self, activate: bool) {
        self.cursor_enabled = activate && self.enabled && self.cursor_allowed;
        if !self.cursor_enabled {
            self.cursor = CursorVisibility::Hidden;
        }
    }

    pub(crate) fn cursor(&self) -> CursorVisibility {
        self.cursor
    }

    /// Hides an enabled cursor after two idle time units and lets it back
    /// once the pointer moves, but not sooner than half a unit after hiding.
    pub(crate) fn cursor_autohide(&mut self, now: Fix64) -> CursorVisibility {
        if !self.cursor_enabled {
            self.cursor = CursorVisibility::Hidden;
            return self.cursor;
        }

        let recent = self.cursor_time + CURSOR_IDLE_HIDE >= now;
        match self.cursor {
            CursorVisibility::Shown if !recent => {
                self.hidden_time = now;
                self.cursor = CursorVisibility::Hidden;
            }
            CursorVisibility::Hidden if recent && self.hidden_time + CURSOR_RESHOW_DELAY < now => {
                self.cursor = CursorVisibility::Shown;
            }
            _ => {}
        }

        self.cursor
    }
}

/// Hit test for mouse events: `Handled` when `pointer` lies inside
/// `canvas`, `Ignored` otherwise so the event can bubble on.
pub(crate) fn in_window(pointer: (i32, i32), canvas: &Canvas) -> WindowEventResult {
    if canvas.contains(pointer.0, pointer.1) {
        WindowEventResult::Handled
    } else {
        WindowEventResult::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: u8) -> RawMouseButton {
        RawMouseButton {
            button,
            pressed: true,
        }
    }

    #[test]
    fn out_of_range_buttons_are_dropped_without_side_effects() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        for button in [0u8, 18, 19, 200, 255] {
            mouse.button_handler(press(button), F1_0 * 10, &mut events);
        }

        assert!(events.is_empty());
        assert_eq!(mouse.cursor_time, 0);
        assert_eq!(mouse.position(), (0, 0, 0));
    }

    #[test]
    fn platform_buttons_are_remapped() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        mouse.button_handler(press(2), 0, &mut events);
        mouse.button_handler(press(3), F1_0, &mut events);

        assert_eq!(
            events,
            vec![
                Event::MouseButtonDown(MouseButton::Middle),
                Event::MouseButtonDown(MouseButton::Right),
            ]
        );
    }

    #[test]
    fn wheel_press_emits_dz_before_button_event() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        mouse.button_handler(press(4), 0, &mut events);

        assert_eq!(
            events,
            vec![
                Event::MouseMoved {
                    dx: 0,
                    dy: 0,
                    dz: Z_SENSITIVITY
                },
                Event::MouseButtonDown(MouseButton::ZUp),
            ]
        );
        assert_eq!(mouse.position().2, Z_SENSITIVITY);
        assert_eq!(mouse.take_delta(), (0, 0, Z_SENSITIVITY));
        assert_eq!(mouse.take_delta(), (0, 0, 0));
    }

    #[test]
    fn quick_second_press_is_a_double_click() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        mouse.button_handler(press(1), F1_0, &mut events);
        mouse.button_handler(press(3), F1_0 + 10, &mut events);
        mouse.button_handler(press(1), F1_0 + F1_0 / 5 - 1, &mut events);

        assert_eq!(
            events.last(),
            Some(&Event::MouseDoubleClicked(MouseButton::Left))
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, Event::MouseDoubleClicked(_)))
                .count(),
            1
        );
    }

    #[test]
    fn slow_second_press_is_not_a_double_click() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        mouse.button_handler(press(1), F1_0, &mut events);
        mouse.button_handler(press(1), F1_0 + F1_0 / 5, &mut events);
        mouse.button_handler(press(1), F1_0 * 3, &mut events);

        assert!(
            !events
                .iter()
                .any(|e| matches!(e, Event::MouseDoubleClicked(_)))
        );
    }

    #[test]
    fn timestamp_is_refreshed_even_when_double_click_fires() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        mouse.button_handler(press(1), 0, &mut events);
        mouse.button_handler(press(1), 100, &mut events);
        mouse.button_handler(press(1), 200, &mut events);

        let doubles = events
            .iter()
            .filter(|e| matches!(e, Event::MouseDoubleClicked(_)))
            .count();
        assert_eq!(doubles, 2);
        assert_eq!(mouse.time_last_pressed[MouseButton::Left.index()], 200);
    }

    #[test]
    fn release_never_double_clicks() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        mouse.button_handler(press(1), 0, &mut events);
        mouse.button_handler(
            RawMouseButton {
                button: 1,
                pressed: false,
            },
            1,
            &mut events,
        );

        assert_eq!(events[1], Event::MouseButtonUp(MouseButton::Left));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn motion_reports_relative_and_accumulates_absolute() {
        let mut mouse = MouseInput::new(true, true);
        let mut events = Vec::new();

        mouse.motion_handler(RawMouseMotion { xrel: 3, yrel: -2 }, 0, &mut events);
        mouse.motion_handler(RawMouseMotion { xrel: 4, yrel: 5 }, 0, &mut events);

        assert_eq!(
            events[1],
            Event::MouseMoved {
                dx: 4,
                dy: 5,
                dz: 0
            }
        );
        assert_eq!(mouse.position(), (7, 3, 0));

        mouse.flush(40, 12);
        assert_eq!(mouse.position(), (40, 12, 0));
        assert_eq!(mouse.take_delta(), (0, 0, 0));
    }

    #[test]
    fn disabled_mouse_is_silent() {
        let mut mouse = MouseInput::new(false, true);
        let mut events = Vec::new();

        mouse.button_handler(press(1), 0, &mut events);
        mouse.motion_handler(RawMouseMotion { xrel: 1, yrel: 1 }, 0, &mut events);

        assert!(events.is_empty());
        assert_eq!(mouse.position(), (0, 0, 0));
    }

    #[test]
    fn pointer_hit_test_uses_canvas_bounds() {
        let mut mouse = MouseInput::new(true, true);
        mouse.flush(10, 5);
        let (x, y, _) = mouse.position();

        let inside = Canvas::new(8, 4, 10, 3);
        let outside = Canvas::new(11, 4, 10, 3);

        assert_eq!(in_window((x, y), &inside), WindowEventResult::Handled);
        assert_eq!(in_window((x, y), &outside), WindowEventResult::Ignored);
    }

    #[test]
    fn cursor_hides_when_idle_and_reshows_after_delay() {
        let mut mouse = MouseInput::new(true, true);
        mouse.enable_cursor();
        mouse.cursor = CursorVisibility::Shown;

        assert_eq!(mouse.cursor_autohide(F1_0), CursorVisibility::Shown);
        assert_eq!(mouse.cursor_autohide(F1_0 * 3), CursorVisibility::Hidden);

        // Movement right after hiding does not bring it straight back.
        let mut events = Vec::new();
        mouse.motion_handler(RawMouseMotion { xrel: 1, yrel: 0 }, F1_0 * 3, &mut events);
        assert_eq!(
            mouse.cursor_autohide(F1_0 * 3 + F1_0 / 4),
            CursorVisibility::Hidden
        );
        assert_eq!(
            mouse.cursor_autohide(F1_0 * 3 + F1_0 / 2 + 1),
            CursorVisibility::Shown
        );
    }

    #[test]
    fn nocursor_keeps_cursor_hidden() {
        let mut mouse = MouseInput::new(true, false);
        mouse.enable_cursor();

        assert_eq!(mouse.cursor_autohide(0), CursorVisibility::Hidden);
    }
}
