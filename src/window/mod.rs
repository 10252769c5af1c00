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


//! Window stack and event dispatch.
//!
//! A window is a canvas plus a handler that receives typed [`Event`]s and
//! answers with a [`WindowEventResult`]. Windows are kept back to front; the
//! front window is the last visible one. [`WindowStack::send`] offers an
//! event to the visible windows front to back until one handles it, asks to
//! close, or is modal.
//!
//! The context type `C` is whatever mutable state the handlers need; it is
//! passed alongside every event so handlers never reach for globals.

use std::fmt;

use log::debug;
use ratatui::{Frame, layout::Rect};

use crate::{events::Event, theme::Theme};

/// Upper bound on how many windows one [`WindowStack::hide_menus`] call will
/// hide.
pub(crate) const MAX_HIDDEN_MENUS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowEventResult {
    /// The window did not use the event; it may bubble to the next window.
    Ignored,
    Handled,
    /// The window is done; it is closed before dispatch returns.
    Close,
}

/// A rectangle in screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Canvas {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: u16,
    pub(crate) h: u16,
}

impl Canvas {
    pub(crate) const fn new(x: i32, y: i32, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub(crate) fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.x + i32::from(self.w) && py < self.y + i32::from(self.h)
    }

    pub(crate) fn rect(&self) -> Rect {
        Rect::new(self.x.max(0) as u16, self.y.max(0) as u16, self.w, self.h)
    }
}

/// How a window's canvas is derived from the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Fullscreen,
    Centered { width: u16, height: u16 },
}

impl Placement {
    pub(crate) fn resolve(self, screen: Canvas) -> Canvas {
        match self {
            Placement::Fullscreen => screen,
            Placement::Centered { width, height } => {
                let w = width.min(screen.w);
                let h = height.min(screen.h);
                Canvas::new(
                    screen.x + i32::from((screen.w - w) / 2),
                    screen.y + i32::from((screen.h - h) / 2),
                    w,
                    h,
                )
            }
        }
    }
}

/// The behaviour half of a window.
pub(crate) trait WindowHandler<C> {
    fn handle(&mut self, canvas: &Canvas, event: &Event, ctx: &mut C) -> WindowEventResult;

    fn render(&mut self, _f: &mut Frame, _canvas: &Canvas, _ctx: &C, _theme: &Theme) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct WindowId(u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type CloseHook = Box<dyn FnOnce()>;
type DefaultHandler<C> = Box<dyn FnMut(&Event, &mut C) -> WindowEventResult>;

pub(crate) struct Window<C> {
    id: WindowId,
    placement: Placement,
    canvas: Canvas,
    handler: Box<dyn WindowHandler<C>>,
    visible: bool,
    modal: bool,
    close_hooks: Vec<CloseHook>,
}

impl<C> Drop for Window<C> {
    fn drop(&mut self) {
        for hook in self.close_hooks.drain(..) {
            hook();
        }
    }
}

pub(crate) struct WindowStack<C> {
    /// Back to front.
    windows: Vec<Window<C>>,
    next_id: u64,
    screen: Canvas,
    hidden: Vec<WindowId>,
    default_handler: Option<DefaultHandler<C>>,
}

impl<C> WindowStack<C> {
    pub(crate) fn new(screen: Canvas) -> Self {
        Self {
            windows: Vec::new(),
            next_id: 1,
            screen,
            hidden: Vec::new(),
            default_handler: None,
        }
    }

    /// Installs the handler that sees events no window consumed.
    pub(crate) fn set_default_handler(
        &mut self,
        handler: impl FnMut(&Event, &mut C) -> WindowEventResult + 'static,
    ) {
        self.default_handler = Some(Box::new(handler));
    }

    /// Pushes a new visible window in front of everything else.
    ///
    /// The previous front window is deactivated, then the new window receives
    /// `WindowCreated` and `WindowActivated`.
    pub(crate) fn create(
        &mut self,
        placement: Placement,
        handler: impl WindowHandler<C> + 'static,
        ctx: &mut C,
    ) -> WindowId {
        let previous = self.front();

        let id = WindowId(self.next_id);
        self.next_id += 1;

        let canvas = placement.resolve(self.screen);
        debug!("Creating window {id} at {canvas:?}");
        self.windows.push(Window {
            id,
            placement,
            canvas,
            handler: Box::new(handler),
            visible: true,
            modal: false,
            close_hooks: Vec::new(),
        });

        if let Some(previous) = previous {
            self.send_to(previous, &Event::WindowDeactivated, ctx);
        }
        self.send_to(id, &Event::WindowCreated, ctx);
        self.send_to(id, &Event::WindowActivated, ctx);

        id
    }

    /// Registers a side effect that runs when the window is released.
    pub(crate) fn on_close(&mut self, id: WindowId, hook: impl FnOnce() + 'static) {
        if let Some(window) = self.get_mut(id) {
            window.close_hooks.push(Box::new(hook));
        }
    }

    /// Closes a window immediately.
    ///
    /// The window is deactivated if it was in front, receives `WindowClose`,
    /// is removed, and has its close hooks run. If the front changed the new
    /// front window is activated.
    pub(crate) fn close(&mut self, id: WindowId, ctx: &mut C) {
        let Some(position) = self.position(id) else {
            return;
        };

        let was_front = self.front() == Some(id);
        if was_front {
            self.notify(position, &Event::WindowDeactivated, ctx);
        }
        self.notify(position, &Event::WindowClose, ctx);

        // Removal drops the window, which runs its close hooks.
        debug!("Closing window {id}");
        self.windows.remove(position);
        self.hidden.retain(|hidden| *hidden != id);

        if was_front && let Some(front) = self.front() {
            self.send_to(front, &Event::WindowActivated, ctx);
        }
    }

    /// Closes every window, front first.
    pub(crate) fn close_all(&mut self, ctx: &mut C) {
        while let Some(window) = self.windows.last() {
            let id = window.id;
            self.close(id, ctx);
        }
    }

    #[cfg(test)]
    pub(crate) fn exists(&self, id: WindowId) -> bool {
        self.position(id).is_some()
    }

    /// The front-most visible window.
    pub(crate) fn front(&self) -> Option<WindowId> {
        self.windows.iter().rev().find(|w| w.visible).map(|w| w.id)
    }

    #[cfg(test)]
    pub(crate) fn is_visible(&self, id: WindowId) -> bool {
        self.get(id).is_some_and(|w| w.visible)
    }

    #[cfg(test)]
    pub(crate) fn is_modal(&self, id: WindowId) -> bool {
        self.get(id).is_some_and(|w| w.modal)
    }

    #[cfg(test)]
    pub(crate) fn canvas(&self, id: WindowId) -> Option<Canvas> {
        self.get(id).map(|w| w.canvas)
    }

    pub(crate) fn len(&self) -> usize {
        self.windows.len()
    }

    /// Shows or hides a window and returns the resulting front window.
    ///
    /// Activation events are only sent when the front window changes.
    pub(crate) fn set_visible(&mut self, id: WindowId, visible: bool, ctx: &mut C) -> Option<WindowId> {
        let previous = self.front();

        match self.get_mut(id) {
            Some(window) => window.visible = visible,
            None => return previous,
        }

        let front = self.front();
        if front != previous {
            if let Some(previous) = previous {
                self.send_to(previous, &Event::WindowDeactivated, ctx);
            }
            if let Some(front) = front {
                self.send_to(front, &Event::WindowActivated, ctx);
            }
        }

        self.front()
    }

    pub(crate) fn set_modal(&mut self, id: WindowId, modal: bool) {
        if let Some(window) = self.get_mut(id) {
            window.modal = modal;
        }
    }

    /// Offers `event` to the visible windows, front to back.
    ///
    /// Propagation stops at the first window that handles the event or asks
    /// to close, and at any modal window whatever it answered. When nothing
    /// consumed the event the default handler gets a go.
    pub(crate) fn send(&mut self, event: &Event, ctx: &mut C) -> WindowEventResult {
        let mut result = WindowEventResult::Ignored;

        let mut position = self.windows.len();
        while position > 0 {
            position -= 1;

            let Some(window) = self.windows.get(position) else {
                continue;
            };
            if !window.visible {
                continue;
            }
            let modal = window.modal;

            result = self.deliver(position, event, ctx);
            if result != WindowEventResult::Ignored || modal {
                break;
            }
        }

        if result == WindowEventResult::Ignored
            && let Some(default_handler) = self.default_handler.as_mut()
        {
            result = default_handler(event, ctx);
        }

        result
    }

    /// Sends an event to one window, bypassing propagation.
    pub(crate) fn send_to(&mut self, id: WindowId, event: &Event, ctx: &mut C) -> WindowEventResult {
        match self.position(id) {
            Some(position) => self.deliver(position, event, ctx),
            None => WindowEventResult::Ignored,
        }
    }

    fn deliver(&mut self, position: usize, event: &Event, ctx: &mut C) -> WindowEventResult {
        let id = self.windows[position].id;
        let result = self.notify(position, event, ctx);

        if result == WindowEventResult::Close {
            self.close(id, ctx);
        }

        result
    }

    /// Calls the handler without acting on its answer.
    fn notify(&mut self, position: usize, event: &Event, ctx: &mut C) -> WindowEventResult {
        let window = &mut self.windows[position];
        window.handler.handle(&window.canvas, event, ctx)
    }

    /// Hides the visible windows front to back so another screen can take
    /// over.
    ///
    /// Only the window that was in front is deactivated. Returns `false`
    /// without doing anything if a hidden group is already pending.
    pub(crate) fn hide_menus(&mut self, ctx: &mut C) -> bool {
        if !self.hidden.is_empty() {
            return false;
        }

        let previous = self.front();
        while self.hidden.len() < MAX_HIDDEN_MENUS {
            let Some(front) = self.front() else {
                break;
            };
            if let Some(window) = self.get_mut(front) {
                window.visible = false;
            }
            self.hidden.push(front);
        }

        if let Some(previous) = previous {
            self.send_to(previous, &Event::WindowDeactivated, ctx);
        }

        true
    }

    /// Restores the group hidden by [`hide_menus`](Self::hide_menus).
    ///
    /// The previously front window is shown first, so it is the only one
    /// that gets activated.
    pub(crate) fn show_menus(&mut self, ctx: &mut C) {
        for id in std::mem::take(&mut self.hidden) {
            self.set_visible(id, true, ctx);
        }
    }

    pub(crate) fn menus_hidden(&self) -> bool {
        !self.hidden.is_empty()
    }

    /// Recomputes every canvas for a new screen size.
    pub(crate) fn resize(&mut self, screen: Canvas) {
        self.screen = screen;
        for window in &mut self.windows {
            window.canvas = window.placement.resolve(screen);
        }
    }

    /// Draws the visible windows back to front.
    pub(crate) fn render(&mut self, f: &mut Frame, ctx: &C, theme: &Theme) {
        for window in self.windows.iter_mut().filter(|w| w.visible) {
            window.handler.render(f, &window.canvas, ctx, theme);
        }
    }

    fn position(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    #[cfg(test)]
    fn get(&self, id: WindowId) -> Option<&Window<C>> {
        self.windows.iter().find(|w| w.id == id)
    }

    fn get_mut(&mut self, id: WindowId) -> Option<&mut Window<C>> {
        self.windows.iter_mut().find(|w| w.id == id)
    }
}
