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

//! Menus.
//!
//! A [`Menu`] is a list of typed items addressed by a key type chosen by
//! each concrete menu, so handlers match on names instead of positions.
//! Concrete menus implement [`MenuDelegate`] and are put on the window stack
//! wrapped in a [`MenuWindow`].
//!
//! # Sub-modules
//!
//! * [`main_menu`]: The top-level menu; it cannot be closed.
//! * [`options`]: Entry point to the settings menus.
//! * [`sound`]: Effects and music settings.
//! * [`resolution`]: Screen mode selection.
//! * [`message_box`]: Modal notices.
//! * [`file_browser`]: Picking a file or directory.
//! * [`game_view`]: The in-game screen the menus are hidden behind.

pub(crate) mod file_browser;
pub(crate) mod game_view;
pub(crate) mod main_menu;
pub(crate) mod message_box;
pub(crate) mod options;
pub(crate) mod resolution;
pub(crate) mod sound;

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    events::Event,
    input::{MouseButton, mouse},
    session::Session,
    theme::Theme,
    util::format::volume_bar,
    window::{Canvas, Placement, WindowEventResult, WindowHandler},
};

pub(crate) enum ItemKind {
    /// A label; the cursor skips it.
    Text,
    Command,
    Checkbox(bool),
    /// One of a group of mutually exclusive options.
    Radio { group: u8, on: bool },
    Slider { value: u8, min: u8, max: u8 },
    Input(Input),
}

pub(crate) struct MenuItem<K> {
    pub(crate) key: K,
    pub(crate) label: String,
    pub(crate) kind: ItemKind,
}

impl<K> MenuItem<K> {
    pub(crate) fn text(key: K, label: impl Into<String>) -> Self {
        Self::new(key, label, ItemKind::Text)
    }

    pub(crate) fn command(key: K, label: impl Into<String>) -> Self {
        Self::new(key, label, ItemKind::Command)
    }

    pub(crate) fn checkbox(key: K, label: impl Into<String>, on: bool) -> Self {
        Self::new(key, label, ItemKind::Checkbox(on))
    }

    pub(crate) fn radio(key: K, label: impl Into<String>, group: u8, on: bool) -> Self {
        Self::new(key, label, ItemKind::Radio { group, on })
    }

    pub(crate) fn slider(key: K, label: impl Into<String>, value: u8, min: u8, max: u8) -> Self {
        Self::new(key, label, ItemKind::Slider { value: value.clamp(min, max), min, max })
    }

    pub(crate) fn input(key: K, label: impl Into<String>, value: &str) -> Self {
        Self::new(key, label, ItemKind::Input(Input::new(value.to_string())))
    }

    fn new(key: K, label: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
        }
    }

    fn selectable(&self) -> bool {
        !matches!(self.kind, ItemKind::Text)
    }

    fn prefix(&self) -> String {
        match &self.kind {
            ItemKind::Text | ItemKind::Command => String::new(),
            ItemKind::Checkbox(on) => (if *on { "[x] " } else { "[ ] " }).to_string(),
            ItemKind::Radio { on, .. } => (if *on { "(*) " } else { "( ) " }).to_string(),
            ItemKind::Slider { .. } => String::new(),
            ItemKind::Input(_) => format!("{}: ", self.label),
        }
    }

    fn line(&self) -> String {
        match &self.kind {
            ItemKind::Slider { value, min, max } => {
                format!("{} [{}]", self.label, volume_bar(value - min, max - min))
            }
            ItemKind::Input(input) => format!("{}{}", self.prefix(), input.value()),
            _ => format!("{}{}", self.prefix(), self.label),
        }
    }
}

/// What a menu made of an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuAction<K> {
    None,
    Moved,
    Changed(K),
    Selected(K),
    Close,
}

pub(crate) struct Menu<K> {
    title: String,
    items: Vec<MenuItem<K>>,
    state: ListState,
}

impl<K: Copy + Eq> Menu<K> {
    pub(crate) fn new(title: impl Into<String>, items: Vec<MenuItem<K>>) -> Self {
        let mut menu = Self {
            title: title.into(),
            items,
            state: ListState::default(),
        };
        let first = menu.items.iter().position(MenuItem::selectable);
        menu.state.select(first);
        menu
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn items(&self) -> &[MenuItem<K>] {
        &self.items
    }

    pub(crate) fn citem(&self) -> Option<usize> {
        self.state.selected()
    }

    pub(crate) fn current_key(&self) -> Option<K> {
        self.citem().and_then(|i| self.items.get(i)).map(|item| item.key)
    }

    /// Moves the cursor onto `key` if that item can take it.
    pub(crate) fn select_key(&mut self, key: K) {
        if let Some(index) = self.index(key)
            && self.items[index].selectable()
        {
            self.state.select(Some(index));
        }
    }

    /// Outer size including the border.
    pub(crate) fn size(&self) -> (u16, u16) {
        let widest = self
            .items
            .iter()
            .map(|item| item.line().chars().count())
            .chain(std::iter::once(self.title.chars().count()))
            .max()
            .unwrap_or(0);
        let width = (widest + 4).min(usize::from(u16::MAX)) as u16;
        let height = (self.items.len() + 2).min(usize::from(u16::MAX)) as u16;
        (width.max(24), height)
    }

    fn index(&self, key: K) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    fn item_mut(&mut self, key: K) -> Option<&mut MenuItem<K>> {
        self.items.iter_mut().find(|item| item.key == key)
    }

    pub(crate) fn checked(&self, key: K) -> bool {
        self.items.iter().find(|item| item.key == key).is_some_and(|item| match item.kind {
            ItemKind::Checkbox(on) | ItemKind::Radio { on, .. } => on,
            _ => false,
        })
    }

    pub(crate) fn set_checked(&mut self, key: K, value: bool) {
        let Some(index) = self.index(key) else {
            return;
        };
        match self.items[index].kind {
            ItemKind::Checkbox(ref mut on) => *on = value,
            ItemKind::Radio { group, .. } => {
                if value {
                    self.select_radio(index, group);
                } else if let ItemKind::Radio { ref mut on, .. } = self.items[index].kind {
                    *on = false;
                }
            }
            _ => {}
        }
    }

    /// The item switched on in a radio group.
    pub(crate) fn radio_selected(&self, group: u8) -> Option<K> {
        self.items.iter().find_map(|item| match item.kind {
            ItemKind::Radio { group: g, on: true } if g == group => Some(item.key),
            _ => None,
        })
    }

    fn select_radio(&mut self, index: usize, group: u8) {
        for (i, item) in self.items.iter_mut().enumerate() {
            if let ItemKind::Radio { group: g, ref mut on } = item.kind
                && g == group
            {
                *on = i == index;
            }
        }
    }

    pub(crate) fn slider_value(&self, key: K) -> Option<u8> {
        self.items.iter().find(|item| item.key == key).and_then(|item| match item.kind {
            ItemKind::Slider { value, .. } => Some(value),
            _ => None,
        })
    }

    pub(crate) fn set_slider(&mut self, key: K, new_value: u8) {
        if let Some(item) = self.item_mut(key)
            && let ItemKind::Slider { ref mut value, min, max } = item.kind
        {
            *value = new_value.clamp(min, max);
        }
    }

    pub(crate) fn input_value(&self, key: K) -> Option<&str> {
        self.items.iter().find(|item| item.key == key).and_then(|item| match &item.kind {
            ItemKind::Input(input) => Some(input.value()),
            _ => None,
        })
    }

    pub(crate) fn set_input(&mut self, key: K, value: &str) {
        if let Some(item) = self.item_mut(key)
            && let ItemKind::Input(ref mut input) = item.kind
            && input.value() != value
        {
            *input = Input::new(value.to_string());
        }
    }

    pub(crate) fn next(&mut self) {
        self.step(1);
    }

    pub(crate) fn previous(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, direction: isize) {
        let len = self.items.len();
        if len == 0 {
            return;
        }

        let start = self.citem().unwrap_or(0);
        let mut index = start;
        for _ in 0..len {
            index = (index as isize + direction).rem_euclid(len as isize) as usize;
            if self.items[index].selectable() {
                self.state.select(Some(index));
                return;
            }
        }
    }

    /// Toggles or runs the current item.
    fn activate(&mut self) -> MenuAction<K> {
        let Some(index) = self.citem() else {
            return MenuAction::None;
        };
        let key = self.items[index].key;

        match self.items[index].kind {
            ItemKind::Text => MenuAction::None,
            ItemKind::Command | ItemKind::Input(_) => MenuAction::Selected(key),
            ItemKind::Checkbox(ref mut on) => {
                *on = !*on;
                MenuAction::Changed(key)
            }
            ItemKind::Radio { group, on } => {
                if on {
                    return MenuAction::None;
                }
                self.select_radio(index, group);
                MenuAction::Changed(key)
            }
            ItemKind::Slider { .. } => MenuAction::None,
        }
    }

    fn nudge(&mut self, delta: i16) -> MenuAction<K> {
        let Some(index) = self.citem() else {
            return MenuAction::None;
        };
        let key = self.items[index].key;

        if let ItemKind::Slider { ref mut value, min, max } = self.items[index].kind {
            let next = (i16::from(*value) + delta).clamp(i16::from(min), i16::from(max)) as u8;
            if next != *value {
                *value = next;
                return MenuAction::Changed(key);
            }
        }
        MenuAction::None
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> MenuAction<K> {
        match key.code {
            KeyCode::Esc => return MenuAction::Close,
            KeyCode::Up | KeyCode::BackTab => {
                self.previous();
                return MenuAction::Moved;
            }
            KeyCode::Down | KeyCode::Tab => {
                self.next();
                return MenuAction::Moved;
            }
            KeyCode::Enter => return self.activate(),
            _ => {}
        }

        let Some(index) = self.citem() else {
            return MenuAction::None;
        };
        let item_key = self.items[index].key;

        match self.items[index].kind {
            ItemKind::Input(ref mut input) => match input.handle_event(&TermEvent::Key(key)) {
                Some(change) if change.value => MenuAction::Changed(item_key),
                Some(_) => MenuAction::Moved,
                None => MenuAction::None,
            },
            ItemKind::Slider { .. } => match key.code {
                KeyCode::Left => self.nudge(-1),
                KeyCode::Right => self.nudge(1),
                _ => MenuAction::None,
            },
            _ => match key.code {
                KeyCode::Char(' ') => self.activate(),
                _ => MenuAction::None,
            },
        }
    }

    /// Selects and activates the item on visible row `row` of the list.
    pub(crate) fn click(&mut self, row: usize) -> MenuAction<K> {
        let index = self.state.offset() + row;
        match self.items.get(index) {
            Some(item) if item.selectable() => {
                self.state.select(Some(index));
                self.activate()
            }
            _ => MenuAction::None,
        }
    }

    pub(crate) fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_colour))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let style = match item.kind {
                    ItemKind::Text => Style::default().fg(theme.text_dim_colour),
                    _ => Style::default().fg(theme.text_colour),
                };
                ListItem::new(Line::from(item.line()).style(style))
            })
            .collect();

        let list = List::new(rows)
            .block(block)
            .highlight_style(Style::default().bg(theme.highlight_colour).fg(Color::White));

        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut self.state);

        if let Some(index) = self.citem()
            && let Some(item) = self.items.get(index)
            && let ItemKind::Input(input) = &item.kind
        {
            let offset = index.saturating_sub(self.state.offset());
            let cursor_x = inner.x + (item.prefix().chars().count() + input.visual_cursor()) as u16;
            let cursor_y = inner.y + offset as u16;
            if cursor_y < inner.y + inner.height {
                f.set_cursor_position((cursor_x.min(inner.x + inner.width.saturating_sub(1)), cursor_y));
            }
        }
    }
}

/// The behaviour of one concrete menu.
pub(crate) trait MenuDelegate {
    type Key: Copy + Eq;

    fn menu(&mut self) -> &mut Menu<Self::Key>;

    fn changed(&mut self, _key: Self::Key, _session: &mut Session) {}

    /// Returns what the window should do next; by default the menu stays.
    fn selected(&mut self, _key: Self::Key, _session: &mut Session) -> WindowEventResult {
        WindowEventResult::Handled
    }

    /// Called whenever the menu comes to the front, so it can pick up
    /// settings changed elsewhere.
    fn activated(&mut self, _session: &mut Session) {}

    fn closing(&mut self, _session: &mut Session) {}

    fn allow_close(&self) -> bool {
        true
    }
}

/// Puts a [`MenuDelegate`] on the window stack.
pub(crate) struct MenuWindow<D>(pub(crate) D);

impl<D: MenuDelegate> MenuWindow<D> {
    pub(crate) fn placement(delegate: &mut D) -> Placement {
        let (width, height) = delegate.menu().size();
        Placement::Centered { width, height }
    }

    fn act(&mut self, action: MenuAction<D::Key>, session: &mut Session) -> WindowEventResult {
        match action {
            MenuAction::None => WindowEventResult::Ignored,
            MenuAction::Moved => WindowEventResult::Handled,
            MenuAction::Changed(key) => {
                self.0.changed(key, session);
                WindowEventResult::Handled
            }
            MenuAction::Selected(key) => self.0.selected(key, session),
            MenuAction::Close if self.0.allow_close() => WindowEventResult::Close,
            MenuAction::Close => WindowEventResult::Handled,
        }
    }
}

impl<D: MenuDelegate> WindowHandler<Session> for MenuWindow<D> {
    fn handle(&mut self, canvas: &Canvas, event: &Event, session: &mut Session) -> WindowEventResult {
        match event {
            Event::WindowActivated => {
                self.0.activated(session);
                WindowEventResult::Handled
            }
            Event::WindowClose => {
                self.0.closing(session);
                WindowEventResult::Handled
            }
            Event::KeyCommand(key) => {
                let action = self.0.menu().handle_key(*key);
                self.act(action, session)
            }
            Event::MouseButtonDown(MouseButton::Left) => {
                if mouse::in_window(session.pointer, canvas) == WindowEventResult::Ignored {
                    return WindowEventResult::Ignored;
                }
                // One border row above the first item.
                let row = session.pointer.1 - canvas.y - 1;
                if row < 0 {
                    return WindowEventResult::Handled;
                }
                let action = self.0.menu().click(row as usize);
                match self.act(action, session) {
                    WindowEventResult::Ignored => WindowEventResult::Handled,
                    result => result,
                }
            }
            Event::MouseButtonUp(MouseButton::Right) => self.act(MenuAction::Close, session),
            Event::MouseButtonDown(MouseButton::ZUp) => {
                self.0.menu().previous();
                WindowEventResult::Handled
            }
            Event::MouseButtonDown(MouseButton::ZDown) => {
                self.0.menu().next();
                WindowEventResult::Handled
            }
            _ => WindowEventResult::Ignored,
        }
    }

    fn render(&mut self, f: &mut Frame, canvas: &Canvas, _session: &Session, theme: &Theme) {
        self.0.menu().render(f, canvas.rect(), theme);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crossterm::event::{KeyEvent, KeyModifiers};

    pub(crate) fn key(code: crossterm::event::KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }
}
