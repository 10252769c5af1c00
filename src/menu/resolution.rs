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

//! Screen resolution menu.
//!
//! Nothing is applied until the menu closes. A custom resolution that
//! cannot be used is reported and the current mode kept.

use log::info;
use thiserror::Error;

use crate::{
    config::ScreenMode,
    menu::{Menu, MenuDelegate, MenuItem},
    session::Session,
};

const PRESETS: [ScreenMode; 8] = [
    ScreenMode::new(320, 200),
    ScreenMode::new(640, 480),
    ScreenMode::new(800, 600),
    ScreenMode::new(1024, 768),
    ScreenMode::new(1280, 720),
    ScreenMode::new(1280, 1024),
    ScreenMode::new(1600, 900),
    ScreenMode::new(1920, 1080),
];

const MIN_WIDTH: u16 = 320;
const MIN_HEIGHT: u16 = 200;

const GROUP_MODE: u8 = 0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolutionError {
    #[error("Entered resolution is bad.\nReverting ...")]
    Bad,

    #[error("Entered resolution is too small.\nReverting ...")]
    TooSmall,

    #[error("Aspect resolution is bad.\nIgnoring ...")]
    BadAspect,
}

fn gcd(a: u16, b: u16) -> u16 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Reduces `mode` to its simplest ratio.
pub(crate) fn reduce(mode: ScreenMode) -> ScreenMode {
    match gcd(mode.width, mode.height) {
        0 => mode,
        g => ScreenMode::new(mode.width / g, mode.height / g),
    }
}

/// Parses `WIDTHxHEIGHT`.
pub(crate) fn parse_mode(text: &str) -> Option<ScreenMode> {
    let (w, h) = text.split_once('x')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(w) || !digits(h) {
        return None;
    }
    Some(ScreenMode::new(w.parse().ok()?, h.parse().ok()?))
}

fn format_mode(mode: ScreenMode) -> String {
    format!("{}x{}", mode.width, mode.height)
}

/// A resolution and aspect worked out from the custom fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CustomMode {
    pub(crate) resolution: ScreenMode,
    pub(crate) aspect: ScreenMode,
    pub(crate) errors: Vec<ResolutionError>,
}

/// Checks the custom fields. A bad resolution falls back to `current`; a
/// bad aspect falls back to the resolution's own ratio.
pub(crate) fn custom_mode(resolution: &str, aspect: &str, current: ScreenMode) -> CustomMode {
    let mut errors = Vec::new();

    let resolution = match parse_mode(resolution) {
        None => {
            errors.push(ResolutionError::Bad);
            current
        }
        Some(mode) if mode.width < MIN_WIDTH || mode.height < MIN_HEIGHT => {
            errors.push(ResolutionError::TooSmall);
            current
        }
        Some(mode) => mode,
    };

    let aspect = parse_mode(aspect).unwrap_or_else(|| {
        errors.push(ResolutionError::BadAspect);
        resolution
    });

    CustomMode {
        resolution,
        aspect: reduce(aspect),
        errors,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolutionItem {
    Label,
    Preset(usize),
    Custom,
    CustomResolution,
    CustomAspect,
    Fullscreen,
}

pub(crate) struct ResolutionMenu {
    menu: Menu<ResolutionItem>,
}

impl ResolutionMenu {
    pub(crate) fn new(session: &Session) -> Self {
        let config = &session.config;
        let current = PRESETS
            .iter()
            .position(|mode| *mode == config.resolution && reduce(*mode) == config.aspect);

        let mut items: Vec<_> = PRESETS
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                MenuItem::radio(ResolutionItem::Preset(i), format_mode(*mode), GROUP_MODE, current == Some(i))
            })
            .collect();

        items.extend([
            MenuItem::text(ResolutionItem::Label, ""),
            MenuItem::radio(ResolutionItem::Custom, "use custom values", GROUP_MODE, current.is_none()),
            MenuItem::input(ResolutionItem::CustomResolution, "resolution", &format_mode(config.resolution)),
            MenuItem::input(ResolutionItem::CustomAspect, "aspect", &format_mode(config.aspect)),
            MenuItem::text(ResolutionItem::Label, ""),
            MenuItem::checkbox(ResolutionItem::Fullscreen, "Fullscreen", !config.windowed),
        ]);

        Self {
            menu: Menu::new("Screen Resolution", items),
        }
    }
}

impl MenuDelegate for ResolutionMenu {
    type Key = ResolutionItem;

    fn menu(&mut self) -> &mut Menu<ResolutionItem> {
        &mut self.menu
    }

    fn closing(&mut self, session: &mut Session) {
        session.config.windowed = !self.menu.checked(ResolutionItem::Fullscreen);

        match self.menu.radio_selected(GROUP_MODE) {
            Some(ResolutionItem::Custom) => {
                let chosen = custom_mode(
                    self.menu.input_value(ResolutionItem::CustomResolution).unwrap_or_default(),
                    self.menu.input_value(ResolutionItem::CustomAspect).unwrap_or_default(),
                    session.config.resolution,
                );
                for error in &chosen.errors {
                    session.message_box("Warning", error.to_string());
                }
                session.config.resolution = chosen.resolution;
                session.config.aspect = chosen.aspect;
            }
            Some(ResolutionItem::Preset(i)) => {
                if let Some(mode) = PRESETS.get(i) {
                    session.config.resolution = *mode;
                    session.config.aspect = reduce(*mode);
                }
            }
            _ => {}
        }

        info!("Resolution set to {}", format_mode(session.config.resolution));
        session.apply_resolution();
    }
}
