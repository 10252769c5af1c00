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


//! Command line flags.
//!
//! These are per-run switches; anything that should persist lives in
//! [`GameConfig`](crate::config::GameConfig) instead.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub(crate) enum Edition {
    #[value(name = "d1")]
    Descent1,
    #[default]
    #[value(name = "d2")]
    Descent2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub(crate) enum SoundSystem {
    #[default]
    Mixer,
    Plain,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Descent port layer: menus, input and music sequencing", version)]
pub(crate) struct RuntimeArgs {
    /// Disable all music
    #[arg(long)]
    pub(crate) nomusic: bool,

    /// Disable the mixing backend; only plain audio is available
    #[arg(long)]
    pub(crate) nosdlmixer: bool,

    /// Ignore the mouse entirely
    #[arg(long)]
    pub(crate) nomouse: bool,

    /// Never show the mouse cursor
    #[arg(long)]
    pub(crate) nocursor: bool,

    /// Directory searched for game data (repeatable, searched in order)
    #[arg(long = "data-dir", default_value = ".")]
    pub(crate) data_dirs: Vec<PathBuf>,

    /// Which game's music and CD rules apply
    #[arg(long, value_enum, default_value_t)]
    pub(crate) edition: Edition,

    /// Digital sound backend
    #[arg(long, value_enum, default_value_t)]
    pub(crate) sound_system: SoundSystem,

    /// File the log is written to
    #[arg(long, default_value = "dxxport.log")]
    pub(crate) log_file: PathBuf,
}

impl RuntimeArgs {
    /// The mixer is only usable when it was neither disabled nor deselected.
    pub(crate) fn mixer_available(&self) -> bool {
        !self.nosdlmixer && self.sound_system == SoundSystem::Mixer
    }
}

impl Default for RuntimeArgs {
    fn default() -> Self {
        Self {
            nomusic: false,
            nosdlmixer: false,
            nomouse: false,
            nocursor: false,
            data_dirs: vec![PathBuf::from(".")],
            edition: Edition::default(),
            sound_system: SoundSystem::default(),
            log_file: PathBuf::from("dxxport.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let args = RuntimeArgs::parse_from([
            "dxxport",
            "--nomusic",
            "--data-dir",
            "/games/d1",
            "--data-dir",
            "/games/missions",
            "--edition",
            "d1",
        ]);

        assert!(args.nomusic);
        assert!(!args.nosdlmixer);
        assert_eq!(args.edition, Edition::Descent1);
        assert_eq!(
            args.data_dirs,
            vec![PathBuf::from("/games/d1"), PathBuf::from("/games/missions")]
        );
    }

    #[test]
    fn mixer_needs_both_switches() {
        let mut args = RuntimeArgs::default();
        assert!(args.mixer_available());

        args.sound_system = SoundSystem::Plain;
        assert!(!args.mixer_available());

        args.sound_system = SoundSystem::Mixer;
        args.nosdlmixer = true;
        assert!(!args.mixer_available());
    }
}
