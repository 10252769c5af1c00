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


//! Game configuration.
//!
//! Persistent settings are stored with `confy` under the application name;
//! a missing or unreadable file falls back to defaults.

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "dxxport";

/// Number of fixed songs with a custom-music override.
pub(crate) const MISC_MUSIC_SONGS: usize = 5;

pub(crate) const MAX_VOLUME: u8 = 8;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MusicType {
    None,
    #[default]
    Builtin,
    Redbook,
    Custom,
}

/// How level music is picked from a jukebox playlist.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum PlayOrder {
    /// Keep playing through the list, moving on when a new level starts.
    #[default]
    Continuous,
    /// One track per level, looped.
    Level,
    Random,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct MusicSettings {
    pub(crate) music_type: MusicType,
    pub(crate) music_volume: u8,
    /// Play CD tracks in the order of the original disc.
    pub(crate) orig_track_order: bool,
    /// Directory or `.m3u` playlist used for level music.
    pub(crate) level_music_path: String,
    pub(crate) level_music_order: PlayOrder,
    /// Per-song files for title, briefing, end-level, end-game and credits.
    pub(crate) misc_music: [String; MISC_MUSIC_SONGS],
    /// Directory of ripped CD tracks standing in for an audio CD.
    pub(crate) cd_rip_dir: String,
    /// Disc id reported for the ripped CD.
    pub(crate) cd_disc_id: Option<u32>,
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            music_type: MusicType::Builtin,
            music_volume: 8,
            orig_track_order: false,
            level_music_path: String::new(),
            level_music_order: PlayOrder::Continuous,
            misc_music: Default::default(),
            cd_rip_dir: String::new(),
            cd_disc_id: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenMode {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl ScreenMode {
    pub(crate) const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct GameConfig {
    pub(crate) version: u32,
    pub(crate) music: MusicSettings,
    pub(crate) digi_volume: u8,
    pub(crate) reverse_stereo: bool,
    pub(crate) resolution: ScreenMode,
    /// Aspect ratio as (width, height), kept reduced.
    pub(crate) aspect: ScreenMode,
    pub(crate) windowed: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: 1,
            music: MusicSettings::default(),
            digi_volume: 8,
            reverse_stereo: false,
            resolution: ScreenMode::new(640, 480),
            aspect: ScreenMode::new(4, 3),
            windowed: false,
        }
    }
}

pub(crate) fn load_config() -> GameConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub(crate) fn save_config(cfg: &GameConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dxxport.toml");

        let mut cfg = GameConfig::default();
        cfg.music.music_type = MusicType::Custom;
        cfg.music.misc_music[0] = "/music/title.ogg".into();
        cfg.music.cd_disc_id = Some(0xde0feb0e);

        confy::store_path(&path, &cfg).unwrap();
        let loaded: GameConfig = confy::load_path(&path).unwrap();

        assert_eq!(loaded, cfg);
    }
}
