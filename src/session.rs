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

//! Shared game-side state.
//!
//! Everything a window handler may touch lives here and is passed to it
//! explicitly by the window stack. Handlers never open windows themselves;
//! they queue a [`MenuRequest`] that the event loop carries out once the
//! current dispatch has finished.

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    args::RuntimeArgs,
    config::{self, GameConfig},
    digi::Digi,
    songs::{SONG_TITLE, Songs},
    viewport::{self, Viewport},
};

/// Which setting a file browser writes its result into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BrowseTarget {
    LevelMusic,
    /// One of the fixed songs, by song number.
    Song(usize),
    CdRipDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MenuRequest {
    Options,
    Sound,
    Resolution,
    NewGame,
    Browse(BrowseTarget),
    MessageBox { title: String, text: String },
    ShowMenus,
    SaveConfig,
    Quit,
}

pub(crate) struct Session {
    pub(crate) config: GameConfig,
    pub(crate) args: RuntimeArgs,
    pub(crate) songs: Songs,
    pub(crate) digi: Digi,
    pub(crate) sample_rate: u32,
    pub(crate) viewport: Viewport,

    /// Pointer cell, updated before every mouse event is dispatched.
    pub(crate) pointer: (i32, i32),
    /// Mouse motion gathered over the last tick.
    pub(crate) mouse_delta: (i32, i32, i32),
    /// The level being played while the game view is up.
    pub(crate) level: Option<i32>,

    requests: Vec<MenuRequest>,
    focus_paused: bool,
}

impl Session {
    pub(crate) fn new(config: GameConfig, args: RuntimeArgs, songs: Songs, digi: Digi, sample_rate: u32) -> Self {
        let mut session = Self {
            config,
            args,
            songs,
            digi,
            sample_rate,
            viewport: viewport::start_frame(0, 0, viewport::F1_0),
            pointer: (0, 0),
            mouse_delta: (0, 0, 0),
            level: None,
            requests: Vec::new(),
            focus_paused: false,
        };
        session.apply_resolution();
        session.digi.set_digi_volume(session.config.digi_volume);
        session.digi.set_reverse_stereo(session.config.reverse_stereo);
        session
    }

    pub(crate) fn request(&mut self, request: MenuRequest) {
        debug!("Queued {request:?}");
        self.requests.push(request);
    }

    pub(crate) fn take_requests(&mut self) -> Vec<MenuRequest> {
        std::mem::take(&mut self.requests)
    }

    pub(crate) fn message_box(&mut self, title: &str, text: impl Into<String>) {
        self.request(MenuRequest::MessageBox {
            title: title.to_string(),
            text: text.into(),
        });
    }

    /// Hands the music part of the config to the sequencer.
    pub(crate) fn sync_music_settings(&mut self) {
        self.songs.apply_settings(self.config.music.clone());
    }

    /// Restarts music from scratch with the current settings: the level
    /// song while a game is running, the title song otherwise.
    pub(crate) fn replay_music(&mut self) {
        self.sync_music_settings();
        self.songs.uninit();
        match self.level {
            Some(level) => self.songs.play_level_song(level, 0),
            None => self.songs.play_song(SONG_TITLE, true),
        };
    }

    /// Recomputes the viewport for the configured screen mode.
    pub(crate) fn apply_resolution(&mut self) {
        let mode = self.config.resolution;
        let aspect = self.config.aspect;
        let screen_aspect = viewport::screen_aspect(mode.width, mode.height, aspect.width, aspect.height);
        self.viewport = viewport::start_frame(mode.width, mode.height, screen_aspect);
        info!(
            "Screen mode {}x{} aspect {}:{}{}",
            mode.width,
            mode.height,
            aspect.width,
            aspect.height,
            if self.config.windowed { " windowed" } else { "" }
        );
    }

    /// Pauses music while the terminal is out of focus. Only music paused
    /// here is resumed when focus comes back.
    pub(crate) fn focus_changed(&mut self, focused: bool) {
        if focused {
            if std::mem::take(&mut self.focus_paused) {
                debug!("Focus regained, resuming music");
                self.songs.resume();
            }
        } else if !self.focus_paused && self.songs.is_playing().is_some() {
            debug!("Focus lost, pausing music");
            self.songs.pause();
            self.focus_paused = true;
        }
    }

    pub(crate) fn start_game(&mut self, level: i32) {
        info!("Starting level {level}");
        self.level = Some(level);
        self.digi.reset();
        self.songs.play_level_song(level, 0);
    }

    pub(crate) fn end_game(&mut self) {
        if let Some(level) = self.level.take() {
            info!("Leaving level {level}");
        }
        self.songs.play_song(SONG_TITLE, true);
    }

    pub(crate) fn save(&self) -> Result<()> {
        config::save_config(&self.config).context("Failed to save configuration")
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use super::*;
    use crate::{
        args::{Edition, SoundSystem},
        player::testing::FakeMusic,
        songs::{MusicFlags, redbook::RipDirectoryCd},
        util::search_path::SearchPath,
    };

    /// A session over `dir` with a fake music player and an empty rip
    /// directory standing in for the CD.
    pub(crate) fn session(dir: &Path) -> (Session, FakeMusic) {
        let music = FakeMusic::default();
        let config = GameConfig::default();
        let args = RuntimeArgs::default();
        let songs = Songs::new(
            Edition::Descent2,
            MusicFlags::default(),
            SearchPath::new(vec![dir.to_path_buf()]),
            config.music.clone(),
            Box::new(music.clone()),
            Box::new(RipDirectoryCd::new("", None, music.clone())),
        );
        let digi = Digi::new(SoundSystem::Plain);

        (Session::new(config, args, songs, digi, 22050), music)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{config::ScreenMode, songs::SONG_FIRST_LEVEL_SONG};

    fn music_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("descent.hmp"), b"").unwrap();
        fs::write(dir.path().join("game01.hmp"), b"").unwrap();
        fs::write(dir.path().join("game02.hmp"), b"").unwrap();
        dir
    }

    #[test]
    fn requests_are_drained_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = testing::session(dir.path());

        session.request(MenuRequest::Sound);
        session.message_box("Warning", "text");

        assert_eq!(
            session.take_requests(),
            vec![
                MenuRequest::Sound,
                MenuRequest::MessageBox {
                    title: "Warning".into(),
                    text: "text".into()
                },
            ]
        );
        assert!(session.take_requests().is_empty());
    }

    #[test]
    fn replay_plays_title_outside_a_game() {
        let dir = music_dir();
        let (mut session, music) = testing::session(dir.path());

        session.replay_music();

        assert_eq!(session.songs.is_playing(), Some(SONG_TITLE));
        assert_eq!(music.play_count(), 1);
    }

    #[test]
    fn replay_plays_level_song_in_a_game() {
        let dir = music_dir();
        let (mut session, _) = testing::session(dir.path());

        session.start_game(1);
        session.replay_music();

        assert_eq!(session.songs.is_playing(), Some(SONG_FIRST_LEVEL_SONG));
    }

    #[test]
    fn ending_a_game_returns_to_title_music() {
        let dir = music_dir();
        let (mut session, _) = testing::session(dir.path());

        session.start_game(1);
        session.end_game();

        assert_eq!(session.level, None);
        assert_eq!(session.songs.is_playing(), Some(SONG_TITLE));
    }

    #[test]
    fn losing_focus_pauses_until_it_returns() {
        let dir = music_dir();
        let (mut session, music) = testing::session(dir.path());
        session.replay_music();

        session.focus_changed(false);
        assert!(music.is_paused());

        session.focus_changed(false);
        session.focus_changed(true);
        assert!(!music.is_paused());
    }

    #[test]
    fn regaining_focus_leaves_other_pauses_alone() {
        let dir = music_dir();
        let (mut session, music) = testing::session(dir.path());
        session.replay_music();
        session.songs.pause_resume();

        session.focus_changed(true);

        assert!(music.is_paused());
    }

    #[test]
    fn focus_loss_with_nothing_playing_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, music) = testing::session(dir.path());

        session.focus_changed(false);
        session.focus_changed(true);

        assert!(!music.is_paused());
    }

    #[test]
    fn resolution_drives_viewport() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = testing::session(dir.path());

        session.config.resolution = ScreenMode::new(800, 600);
        session.apply_resolution();

        assert_eq!(session.viewport.canvas_width, 800);
        assert_eq!(session.viewport.canv_h2, 300 << 16);
    }
}
