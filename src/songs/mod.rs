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


//! Music sequencing.
//!
//! [`Songs`] decides what plays when: the fixed songs (title, briefing,
//! end-level, end-game, credits), the per-level songs, CD tracks and jukebox
//! tracks. It owns all playback state and talks to the outside world only
//! through the [`MusicBackend`] and [`RedbookBackend`] traits.
//!
//! Nothing here reports errors to callers. A missing file, an absent backend
//! or an out-of-range track leaves the sequencer either playing what it was
//! playing or playing nothing, and callers find out through
//! [`Songs::is_playing`].
//!
//! Backends report the end of a sequence with the [`FinishedHook`] they were
//! given; the main loop hands it back to [`Songs::track_finished`].

pub(crate) mod jukebox;
pub(crate) mod redbook;
pub(crate) mod registry;

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::{
    args::Edition,
    config::{MusicSettings, MusicType, PlayOrder},
    player::MusicBackend,
    songs::{
        jukebox::Jukebox,
        redbook::{RedbookBackend, is_known_disc},
        registry::{SongRegistry, playable_extension},
    },
    util::{format::file_label, search_path::SearchPath},
};

pub(crate) const SONG_TITLE: usize = 0;
pub(crate) const SONG_BRIEFING: usize = 1;
pub(crate) const SONG_ENDLEVEL: usize = 2;
pub(crate) const SONG_ENDGAME: usize = 3;
pub(crate) const SONG_CREDITS: usize = 4;
pub(crate) const SONG_FIRST_LEVEL_SONG: usize = 5;

const D2_REDBOOK_TITLE_TRACK: u32 = 2;
const D2_REDBOOK_CREDITS_TRACK: u32 = 3;

/// What to do when a backend reaches the end of what it was told to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FinishedHook {
    /// Play the same CD track again.
    RedbookRepeat,
    /// Start over from the first level's CD track.
    RedbookFirstSong,
    /// Move on to the credits song, looped.
    PlayCredits,
    /// Play the next jukebox track.
    JukeboxNext,
}

/// Run-time switches that limit which music types are usable.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MusicFlags {
    pub(crate) nomusic: bool,
    pub(crate) nosdlmixer: bool,
}

pub(crate) struct Songs {
    edition: Edition,
    flags: MusicFlags,
    search: SearchPath,
    settings: MusicSettings,

    /// The music type actually in effect after the run-time switches.
    music_type: MusicType,
    registry: SongRegistry,
    initialized: bool,

    song_playing: Option<usize>,
    redbook_playing: u32,
    last_level_song: Option<usize>,
    now_playing: Option<String>,

    jukebox: Jukebox,
    music: Box<dyn MusicBackend>,
    redbook: Box<dyn RedbookBackend>,
}

impl Songs {
    pub(crate) fn new(
        edition: Edition,
        flags: MusicFlags,
        search: SearchPath,
        settings: MusicSettings,
        music: Box<dyn MusicBackend>,
        redbook: Box<dyn RedbookBackend>,
    ) -> Self {
        Self {
            edition,
            flags,
            search,
            music_type: settings.music_type,
            settings,
            registry: SongRegistry::default(),
            initialized: false,
            song_playing: None,
            redbook_playing: 0,
            last_level_song: None,
            now_playing: None,
            jukebox: Jukebox::new(),
            music,
            redbook,
        }
    }

    fn mixer(&self) -> bool {
        !self.flags.nosdlmixer
    }

    /// Re-reads the song registry and applies the run-time switches.
    ///
    /// Runs before every play request so manifest and settings changes are
    /// always picked up.
    fn init(&mut self) {
        self.registry = SongRegistry::load(&self.search, self.edition, self.mixer());

        self.music_type = self.settings.music_type;
        if self.flags.nomusic {
            self.music_type = MusicType::None;
        }
        if self.flags.nosdlmixer && matches!(self.music_type, MusicType::Builtin | MusicType::Custom) {
            self.music_type = MusicType::None;
        }

        match self.music_type {
            MusicType::Redbook => {
                self.redbook.configure(&self.settings.cd_rip_dir, self.settings.cd_disc_id);
                self.redbook.init();
            }
            MusicType::Custom => {
                self.jukebox.load(&self.settings.level_music_path);
            }
            MusicType::Builtin | MusicType::None => {}
        }

        self.set_volume(self.settings.music_volume);
        self.initialized = true;
    }

    /// Stops everything and forgets the registry and jukebox list.
    pub(crate) fn uninit(&mut self) {
        self.stop_all();
        self.jukebox.unload();
        self.registry = SongRegistry::default();
        self.initialized = false;
    }

    pub(crate) fn settings(&self) -> &MusicSettings {
        &self.settings
    }

    /// Replaces the settings. Nothing restarts until the next play request.
    pub(crate) fn apply_settings(&mut self, settings: MusicSettings) {
        self.settings = settings;
    }

    pub(crate) fn music_type(&self) -> MusicType {
        self.music_type
    }

    pub(crate) fn is_playing(&self) -> Option<usize> {
        self.song_playing
    }

    pub(crate) fn redbook_playing(&self) -> u32 {
        self.redbook_playing
    }

    pub(crate) fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub(crate) fn jukebox(&self) -> &Jukebox {
        &self.jukebox
    }

    pub(crate) fn set_volume(&mut self, volume: u8) {
        self.settings.music_volume = volume;
        self.music.set_volume(volume);
        if self.music_type == MusicType::Redbook {
            self.redbook.set_volume(volume);
        }
    }

    pub(crate) fn stop_all(&mut self) {
        if self.music_type == MusicType::Redbook {
            self.redbook.stop();
        }
        self.music.stop();
        self.song_playing = None;
        self.now_playing = None;
    }

    pub(crate) fn pause(&mut self) {
        self.music.pause();
        if self.music_type == MusicType::Redbook {
            self.redbook.pause();
        }
    }

    pub(crate) fn resume(&mut self) {
        self.music.resume();
        if self.music_type == MusicType::Redbook {
            self.redbook.resume();
        }
    }

    pub(crate) fn pause_resume(&mut self) {
        if self.music_type == MusicType::Redbook {
            self.redbook.pause_resume();
        } else {
            self.music.pause_resume();
        }
    }

    /// Whether CD tracks follow the original disc layout: either the user
    /// said so, or the disc in use is a known original.
    pub(crate) fn have_cd(&self) -> bool {
        if self.settings.orig_track_order {
            return true;
        }
        if self.music_type != MusicType::Redbook {
            return false;
        }
        is_known_disc(self.edition, self.redbook.disc_id())
    }

    /// First CD track holding level music.
    fn first_level_track(&self) -> u32 {
        match (self.have_cd(), self.edition) {
            (false, _) => 1,
            (true, Edition::Descent1) => 6,
            (true, Edition::Descent2) => 4,
        }
    }

    /// Plays one music file, picking the player by extension.
    ///
    /// Whatever was playing is stopped first, even if the new file then
    /// fails to play.
    pub(crate) fn play_file(&mut self, name: &str, repeat: bool, on_finished: Option<FinishedHook>) -> bool {
        self.stop_all();

        if !self.mixer() || !playable_extension(name, true) {
            return false;
        }

        let path = self
            .search
            .resolve(name)
            .or_else(|| Path::new(name).is_file().then(|| PathBuf::from(name)));
        let Some(path) = path else {
            debug!("Music file {name} not found");
            return false;
        };

        if !self.music.play(vec![path], repeat, on_finished) {
            return false;
        }

        self.now_playing = Some(file_label(name));
        true
    }

    /// Plays one of the fixed songs.
    ///
    /// Returns the song now playing, which is only `songnum` if playback
    /// actually started.
    pub(crate) fn play_song(&mut self, songnum: usize, repeat: bool) -> Option<usize> {
        self.init();
        if !self.initialized {
            return None;
        }

        match self.music_type {
            MusicType::Builtin => {
                // Keep the level song going when there is no end-level song.
                if self.level_song_playing()
                    && songnum == SONG_ENDLEVEL
                    && !self.registry.get(songnum).is_some_and(|f| self.search.exists(f))
                {
                    return self.song_playing;
                }

                match self.registry.get(songnum).map(str::to_owned) {
                    Some(file) => {
                        if self.play_file(&file, repeat, None) {
                            self.song_playing = Some(songnum);
                        }
                    }
                    None => {
                        debug!("No song {songnum} in the registry");
                        self.stop_all();
                    }
                }
            }
            MusicType::Redbook => match self.edition {
                Edition::Descent1 => self.play_redbook_song_d1(songnum, repeat),
                Edition::Descent2 => self.play_redbook_song_d2(songnum, repeat),
            },
            MusicType::Custom => {
                let file = self.settings.misc_music.get(songnum).cloned().unwrap_or_default();
                if self.level_song_playing() && songnum == SONG_ENDLEVEL && file.is_empty() {
                    return self.song_playing;
                }

                // With the original CD order the title runs once and then
                // hands over to the credits song.
                let chain_credits =
                    self.edition == Edition::Descent2 && songnum == SONG_TITLE && self.settings.orig_track_order;
                let (repeat, hook) = if chain_credits {
                    (false, Some(FinishedHook::PlayCredits))
                } else {
                    (repeat, None)
                };

                self.song_playing = None;
                if self.play_file(&file, repeat, hook) {
                    self.song_playing = Some(songnum);
                }
            }
            MusicType::None => self.song_playing = None,
        }

        self.song_playing
    }

    fn level_song_playing(&self) -> bool {
        self.song_playing.is_some_and(|s| s >= SONG_FIRST_LEVEL_SONG)
    }

    fn play_redbook_song_d1(&mut self, songnum: usize, repeat: bool) {
        let num_tracks = self.redbook.track_count() as usize;
        let hook = repeat.then_some(FinishedHook::RedbookRepeat);

        self.song_playing = None;

        // The end-game song is always the last track.
        let track = if songnum < SONG_ENDGAME && songnum + 2 <= num_tracks {
            Some(songnum + 2)
        } else if songnum == SONG_ENDGAME {
            Some(num_tracks)
        } else if songnum > SONG_ENDGAME && songnum + 1 <= num_tracks {
            Some(songnum + 1)
        } else {
            None
        };

        if let Some(track) = track
            && self.play_redbook_track(track as u32, hook)
        {
            self.song_playing = Some(songnum);
        }
    }

    fn play_redbook_song_d2(&mut self, songnum: usize, repeat: bool) {
        let num_tracks = self.redbook.track_count();
        let hook = repeat.then_some(FinishedHook::PlayCredits);

        // Unavailable songs leave the current music playing.
        let track = match songnum {
            SONG_TITLE if D2_REDBOOK_TITLE_TRACK <= num_tracks => Some(D2_REDBOOK_TITLE_TRACK),
            SONG_CREDITS if D2_REDBOOK_CREDITS_TRACK <= num_tracks => Some(D2_REDBOOK_CREDITS_TRACK),
            _ => None,
        };

        if let Some(track) = track
            && self.play_redbook_track(track, hook)
        {
            self.song_playing = Some(songnum);
        }
    }

    fn play_redbook_track(&mut self, track: u32, hook: Option<FinishedHook>) -> bool {
        if !self.redbook.play_tracks(track, track, hook) {
            return false;
        }
        self.redbook_playing = track;
        self.now_playing = Some(format!("CD track {track}"));
        true
    }

    /// Plays level music.
    ///
    /// With `offset == 0` the song is chosen from `levelnum` (negative for
    /// secret levels); asking for the song that is already playing does
    /// nothing. A non-zero `offset` steps forwards or backwards from the
    /// current track, wrapping around.
    pub(crate) fn play_level_song(&mut self, levelnum: i32, offset: i32) -> Option<usize> {
        if levelnum == 0 {
            warn!("Level song requested for level 0");
            return self.song_playing;
        }

        self.init();
        if !self.initialized {
            return None;
        }

        let songnum = if levelnum > 0 { levelnum - 1 } else { -levelnum } as usize;

        match self.music_type {
            MusicType::Builtin => {
                if offset != 0 {
                    return self.song_playing;
                }

                let level_songs = self.registry.level_songs();
                if level_songs == 0 {
                    self.stop_all();
                } else {
                    let target = SONG_FIRST_LEVEL_SONG + songnum % level_songs;
                    if self.song_playing == Some(target) {
                        return self.song_playing;
                    }

                    self.song_playing = None;
                    if let Some(file) = self.registry.get(target).map(str::to_owned)
                        && self.play_file(&file, true, None)
                    {
                        self.song_playing = Some(target);
                    }
                }
            }
            MusicType::Redbook => {
                if offset == 0 && self.song_playing == Some(songnum + SONG_FIRST_LEVEL_SONG) {
                    return self.song_playing;
                }
                self.play_redbook_level_song(songnum, offset);
            }
            MusicType::Custom => {
                if offset == 0
                    && self.settings.level_music_order == PlayOrder::Continuous
                    && self.level_song_playing()
                {
                    return self.song_playing;
                }
                self.play_jukebox_level_song(songnum, offset);
            }
            MusicType::None => self.song_playing = None,
        }

        // Descent 1 goes quiet rather than keep playing the wrong song.
        if self.edition == Edition::Descent1 && self.song_playing.is_none() {
            self.stop_all();
        }

        self.song_playing
    }

    fn play_redbook_level_song(&mut self, songnum: usize, offset: i32) {
        let n_tracks = i64::from(self.redbook.track_count());
        let first = i64::from(self.first_level_track());

        let track = if offset == 0 {
            // Descent II has one more level song than it has level tracks.
            let bn_tracks = match self.edition {
                Edition::Descent1 => n_tracks,
                Edition::Descent2 => n_tracks + 1,
            };
            if bn_tracks <= first {
                first
            } else {
                first + (songnum as i64) % (bn_tracks - first)
            }
        } else {
            let track = i64::from(self.redbook_playing) + i64::from(offset);
            if track < first {
                n_tracks - (first - track) + 1
            } else if track > n_tracks {
                first + (track - n_tracks) - 1
            } else {
                track
            }
        };

        self.song_playing = None;
        if !self.redbook.enabled() || track > n_tracks || track < 1 {
            debug!("CD track {track} not available ({n_tracks} tracks)");
            return;
        }

        let track = track as u32;
        let n_tracks = n_tracks as u32;
        let played = match self.edition {
            Edition::Descent1 => {
                if self.have_cd() {
                    self.redbook.play_tracks(track, track, Some(FinishedHook::RedbookRepeat))
                } else {
                    self.redbook.play_tracks(track, n_tracks, Some(FinishedHook::RedbookFirstSong))
                }
            }
            Edition::Descent2 => self.redbook.play_tracks(track, n_tracks, Some(FinishedHook::RedbookFirstSong)),
        };

        if played {
            self.song_playing = Some(songnum + SONG_FIRST_LEVEL_SONG);
            self.redbook_playing = track;
            self.now_playing = Some(format!("CD track {track}"));
        }
    }

    fn play_jukebox_level_song(&mut self, songnum: usize, offset: i32) {
        let count = self.jukebox.count();
        let order = self.settings.level_music_order;

        if count > 0 {
            match order {
                PlayOrder::Random => self.jukebox.set_current(rand::random_range(0..count)),
                PlayOrder::Continuous if offset == 0 => {
                    // A new level moves on to the next track.
                    if self.last_level_song.is_some_and(|last| last != songnum) {
                        self.jukebox.advance();
                    }
                    self.last_level_song = Some(songnum);
                }
                PlayOrder::Level if offset == 0 => self.jukebox.set_current(songnum % count),
                PlayOrder::Continuous | PlayOrder::Level => self.jukebox.step(offset),
            }
        }

        self.song_playing = None;
        if self.jukebox_play() {
            self.song_playing = Some(songnum + SONG_FIRST_LEVEL_SONG);
        }
    }

    /// Plays the jukebox's current track. In level order it loops; otherwise
    /// the next track follows when it ends.
    fn jukebox_play(&mut self) -> bool {
        let Some(track) = self.jukebox.current_track().map(Path::to_path_buf) else {
            return false;
        };

        // Jukebox tracks go straight to the player, whatever their format.
        self.stop_all();
        let per_level = self.settings.level_music_order == PlayOrder::Level;
        let hook = (!per_level).then_some(FinishedHook::JukeboxNext);
        if !self.music.play(vec![track.clone()], per_level, hook) {
            return false;
        }

        let label = file_label(&track.to_string_lossy());
        info!("Now playing: {label}");
        self.now_playing = Some(label);
        true
    }

    /// Runs the follow-up a backend asked for when its music ended.
    pub(crate) fn track_finished(&mut self, hook: FinishedHook) {
        debug!("Music finished, running {hook:?}");

        match hook {
            FinishedHook::RedbookRepeat => {
                let track = self.redbook_playing;
                self.redbook.play_tracks(track, track, Some(FinishedHook::RedbookRepeat));
            }
            FinishedHook::RedbookFirstSong => {
                // Forget the current song so the level song is not skipped
                // as already playing.
                self.song_playing = None;
                self.play_level_song(1, 0);
            }
            FinishedHook::PlayCredits => {
                self.play_song(SONG_CREDITS, true);
            }
            FinishedHook::JukeboxNext => {
                if !self.jukebox.is_loaded() {
                    return;
                }
                if self.settings.level_music_order == PlayOrder::Random {
                    self.jukebox.set_current(rand::random_range(0..self.jukebox.count()));
                } else {
                    self.jukebox.advance();
                }

                // Moving through the list is still the same level song.
                let playing = self.song_playing;
                if self.jukebox_play() {
                    self.song_playing = playing;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs, rc::Rc};

    use tempfile::TempDir;

    use super::*;
    use crate::player::testing::FakeMusic;

    #[derive(Debug, Default)]
    struct CdState {
        tracks: u32,
        disc_id: u32,
        plays: Vec<(u32, u32, Option<FinishedHook>)>,
        paused_toggles: usize,
    }

    #[derive(Clone, Default)]
    struct FakeCd(Rc<RefCell<CdState>>);

    impl FakeCd {
        fn plays(&self) -> Vec<(u32, u32, Option<FinishedHook>)> {
            self.0.borrow().plays.clone()
        }
    }

    impl RedbookBackend for FakeCd {
        fn configure(&mut self, _source: &str, _disc_id: Option<u32>) {}
        fn init(&mut self) {}
        fn enabled(&self) -> bool {
            self.0.borrow().tracks > 0
        }
        fn track_count(&self) -> u32 {
            self.0.borrow().tracks
        }
        fn disc_id(&self) -> u32 {
            self.0.borrow().disc_id
        }
        fn play_tracks(&mut self, first: u32, last: u32, on_finished: Option<FinishedHook>) -> bool {
            let mut state = self.0.borrow_mut();
            if first == 0 || last > state.tracks {
                return false;
            }
            state.plays.push((first, last, on_finished));
            true
        }
        fn stop(&mut self) {}
        fn pause(&mut self) {}
        fn resume(&mut self) {}
        fn pause_resume(&mut self) {
            self.0.borrow_mut().paused_toggles += 1;
        }
        fn set_volume(&mut self, _volume: u8) {}
    }

    struct Rig {
        songs: Songs,
        music: FakeMusic,
        cd: FakeCd,
        dir: TempDir,
    }

    fn rig(edition: Edition, music_type: MusicType, files: &[&str]) -> Rig {
        rig_with(edition, MusicFlags::default(), music_type, files, |_| {})
    }

    fn rig_with(
        edition: Edition,
        flags: MusicFlags,
        music_type: MusicType,
        files: &[&str],
        tweak: impl FnOnce(&mut MusicSettings),
    ) -> Rig {
        let dir = TempDir::new().unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"").unwrap();
        }

        let mut settings = MusicSettings {
            music_type,
            ..MusicSettings::default()
        };
        tweak(&mut settings);

        let music = FakeMusic::default();
        let cd = FakeCd::default();
        let songs = Songs::new(
            edition,
            flags,
            SearchPath::new(vec![dir.path().to_path_buf()]),
            settings,
            Box::new(music.clone()),
            Box::new(cd.clone()),
        );

        Rig { songs, music, cd, dir }
    }

    const BUILTIN_FILES: [&str; 6] = [
        "descent.hmp",
        "briefing.hmp",
        "credits.hmp",
        "game01.hmp",
        "game02.hmp",
        "game03.hmp",
    ];

    #[test]
    fn builtin_title_plays_registry_file() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &BUILTIN_FILES);

        assert_eq!(rig.songs.play_song(SONG_TITLE, true), Some(SONG_TITLE));

        let play = rig.music.last_play().unwrap();
        assert_eq!(play.files, vec![rig.dir.path().join("descent.hmp")]);
        assert!(play.looping);
        assert_eq!(rig.songs.now_playing(), Some("descent.hmp"));
    }

    #[test]
    fn missing_endlevel_song_keeps_level_song() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &BUILTIN_FILES);
        let level = rig.songs.play_level_song(2, 0);
        assert_eq!(level, Some(SONG_FIRST_LEVEL_SONG + 1));
        let plays = rig.music.play_count();

        assert_eq!(rig.songs.play_song(SONG_ENDLEVEL, false), level);
        assert_eq!(rig.music.play_count(), plays);
        assert_eq!(rig.music.stop_count(), 1);
    }

    #[test]
    fn song_missing_from_registry_stops_music() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &["descent.hmp"]);
        fs::write(rig.dir.path().join("descent.sng"), "descent.hmp\n").unwrap();
        assert_eq!(rig.songs.play_song(SONG_TITLE, true), Some(SONG_TITLE));
        let stops = rig.music.stop_count();

        assert_eq!(rig.songs.play_song(SONG_BRIEFING, false), None);
        assert!(rig.music.stop_count() > stops);
        assert_eq!(rig.songs.now_playing(), None);
    }

    #[test]
    fn missing_endlevel_song_outside_level_stops() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &BUILTIN_FILES);
        rig.songs.play_song(SONG_TITLE, true);

        assert_eq!(rig.songs.play_song(SONG_ENDLEVEL, false), None);
    }

    #[test]
    fn builtin_level_songs_wrap_over_available_songs() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &BUILTIN_FILES);

        assert_eq!(rig.songs.play_level_song(4, 0), Some(SONG_FIRST_LEVEL_SONG));
        assert_eq!(rig.songs.play_level_song(-2, 0), Some(SONG_FIRST_LEVEL_SONG + 2));
        assert_eq!(
            rig.music.last_play().unwrap().files,
            vec![rig.dir.path().join("game03.hmp")]
        );
    }

    #[test]
    fn builtin_ignores_relative_steps() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &BUILTIN_FILES);
        let playing = rig.songs.play_level_song(1, 0);
        let plays = rig.music.play_count();

        assert_eq!(rig.songs.play_level_song(1, 1), playing);
        assert_eq!(rig.music.play_count(), plays);
    }

    #[test]
    fn repeated_builtin_level_song_is_a_no_op() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &BUILTIN_FILES);
        rig.songs.play_level_song(1, 0);
        let plays = rig.music.play_count();

        assert_eq!(rig.songs.play_level_song(1, 0), Some(SONG_FIRST_LEVEL_SONG));
        assert_eq!(rig.music.play_count(), plays);
    }

    #[test]
    fn d1_redbook_fixed_songs_map_to_tracks() {
        let mut rig = rig(Edition::Descent1, MusicType::Redbook, &[]);
        rig.cd.0.borrow_mut().tracks = 10;

        assert_eq!(rig.songs.play_song(SONG_TITLE, true), Some(SONG_TITLE));
        assert_eq!(rig.songs.redbook_playing(), 2);
        assert_eq!(rig.songs.play_song(SONG_ENDGAME, false), Some(SONG_ENDGAME));
        assert_eq!(rig.songs.redbook_playing(), 10);
        assert_eq!(rig.songs.play_song(SONG_CREDITS, false), Some(SONG_CREDITS));
        assert_eq!(rig.songs.redbook_playing(), 5);

        assert_eq!(
            rig.cd.plays(),
            vec![
                (2, 2, Some(FinishedHook::RedbookRepeat)),
                (10, 10, None),
                (5, 5, None),
            ]
        );
    }

    #[test]
    fn d1_redbook_song_past_last_track_plays_nothing() {
        let mut rig = rig(Edition::Descent1, MusicType::Redbook, &[]);
        rig.cd.0.borrow_mut().tracks = 4;
        rig.songs.play_song(SONG_TITLE, false);

        assert_eq!(rig.songs.play_song(SONG_CREDITS, false), None);
        assert_eq!(rig.cd.plays().len(), 1);
    }

    #[test]
    fn d2_redbook_unavailable_song_keeps_current() {
        let mut rig = rig(Edition::Descent2, MusicType::Redbook, &[]);
        rig.cd.0.borrow_mut().tracks = 8;
        rig.songs.play_song(SONG_TITLE, true);

        assert_eq!(rig.songs.play_song(SONG_BRIEFING, false), Some(SONG_TITLE));
        assert_eq!(rig.cd.plays(), vec![(2, 2, Some(FinishedHook::PlayCredits))]);
    }

    #[test]
    fn redbook_level_song_without_cd_starts_at_track_one() {
        let mut rig = rig(Edition::Descent1, MusicType::Redbook, &[]);
        rig.cd.0.borrow_mut().tracks = 5;

        assert_eq!(rig.songs.play_level_song(7, 0), Some(SONG_FIRST_LEVEL_SONG + 6));

        // 1 + 6 % (5 - 1), playing through to the end of the disc.
        assert_eq!(rig.cd.plays(), vec![(3, 5, Some(FinishedHook::RedbookFirstSong))]);
        assert_eq!(rig.songs.redbook_playing(), 3);
    }

    #[test]
    fn redbook_level_song_on_original_cd_repeats_one_track() {
        let mut rig = rig(Edition::Descent1, MusicType::Redbook, &[]);
        {
            let mut cd = rig.cd.0.borrow_mut();
            cd.tracks = 27;
            cd.disc_id = redbook::D1_DISCID;
        }

        assert!(rig.songs.have_cd());
        rig.songs.play_level_song(1, 0);

        assert_eq!(rig.cd.plays(), vec![(6, 6, Some(FinishedHook::RedbookRepeat))]);
    }

    #[test]
    fn repeated_redbook_level_song_is_a_no_op() {
        let mut rig = rig(Edition::Descent2, MusicType::Redbook, &[]);
        rig.cd.0.borrow_mut().tracks = 12;

        let first = rig.songs.play_level_song(3, 0);
        let track = rig.songs.redbook_playing();
        let second = rig.songs.play_level_song(3, 0);

        assert_eq!(first, second);
        assert_eq!(rig.songs.redbook_playing(), track);
        assert_eq!(rig.cd.plays().len(), 1);
    }

    #[test]
    fn redbook_steps_wrap_around_level_tracks() {
        let mut rig = rig_with(Edition::Descent2, MusicFlags::default(), MusicType::Redbook, &[], |s| {
            s.orig_track_order = true;
        });
        rig.cd.0.borrow_mut().tracks = 10;

        rig.songs.play_level_song(1, 0);
        assert_eq!(rig.songs.redbook_playing(), 4);

        rig.songs.play_level_song(1, -1);
        assert_eq!(rig.songs.redbook_playing(), 10);

        rig.songs.play_level_song(1, 1);
        assert_eq!(rig.songs.redbook_playing(), 4);
    }

    #[test]
    fn redbook_track_past_disc_end_reverts_to_nothing() {
        let mut rig = rig_with(Edition::Descent2, MusicFlags::default(), MusicType::Redbook, &[], |s| {
            s.orig_track_order = true;
        });
        rig.cd.0.borrow_mut().tracks = 3;

        assert_eq!(rig.songs.play_level_song(1, 0), None);
        assert!(rig.cd.plays().is_empty());
    }

    #[test]
    fn d2_custom_title_chains_into_credits() {
        let mut rig = rig_with(Edition::Descent2, MusicFlags::default(), MusicType::Custom, &["title.ogg"], |s| {
            s.orig_track_order = true;
            s.misc_music[SONG_TITLE] = "title.ogg".into();
        });

        assert_eq!(rig.songs.play_song(SONG_TITLE, true), Some(SONG_TITLE));

        let play = rig.music.last_play().unwrap();
        assert!(!play.looping);
        assert_eq!(play.on_finished, Some(FinishedHook::PlayCredits));
    }

    #[test]
    fn custom_missing_endlevel_keeps_level_song() {
        let mut rig = rig_with(Edition::Descent2, MusicFlags::default(), MusicType::Custom, &[], |_| {});
        let music_dir = rig.dir.path().join("levels");
        fs::create_dir(&music_dir).unwrap();
        fs::write(music_dir.join("a.ogg"), b"").unwrap();
        let mut settings = rig.songs.settings().clone();
        settings.level_music_path = music_dir.to_string_lossy().into_owned();
        rig.songs.apply_settings(settings);

        let level = rig.songs.play_level_song(1, 0);
        assert_eq!(level, Some(SONG_FIRST_LEVEL_SONG));
        assert_eq!(rig.songs.play_song(SONG_ENDLEVEL, false), level);
    }

    fn jukebox_rig(order: PlayOrder, tracks: usize) -> Rig {
        let mut rig = rig_with(Edition::Descent2, MusicFlags::default(), MusicType::Custom, &[], |_| {});
        let music_dir = rig.dir.path().join("levels");
        fs::create_dir(&music_dir).unwrap();
        for i in 0..tracks {
            fs::write(music_dir.join(format!("{i}.ogg")), b"").unwrap();
        }

        let mut settings = rig.songs.settings().clone();
        settings.level_music_path = music_dir.to_string_lossy().into_owned();
        settings.level_music_order = order;
        rig.songs.apply_settings(settings);
        rig
    }

    #[test]
    fn jukebox_plays_any_listed_track_format() {
        let mut rig = rig_with(Edition::Descent2, MusicFlags::default(), MusicType::Custom, &[], |_| {});
        let music_dir = rig.dir.path().join("levels");
        fs::create_dir(&music_dir).unwrap();
        fs::write(music_dir.join("a.wav"), b"").unwrap();
        let mut settings = rig.songs.settings().clone();
        settings.level_music_path = music_dir.to_string_lossy().into_owned();
        rig.songs.apply_settings(settings);

        assert_eq!(rig.songs.play_level_song(1, 0), Some(SONG_FIRST_LEVEL_SONG));
        assert_eq!(rig.songs.jukebox().count(), 1);
        assert_eq!(rig.music.last_play().unwrap().files, vec![music_dir.join("a.wav")]);
        assert_eq!(rig.songs.now_playing(), Some("a.wav"));
    }

    #[test]
    fn continuous_jukebox_moves_on_per_level() {
        let mut rig = jukebox_rig(PlayOrder::Continuous, 3);

        rig.songs.play_level_song(1, 0);
        assert_eq!(rig.songs.jukebox().current(), 0);
        assert_eq!(rig.music.last_play().unwrap().on_finished, Some(FinishedHook::JukeboxNext));

        // Still playing: asking again changes nothing.
        let plays = rig.music.play_count();
        rig.songs.play_level_song(1, 0);
        assert_eq!(rig.music.play_count(), plays);

        rig.songs.stop_all();
        rig.songs.play_level_song(2, 0);
        assert_eq!(rig.songs.jukebox().current(), 1);

        rig.songs.stop_all();
        rig.songs.play_level_song(2, 0);
        assert_eq!(rig.songs.jukebox().current(), 1);
    }

    #[test]
    fn level_order_jukebox_picks_by_level_and_loops() {
        let mut rig = jukebox_rig(PlayOrder::Level, 3);

        assert_eq!(rig.songs.play_level_song(5, 0), Some(SONG_FIRST_LEVEL_SONG + 4));

        assert_eq!(rig.songs.jukebox().current(), 1);
        let play = rig.music.last_play().unwrap();
        assert!(play.looping);
        assert_eq!(play.on_finished, None);
    }

    #[test]
    fn jukebox_steps_wrap() {
        let mut rig = jukebox_rig(PlayOrder::Level, 3);
        rig.songs.play_level_song(1, 0);

        rig.songs.play_level_song(1, -1);
        assert_eq!(rig.songs.jukebox().current(), 2);
        rig.songs.play_level_song(1, 2);
        assert_eq!(rig.songs.jukebox().current(), 1);
    }

    #[test]
    fn random_jukebox_stays_in_range() {
        let mut rig = jukebox_rig(PlayOrder::Random, 4);

        for level in 1..20 {
            rig.songs.play_level_song(level, 0);
            assert!(rig.songs.jukebox().current() < 4);
        }
    }

    #[test]
    fn empty_jukebox_plays_nothing() {
        let mut rig = jukebox_rig(PlayOrder::Random, 0);

        assert_eq!(rig.songs.play_level_song(1, 0), None);
    }

    #[test]
    fn jukebox_next_hook_advances_and_keeps_level_song() {
        let mut rig = jukebox_rig(PlayOrder::Continuous, 2);
        let level = rig.songs.play_level_song(1, 0);

        rig.songs.track_finished(FinishedHook::JukeboxNext);
        assert_eq!(rig.songs.jukebox().current(), 1);
        assert_eq!(rig.songs.is_playing(), level);

        rig.songs.track_finished(FinishedHook::JukeboxNext);
        assert_eq!(rig.songs.jukebox().current(), 0);
    }

    #[test]
    fn redbook_hooks_replay_and_restart() {
        let mut rig = rig(Edition::Descent1, MusicType::Redbook, &[]);
        rig.cd.0.borrow_mut().tracks = 10;
        rig.songs.play_song(SONG_TITLE, true);

        rig.songs.track_finished(FinishedHook::RedbookRepeat);
        assert_eq!(rig.cd.plays().last(), Some(&(2, 2, Some(FinishedHook::RedbookRepeat))));

        rig.songs.track_finished(FinishedHook::RedbookFirstSong);
        assert_eq!(rig.songs.is_playing(), Some(SONG_FIRST_LEVEL_SONG));
        assert_eq!(rig.songs.redbook_playing(), 1);
    }

    #[test]
    fn play_credits_hook_loops_credits() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &BUILTIN_FILES);

        rig.songs.track_finished(FinishedHook::PlayCredits);

        assert_eq!(rig.songs.is_playing(), Some(SONG_CREDITS));
        assert!(rig.music.last_play().unwrap().looping);
    }

    #[test]
    fn nomusic_forces_silence() {
        let flags = MusicFlags {
            nomusic: true,
            nosdlmixer: false,
        };
        let mut rig = rig_with(Edition::Descent2, flags, MusicType::Builtin, &BUILTIN_FILES, |_| {});

        assert_eq!(rig.songs.play_song(SONG_TITLE, true), None);
        assert_eq!(rig.songs.music_type(), MusicType::None);
        assert_eq!(rig.music.play_count(), 0);
    }

    #[test]
    fn nosdlmixer_disables_builtin_and_custom_only() {
        let flags = MusicFlags {
            nomusic: false,
            nosdlmixer: true,
        };
        let mut builtin = rig_with(Edition::Descent2, flags, MusicType::Builtin, &BUILTIN_FILES, |_| {});
        let mut custom = rig_with(Edition::Descent2, flags, MusicType::Custom, &[], |_| {});
        let mut redbook = rig_with(Edition::Descent2, flags, MusicType::Redbook, &[], |_| {});
        redbook.cd.0.borrow_mut().tracks = 4;

        builtin.songs.play_song(SONG_TITLE, true);
        custom.songs.play_song(SONG_TITLE, true);
        redbook.songs.play_song(SONG_TITLE, true);

        assert_eq!(builtin.songs.music_type(), MusicType::None);
        assert_eq!(custom.songs.music_type(), MusicType::None);
        assert_eq!(redbook.songs.music_type(), MusicType::Redbook);
        assert_eq!(redbook.songs.is_playing(), Some(SONG_TITLE));
    }

    #[test]
    fn play_file_dispatches_on_extension() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &["a.hmp", "b.ogg", "c.wav", "noext"]);

        assert!(rig.songs.play_file("a.hmp", false, None));
        assert!(rig.songs.play_file("b.ogg", false, None));
        assert!(!rig.songs.play_file("c.wav", false, None));
        assert!(!rig.songs.play_file("noext", false, None));
        assert!(!rig.songs.play_file("missing.ogg", false, None));
        assert_eq!(rig.music.play_count(), 2);
    }

    #[test]
    fn controls_are_safe_with_nothing_playing() {
        let mut rig = rig(Edition::Descent2, MusicType::Builtin, &[]);

        rig.songs.stop_all();
        rig.songs.pause();
        rig.songs.resume();
        rig.songs.pause_resume();
        rig.songs.uninit();

        assert_eq!(rig.songs.is_playing(), None);
        assert_eq!(rig.music.pause_toggles(), 1);
        assert_eq!(rig.cd.0.borrow().paused_toggles, 0);
    }

    #[test]
    fn redbook_pause_resume_goes_to_cd() {
        let mut rig = rig(Edition::Descent2, MusicType::Redbook, &[]);
        rig.cd.0.borrow_mut().tracks = 4;
        rig.songs.play_song(SONG_TITLE, false);

        rig.songs.pause_resume();

        assert_eq!(rig.cd.0.borrow().paused_toggles, 1);
        assert_eq!(rig.music.pause_toggles(), 0);
    }

    #[test]
    fn d1_failed_level_song_stops_music() {
        let mut rig = rig(Edition::Descent1, MusicType::Builtin, &["descent.hmp"]);
        rig.songs.play_song(SONG_TITLE, true);
        let stops = rig.music.stop_count();

        assert_eq!(rig.songs.play_level_song(1, 0), None);
        assert!(rig.music.stop_count() > stops);
    }
}
