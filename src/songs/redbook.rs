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


//! CD audio.
//!
//! [`RedbookBackend`] is what the sequencer needs from an audio CD player.
//! Real CD drives are gone from most machines, so the shipped backend plays
//! a directory of ripped tracks as a virtual disc: the directory's audio
//! files, sorted by name, are tracks 1..=N.

use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::{
    args::Edition,
    player::MusicBackend,
    songs::FinishedHook,
};

/// Disc id of the original Descent CD.
pub(crate) const D1_DISCID: u32 = 0xde0feb0e;

/// Disc ids of the known Descent II CD pressings.
pub(crate) const D2_DISCIDS: [u32; 11] = [
    0x7d0ff809,
    0xe010a30e,
    0xd410070d,
    0xc610080d,
    0x87102209,
    0xac0bc30d,
    0xc40c0a0d,
    0x53078208,
    0x64071408,
    0xb70ee40e,
    0x22115710,
];

/// Whether `disc_id` identifies an original game CD for `edition`.
pub(crate) fn is_known_disc(edition: Edition, disc_id: u32) -> bool {
    match edition {
        Edition::Descent1 => disc_id == D1_DISCID,
        Edition::Descent2 => D2_DISCIDS.contains(&disc_id),
    }
}

const TRACK_EXTENSIONS: [&str; 5] = ["ogg", "flac", "mp3", "wav", "mid"];

pub(crate) trait RedbookBackend {
    /// Selects where the disc comes from; takes effect on the next
    /// [`init`](Self::init).
    fn configure(&mut self, source: &str, disc_id: Option<u32>);

    /// Checks for a disc. Safe to call repeatedly.
    fn init(&mut self);
    fn enabled(&self) -> bool;
    fn track_count(&self) -> u32;
    fn disc_id(&self) -> u32;

    /// Plays tracks `first..=last` in order, reporting `on_finished` after
    /// the last one ends. Returns `false` when nothing could be started.
    fn play_tracks(&mut self, first: u32, last: u32, on_finished: Option<FinishedHook>) -> bool;
    fn stop(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn pause_resume(&mut self);
    fn set_volume(&mut self, volume: u8);
}

/// A directory of ripped tracks played through a music backend.
pub(crate) struct RipDirectoryCd<M> {
    dir: PathBuf,
    disc_id: Option<u32>,
    tracks: Vec<PathBuf>,
    enabled: bool,
    music: M,
}

impl<M: MusicBackend> RipDirectoryCd<M> {
    pub(crate) fn new(dir: impl Into<PathBuf>, disc_id: Option<u32>, music: M) -> Self {
        Self {
            dir: dir.into(),
            disc_id,
            tracks: Vec::new(),
            enabled: false,
            music,
        }
    }
}

fn list_tracks(dir: &Path) -> Vec<PathBuf> {
    let mut tracks: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| TRACK_EXTENSIONS.iter().any(|t| e.eq_ignore_ascii_case(t)))
        })
        .collect();
    tracks.sort();
    tracks
}

impl<M: MusicBackend> RedbookBackend for RipDirectoryCd<M> {
    fn configure(&mut self, source: &str, disc_id: Option<u32>) {
        self.dir = PathBuf::from(source);
        self.disc_id = disc_id;
    }

    fn init(&mut self) {
        if self.dir.as_os_str().is_empty() || !self.dir.is_dir() {
            self.tracks.clear();
            self.enabled = false;
            debug!("No CD rip directory, CD audio disabled");
            return;
        }

        self.tracks = list_tracks(&self.dir);
        self.enabled = !self.tracks.is_empty();
        info!("CD audio: {} tracks in {}", self.tracks.len(), self.dir.display());
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn track_count(&self) -> u32 {
        if self.enabled { self.tracks.len() as u32 } else { 0 }
    }

    fn disc_id(&self) -> u32 {
        self.disc_id.unwrap_or(0)
    }

    fn play_tracks(&mut self, first: u32, last: u32, on_finished: Option<FinishedHook>) -> bool {
        if !self.enabled || first == 0 || first > last || last > self.track_count() {
            return false;
        }

        let files = self.tracks[(first - 1) as usize..last as usize].to_vec();
        debug!("Playing CD tracks {first}..={last}");
        self.music.play(files, false, on_finished)
    }

    fn stop(&mut self) {
        self.music.stop();
    }

    fn pause(&mut self) {
        self.music.pause();
    }

    fn resume(&mut self) {
        self.music.resume();
    }

    fn pause_resume(&mut self) {
        self.music.pause_resume();
    }

    fn set_volume(&mut self, volume: u8) {
        self.music.set_volume(volume);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::player::testing::FakeMusic;

    fn ripped(tracks: usize) -> TempDir {
        let dir = TempDir::new().unwrap();
        for i in (1..=tracks).rev() {
            fs::write(dir.path().join(format!("track{i:02}.ogg")), b"").unwrap();
        }
        fs::write(dir.path().join("cover.jpg"), b"").unwrap();
        dir
    }

    #[test]
    fn known_discs_are_per_edition() {
        assert!(is_known_disc(Edition::Descent1, D1_DISCID));
        assert!(!is_known_disc(Edition::Descent2, D1_DISCID));
        assert!(is_known_disc(Edition::Descent2, 0xd410070d));
        assert!(!is_known_disc(Edition::Descent2, 0x12345678));
    }

    #[test]
    fn rip_directory_tracks_are_sorted_audio_files() {
        let dir = ripped(3);
        let music = FakeMusic::default();
        let mut cd = RipDirectoryCd::new(dir.path(), Some(D1_DISCID), music.clone());

        cd.init();

        assert!(cd.enabled());
        assert_eq!(cd.track_count(), 3);
        assert_eq!(cd.disc_id(), D1_DISCID);

        assert!(cd.play_tracks(2, 3, Some(FinishedHook::RedbookFirstSong)));
        let played = music.last_play().unwrap();
        assert_eq!(
            played.files,
            vec![dir.path().join("track02.ogg"), dir.path().join("track03.ogg")]
        );
        assert_eq!(played.on_finished, Some(FinishedHook::RedbookFirstSong));
        assert!(!played.looping);
    }

    #[test]
    fn out_of_range_tracks_are_refused() {
        let dir = ripped(3);
        let music = FakeMusic::default();
        let mut cd = RipDirectoryCd::new(dir.path(), None, music.clone());
        cd.init();

        assert!(!cd.play_tracks(0, 1, None));
        assert!(!cd.play_tracks(2, 4, None));
        assert!(!cd.play_tracks(3, 2, None));
        assert!(music.last_play().is_none());
    }

    #[test]
    fn configure_switches_directory() {
        let dir = ripped(2);
        let mut cd = RipDirectoryCd::new("", None, FakeMusic::default());
        cd.init();
        assert!(!cd.enabled());

        cd.configure(dir.path().to_str().unwrap(), Some(7));
        cd.init();

        assert_eq!(cd.track_count(), 2);
        assert_eq!(cd.disc_id(), 7);
    }

    #[test]
    fn missing_directory_disables_cd() {
        let music = FakeMusic::default();
        let mut cd = RipDirectoryCd::new("/nonexistent/cd", None, music);

        cd.init();

        assert!(!cd.enabled());
        assert_eq!(cd.track_count(), 0);
        assert_eq!(cd.disc_id(), 0);
    }
}
