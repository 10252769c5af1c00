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


//! Jukebox: user-supplied level music.
//!
//! Level music comes from a directory of audio files or from an `.m3u`
//! playlist. The jukebox keeps the track list and the `[current, count]`
//! position; choosing which track plays next is up to the sequencer.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use walkdir::WalkDir;

const JUKEBOX_EXTENSIONS: [&str; 7] = ["mp3", "ogg", "flac", "wav", "aif", "mid", "hmp"];

#[derive(Debug, Default)]
pub(crate) struct Jukebox {
    source: Option<PathBuf>,
    tracks: Vec<PathBuf>,
    current: usize,
}

impl Jukebox {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Loads the track list from `path`.
    ///
    /// Reloading the same source keeps the current position. Returns whether
    /// any tracks are available.
    pub(crate) fn load(&mut self, path: &str) -> bool {
        if path.is_empty() {
            self.unload();
            return false;
        }

        let source = PathBuf::from(path);
        if self.source.as_ref() == Some(&source) && !self.tracks.is_empty() {
            return true;
        }

        self.unload();
        self.tracks = if is_playlist(&source) {
            read_playlist(&source)
        } else {
            list_directory(&source)
        };

        if self.tracks.is_empty() {
            warn!("Jukebox: no music found in {}", source.display());
        } else {
            info!("Jukebox: {} tracks loaded from {}", self.tracks.len(), source.display());
        }

        self.source = Some(source);
        !self.tracks.is_empty()
    }

    pub(crate) fn unload(&mut self) {
        self.source = None;
        self.tracks.clear();
        self.current = 0;
    }

    pub(crate) fn is_loaded(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub(crate) fn count(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn current(&self) -> usize {
        self.current
    }

    pub(crate) fn set_current(&mut self, current: usize) {
        self.current = current;
    }

    /// Moves forward one track, wrapping at the end of the list.
    pub(crate) fn advance(&mut self) {
        if self.current + 1 >= self.tracks.len() {
            self.current = 0;
        } else {
            self.current += 1;
        }
    }

    /// Moves by `offset` tracks in either direction, wrapping at both ends.
    pub(crate) fn step(&mut self, offset: i32) {
        let count = self.tracks.len() as i64;
        if count == 0 {
            return;
        }

        let mut track = self.current as i64 + i64::from(offset);
        if track < 0 {
            track += count;
        }
        if track + 1 > count {
            track -= count;
        }
        self.current = track.rem_euclid(count) as usize;
    }

    pub(crate) fn current_track(&self) -> Option<&Path> {
        self.tracks.get(self.current).map(PathBuf::as_path)
    }
}

fn is_playlist(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("m3u"))
}

fn has_music_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| JUKEBOX_EXTENSIONS.iter().any(|j| e.eq_ignore_ascii_case(j)))
}

fn list_directory(dir: &Path) -> Vec<PathBuf> {
    let mut tracks: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_music_extension(p))
        .collect();
    tracks.sort();
    tracks
}

/// Reads an `.m3u` playlist. Relative entries are relative to the playlist.
fn read_playlist(playlist: &Path) -> Vec<PathBuf> {
    let Ok(text) = fs::read_to_string(playlist) else {
        return Vec::new();
    };
    let base = playlist.parent().unwrap_or(Path::new(""));

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let entry = Path::new(line);
            if entry.is_absolute() { entry.to_path_buf() } else { base.join(entry) }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn music_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn directory_lists_sorted_music_only() {
        let dir = music_dir(&["b.ogg", "a.mp3", "notes.txt", "c.FLAC"]);
        let mut jukebox = Jukebox::new();

        assert!(jukebox.load(dir.path().to_str().unwrap()));

        assert_eq!(jukebox.count(), 3);
        assert_eq!(jukebox.current_track(), Some(dir.path().join("a.mp3").as_path()));
    }

    #[test]
    fn playlist_entries_resolve_against_playlist_dir() {
        let dir = music_dir(&[]);
        let playlist = dir.path().join("levels.m3u");
        fs::write(&playlist, "#EXTM3U\nfirst.ogg\n\n/abs/second.mp3\n").unwrap();

        let mut jukebox = Jukebox::new();
        assert!(jukebox.load(playlist.to_str().unwrap()));

        assert_eq!(jukebox.count(), 2);
        assert_eq!(jukebox.current_track(), Some(dir.path().join("first.ogg").as_path()));
        jukebox.advance();
        assert_eq!(jukebox.current_track(), Some(Path::new("/abs/second.mp3")));
    }

    #[test]
    fn reloading_same_source_keeps_position() {
        let dir = music_dir(&["1.ogg", "2.ogg", "3.ogg"]);
        let path = dir.path().to_str().unwrap();
        let mut jukebox = Jukebox::new();

        jukebox.load(path);
        jukebox.set_current(2);
        jukebox.load(path);

        assert_eq!(jukebox.current(), 2);
    }

    #[test]
    fn stepping_wraps_both_ways() {
        let dir = music_dir(&["1.ogg", "2.ogg", "3.ogg"]);
        let mut jukebox = Jukebox::new();
        jukebox.load(dir.path().to_str().unwrap());

        jukebox.step(-1);
        assert_eq!(jukebox.current(), 2);
        jukebox.step(1);
        assert_eq!(jukebox.current(), 0);
        jukebox.advance();
        jukebox.advance();
        jukebox.advance();
        assert_eq!(jukebox.current(), 0);
    }

    #[test]
    fn empty_path_unloads() {
        let dir = music_dir(&["1.ogg"]);
        let mut jukebox = Jukebox::new();
        jukebox.load(dir.path().to_str().unwrap());

        assert!(!jukebox.load(""));
        assert!(!jukebox.is_loaded());
    }
}
