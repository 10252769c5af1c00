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


//! Built-in song registry.
//!
//! The registry maps song numbers to data file names. It is read from a
//! manifest (`dxx-r.sng`, then `descent.sng`) when one exists, otherwise a
//! default set is synthesised by probing for the usual file names. Entries
//! may be empty, meaning the song is unavailable.

use log::{debug, info};

use crate::{
    args::Edition,
    songs::{SONG_BRIEFING, SONG_CREDITS, SONG_ENDGAME, SONG_ENDLEVEL, SONG_FIRST_LEVEL_SONG, SONG_TITLE},
    util::search_path::SearchPath,
};

const MANIFESTS: [&str; 2] = ["dxx-r.sng", "descent.sng"];

/// Longest file name a manifest line may contribute.
const MAX_SONG_NAME: usize = 15;

/// Size of the synthesised default set.
const DEFAULT_SONG_SLOTS: usize = 30;

/// Descent 1.5 patches truncate `descent.sng` to exactly this many bytes and
/// twelve songs.
const TRUNCATED_SNG_SIZE: u64 = 422;
const TRUNCATED_SNG_SONGS: usize = 12;
const TRUNCATED_SNG_LAST: usize = 26;

pub(crate) const EXT_HMP: &str = "hmp";
pub(crate) const EXT_MIXER: [&str; 4] = ["mid", "ogg", "flac", "mp3"];

/// Whether a file with this name can be played by the music layer.
pub(crate) fn playable_extension(name: &str, mixer: bool) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };

    ext.eq_ignore_ascii_case(EXT_HMP) || (mixer && EXT_MIXER.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SongRegistry {
    songs: Vec<String>,
}

impl SongRegistry {
    /// Loads the registry from the first manifest found, or synthesises the
    /// default set.
    pub(crate) fn load(search: &SearchPath, edition: Edition, mixer: bool) -> Self {
        for manifest in MANIFESTS {
            if let Some(text) = search.read_to_string(manifest) {
                let mut songs = parse_manifest(&text, mixer);
                debug!("Read {} songs from {}", songs.len(), manifest);

                if edition == Edition::Descent1
                    && songs.len() == TRUNCATED_SNG_SONGS
                    && search.file_size("descent.sng") == Some(TRUNCATED_SNG_SIZE)
                {
                    info!("Extending truncated descent.sng");
                    songs.extend((TRUNCATED_SNG_SONGS..=TRUNCATED_SNG_LAST).map(|i| format!("game{:02}.hmp", i - 4)));
                }

                return Self { songs };
            }
        }

        Self::default_set(search)
    }

    /// The set used when no manifest exists.
    ///
    /// Level songs are looked up as `gameNN.hmp` and then `gameN.hmp`; the set
    /// ends at the first level song found under neither name.
    pub(crate) fn default_set(search: &SearchPath) -> Self {
        let mut songs = vec![String::new(); DEFAULT_SONG_SLOTS];
        songs[SONG_TITLE] = "descent.hmp".into();
        songs[SONG_BRIEFING] = "briefing.hmp".into();
        songs[SONG_ENDLEVEL] = "endlevel.hmp".into();
        songs[SONG_ENDGAME] = "endgame.hmp".into();
        songs[SONG_CREDITS] = "credits.hmp".into();

        let mut count = DEFAULT_SONG_SLOTS;
        for (i, slot) in songs.iter_mut().enumerate().skip(SONG_FIRST_LEVEL_SONG) {
            let padded = format!("game{:02}.hmp", i - SONG_FIRST_LEVEL_SONG + 1);
            let plain = format!("game{}.hmp", i - SONG_FIRST_LEVEL_SONG);

            if search.exists(&padded) {
                *slot = padded;
            } else if search.exists(&plain) {
                *slot = plain;
            } else {
                count = i;
                break;
            }
        }

        songs.truncate(count);
        debug!("Using default song set with {} songs", songs.len());
        Self { songs }
    }

    pub(crate) fn len(&self) -> usize {
        self.songs.len()
    }

    /// The file for `songnum`, or `None` when it is out of range or empty.
    pub(crate) fn get(&self, songnum: usize) -> Option<&str> {
        self.songs.get(songnum).map(String::as_str).filter(|s| !s.is_empty())
    }

    /// Number of level songs, i.e. entries past the fixed songs.
    pub(crate) fn level_songs(&self) -> usize {
        self.len().saturating_sub(SONG_FIRST_LEVEL_SONG)
    }
}

/// Reads manifest lines, keeping the first token of each line when its
/// extension is playable.
pub(crate) fn parse_manifest(text: &str, mixer: bool) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|token| token.chars().take(MAX_SONG_NAME).collect::<String>())
        .filter(|name| playable_extension(name, mixer))
        .collect()
}
