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

//! Sound effects and music settings.
//!
//! Every change is written to the config straight away. Changes that affect
//! what music should be playing restart it: the music type always, the
//! track order options only while a game is running.

use crate::{
    args::Edition,
    config::{MAX_VOLUME, MusicType, PlayOrder},
    menu::{Menu, MenuDelegate, MenuItem},
    session::{BrowseTarget, MenuRequest, Session},
    songs::{SONG_BRIEFING, SONG_CREDITS, SONG_ENDGAME, SONG_ENDLEVEL, SONG_TITLE},
    window::WindowEventResult,
};

/// Played at the new level whenever the effects volume changes.
const SOUND_DROP_BOMB: u16 = 26;

const GROUP_MUSIC_TYPE: u8 = 0;
const GROUP_PLAY_ORDER: u8 = 1;

/// Non-level songs with a custom file, in menu order.
const CUSTOM_SONGS: [(usize, &str); 5] = [
    (SONG_TITLE, "Main menu"),
    (SONG_BRIEFING, "Briefing"),
    (SONG_CREDITS, "Credits"),
    (SONG_ENDLEVEL, "Escape sequence"),
    (SONG_ENDGAME, "Game ending"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SoundItem {
    Label,
    FxVolume,
    MusicVolume,
    ReverseStereo,
    Type(MusicType),
    OrigTrackOrder,
    CdRipBrowse,
    CdRipDir,
    LevelPathBrowse,
    LevelPath,
    Order(PlayOrder),
    SongBrowse(usize),
    SongPath(usize),
}

pub(crate) struct SoundMenu {
    menu: Menu<SoundItem>,
}

impl SoundMenu {
    pub(crate) fn new(session: &Session) -> Self {
        let config = &session.config;
        let music = &config.music;

        let mut items = vec![
            MenuItem::slider(SoundItem::FxVolume, "Effects volume", config.digi_volume, 0, MAX_VOLUME),
            MenuItem::slider(SoundItem::MusicVolume, "Music volume", music.music_volume, 0, MAX_VOLUME),
            MenuItem::checkbox(SoundItem::ReverseStereo, "Reverse stereo", config.reverse_stereo),
            MenuItem::text(SoundItem::Label, ""),
            MenuItem::text(SoundItem::Label, "Music type:"),
        ];

        let mut types = vec![
            (MusicType::None, "No music"),
            (MusicType::Builtin, "Built-in/addon music"),
            (MusicType::Redbook, "CD music"),
        ];
        if !session.args.nosdlmixer {
            types.push((MusicType::Custom, "Jukebox"));
        }
        for (music_type, label) in types {
            items.push(MenuItem::radio(
                SoundItem::Type(music_type),
                label,
                GROUP_MUSIC_TYPE,
                music.music_type == music_type,
            ));
        }

        let order_label = match session.args.edition {
            Edition::Descent1 => "Force Mac CD track order",
            Edition::Descent2 => "Force Descent ][ CD track order",
        };
        items.extend([
            MenuItem::text(SoundItem::Label, ""),
            MenuItem::text(SoundItem::Label, "CD music options:"),
            MenuItem::checkbox(SoundItem::OrigTrackOrder, order_label, music.orig_track_order),
            MenuItem::command(SoundItem::CdRipBrowse, "Ripped CD directory (browse...)"),
            MenuItem::input(SoundItem::CdRipDir, "Directory", &music.cd_rip_dir),
        ]);

        if !session.args.nosdlmixer {
            items.extend([
                MenuItem::text(SoundItem::Label, ""),
                MenuItem::text(SoundItem::Label, "Jukebox options:"),
                MenuItem::command(SoundItem::LevelPathBrowse, "Path for level music (browse...)"),
                MenuItem::input(SoundItem::LevelPath, "Path", &music.level_music_path),
                MenuItem::text(SoundItem::Label, "Level music play order:"),
            ]);
            for (order, label) in [
                (PlayOrder::Continuous, "Continuously"),
                (PlayOrder::Level, "One track per level"),
                (PlayOrder::Random, "Random"),
            ] {
                items.push(MenuItem::radio(
                    SoundItem::Order(order),
                    label,
                    GROUP_PLAY_ORDER,
                    music.level_music_order == order,
                ));
            }

            items.push(MenuItem::text(SoundItem::Label, "Non-level music:"));
            for (song, label) in CUSTOM_SONGS {
                items.push(MenuItem::command(SoundItem::SongBrowse(song), format!("{label} (browse...)")));
                items.push(MenuItem::input(SoundItem::SongPath(song), "File", &music.misc_music[song]));
            }
        }

        Self {
            menu: Menu::new("Sound effects & music", items),
        }
    }
}

impl MenuDelegate for SoundMenu {
    type Key = SoundItem;

    fn menu(&mut self) -> &mut Menu<SoundItem> {
        &mut self.menu
    }

    fn changed(&mut self, key: SoundItem, session: &mut Session) {
        let in_game = session.level.is_some();

        let replay = match key {
            SoundItem::FxVolume => {
                let volume = self.menu.slider_value(key).unwrap_or(0);
                session.config.digi_volume = volume;
                session.digi.set_digi_volume(volume);
                session.digi.play_sample_once(SOUND_DROP_BOMB, session.sample_rate);
                false
            }
            SoundItem::MusicVolume => {
                let volume = self.menu.slider_value(key).unwrap_or(0);
                session.config.music.music_volume = volume;
                session.songs.set_volume(volume);
                false
            }
            SoundItem::ReverseStereo => {
                session.config.reverse_stereo = self.menu.checked(key);
                session.digi.set_reverse_stereo(session.config.reverse_stereo);
                false
            }
            SoundItem::Type(music_type) => {
                session.config.music.music_type = music_type;
                true
            }
            SoundItem::OrigTrackOrder => {
                session.config.music.orig_track_order = self.menu.checked(key);
                in_game
            }
            SoundItem::Order(order) => {
                session.config.music.level_music_order = order;
                in_game
            }
            SoundItem::CdRipDir => {
                session.config.music.cd_rip_dir = self.menu.input_value(key).unwrap_or_default().to_string();
                false
            }
            SoundItem::LevelPath => {
                session.config.music.level_music_path = self.menu.input_value(key).unwrap_or_default().to_string();
                false
            }
            SoundItem::SongPath(song) => {
                if let Some(slot) = session.config.music.misc_music.get_mut(song) {
                    *slot = self.menu.input_value(key).unwrap_or_default().to_string();
                }
                false
            }
            SoundItem::Label | SoundItem::CdRipBrowse | SoundItem::LevelPathBrowse | SoundItem::SongBrowse(_) => false,
        };

        session.sync_music_settings();
        if replay {
            session.replay_music();
        }
    }

    fn selected(&mut self, key: SoundItem, session: &mut Session) -> WindowEventResult {
        let target = match key {
            SoundItem::CdRipBrowse => Some(BrowseTarget::CdRipDir),
            SoundItem::LevelPathBrowse => Some(BrowseTarget::LevelMusic),
            SoundItem::SongBrowse(song) => Some(BrowseTarget::Song(song)),
            _ => None,
        };
        if let Some(target) = target {
            session.request(MenuRequest::Browse(target));
        }
        WindowEventResult::Handled
    }

    fn activated(&mut self, session: &mut Session) {
        let music = &session.config.music;
        self.menu.set_input(SoundItem::CdRipDir, &music.cd_rip_dir);
        self.menu.set_input(SoundItem::LevelPath, &music.level_music_path);
        for (song, _) in CUSTOM_SONGS {
            self.menu.set_input(SoundItem::SongPath(song), &music.misc_music[song]);
        }
    }
}
