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

//! Software sound channel table shared by both sound backends.
//!
//! There is no mixing here. A channel only tracks what was started on it and
//! how much of the sample is left, which is what the rest of the game asks
//! about.

use log::debug;

/// Full volume for a channel, on the digital volume scale.
pub(crate) const CHANNEL_MAX_VOLUME: u32 = 0x10000;

/// Centre pan; 0 is hard left and `0xffff` hard right.
pub(crate) const PAN_CENTRE: u32 = 0x7fff;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Channel {
    pub(crate) sound: Option<u16>,
    pub(crate) volume: u32,
    pub(crate) pan: u32,
    pub(crate) looping: bool,
    pub(crate) loop_range: Option<(u32, u32)>,
    pub(crate) length: u32,
    pub(crate) position: u32,
}

impl Channel {
    fn is_playing(&self) -> bool {
        self.sound.is_some()
    }
}

/// Parameters of a sound to start on a free channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SoundStart {
    pub(crate) sound: u16,
    /// Sample length in frames.
    pub(crate) length: u32,
    pub(crate) volume: u32,
    pub(crate) pan: u32,
    pub(crate) looping: bool,
    pub(crate) loop_range: Option<(u32, u32)>,
}

impl SoundStart {
    pub(crate) fn once(sound: u16, length: u32, volume: u32) -> Self {
        Self {
            sound,
            length,
            volume,
            pan: PAN_CENTRE,
            looping: false,
            loop_range: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ChannelTable {
    channels: Vec<Channel>,
    next: usize,
}

impl ChannelTable {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            channels: vec![Channel::default(); count],
            next: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }

    pub(crate) fn get(&self, channel: usize) -> Option<&Channel> {
        self.channels.get(channel)
    }

    /// Starts a sound on the next free channel after the last one used. When
    /// every channel is busy the oldest non-looping sound is cut off; if all
    /// of them loop, nothing is started.
    pub(crate) fn start(&mut self, start: SoundStart) -> Option<usize> {
        let count = self.channels.len();
        if count == 0 {
            return None;
        }

        let free = (0..count)
            .map(|i| (self.next + i) % count)
            .find(|&c| !self.channels[c].is_playing());
        let channel = match free {
            Some(c) => c,
            None => {
                let c = (0..count)
                    .map(|i| (self.next + i) % count)
                    .find(|&c| !self.channels[c].looping)?;
                debug!("All {count} channels busy, cutting off channel {c}");
                c
            }
        };

        self.channels[channel] = Channel {
            sound: Some(start.sound),
            volume: start.volume.min(CHANNEL_MAX_VOLUME),
            pan: start.pan,
            looping: start.looping,
            loop_range: start.loop_range,
            length: start.length,
            position: 0,
        };
        self.next = (channel + 1) % count;
        Some(channel)
    }

    pub(crate) fn set_volume(&mut self, channel: usize, volume: u32) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.volume = volume.min(CHANNEL_MAX_VOLUME);
        }
    }

    pub(crate) fn set_pan(&mut self, channel: usize, pan: u32) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.pan = pan;
        }
    }

    pub(crate) fn stop(&mut self, channel: usize) {
        if let Some(c) = self.channels.get_mut(channel) {
            *c = Channel::default();
        }
    }

    /// Lets a looping sound finish its current pass instead of cutting it.
    pub(crate) fn end(&mut self, channel: usize) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.looping = false;
        }
    }

    pub(crate) fn is_playing(&self, channel: usize) -> bool {
        self.channels.get(channel).is_some_and(Channel::is_playing)
    }

    pub(crate) fn stop_all(&mut self) {
        self.channels.fill(Channel::default());
    }

    pub(crate) fn playing_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_playing()).count()
    }

    /// Moves every playing sound on by `frames`. Looping sounds wrap back to
    /// the start of their loop range; the rest stop at the end.
    pub(crate) fn advance(&mut self, frames: u32) {
        for c in self.channels.iter_mut().filter(|c| c.is_playing()) {
            let end = c.loop_range.map_or(c.length, |(_, end)| end.min(c.length));
            c.position = c.position.saturating_add(frames);
            if c.position < end {
                continue;
            }

            if c.looping {
                let start = c.loop_range.map_or(0, |(start, _)| start);
                let span = end.saturating_sub(start).max(1);
                c.position = start + (c.position - end) % span;
            } else {
                *c = Channel::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_used_round_robin() {
        let mut table = ChannelTable::new(3);

        assert_eq!(table.start(SoundStart::once(1, 100, CHANNEL_MAX_VOLUME)), Some(0));
        assert_eq!(table.start(SoundStart::once(2, 100, CHANNEL_MAX_VOLUME)), Some(1));
        table.stop(0);
        assert_eq!(table.start(SoundStart::once(3, 100, CHANNEL_MAX_VOLUME)), Some(2));
        assert_eq!(table.start(SoundStart::once(4, 100, CHANNEL_MAX_VOLUME)), Some(0));
    }

    #[test]
    fn full_table_steals_non_looping_channel() {
        let mut table = ChannelTable::new(2);
        let looping = SoundStart {
            looping: true,
            ..SoundStart::once(1, 100, CHANNEL_MAX_VOLUME)
        };

        table.start(looping);
        table.start(SoundStart::once(2, 100, CHANNEL_MAX_VOLUME));

        assert_eq!(table.start(SoundStart::once(3, 100, CHANNEL_MAX_VOLUME)), Some(1));
        assert_eq!(table.get(1).and_then(|c| c.sound), Some(3));

        table.start(looping);
        table.stop(1);
        table.start(looping);
        assert_eq!(table.start(SoundStart::once(4, 100, CHANNEL_MAX_VOLUME)), None);
    }

    #[test]
    fn one_shot_sounds_end_and_loops_wrap() {
        let mut table = ChannelTable::new(2);
        table.start(SoundStart::once(1, 100, CHANNEL_MAX_VOLUME));
        table.start(SoundStart {
            looping: true,
            loop_range: Some((20, 60)),
            ..SoundStart::once(2, 100, CHANNEL_MAX_VOLUME)
        });

        table.advance(70);
        assert_eq!(table.playing_count(), 2);
        assert_eq!(table.get(1).map(|c| c.position), Some(30));

        table.advance(30);
        assert!(!table.is_playing(0));
        assert!(table.is_playing(1));
        assert_eq!(table.get(1).map(|c| c.position), Some(20));
        assert_eq!(table.playing_count(), 1);
    }

    #[test]
    fn ended_loop_plays_out() {
        let mut table = ChannelTable::new(1);
        table.start(SoundStart {
            looping: true,
            ..SoundStart::once(1, 50, CHANNEL_MAX_VOLUME)
        });

        table.end(0);
        table.advance(49);
        assert!(table.is_playing(0));
        table.advance(1);
        assert!(!table.is_playing(0));
    }

    #[test]
    fn out_of_range_channels_are_ignored() {
        let mut table = ChannelTable::new(1);

        table.set_volume(4, 10);
        table.set_pan(4, 10);
        table.stop(4);
        table.end(4);

        assert!(!table.is_playing(4));
    }
}
