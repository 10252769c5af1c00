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

//! Digital sound effects.
//!
//! Sound calls go through whichever [`SoundBackend`] was selected at start
//! up. Both backends are a [`TableBackend`] over the software
//! [`ChannelTable`] and differ only in their [`Library`] parameters.

pub(crate) mod channels;

use std::marker::PhantomData;

use log::{debug, info};
use thiserror::Error;

use crate::{
    args::SoundSystem,
    config::MAX_VOLUME,
    digi::channels::{CHANNEL_MAX_VOLUME, ChannelTable, SoundStart},
};

pub(crate) const SAMPLE_RATE_11K: u32 = 11025;
pub(crate) const SAMPLE_RATE_22K: u32 = 22050;
pub(crate) const SAMPLE_RATE_44K: u32 = 44100;

/// Loudest master volume.
pub(crate) const SOUND_MAX_VOLUME: u32 = 0x8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SoundError {
    #[error("unsupported sample rate {0} Hz")]
    UnsupportedRate(u32),

    #[error("{0} is already initialised")]
    AlreadyInitialised(&'static str),
}

/// Operations every sound backend provides.
pub(crate) trait SoundBackend {
    fn name(&self) -> &'static str;
    fn init(&mut self, sample_rate: u32) -> Result<(), SoundError>;
    fn close(&mut self);
    fn reset(&mut self);
    fn set_channel_volume(&mut self, channel: usize, volume: u32);
    fn set_channel_pan(&mut self, channel: usize, pan: u32);
    fn start_sound(&mut self, start: SoundStart) -> Option<usize>;
    fn stop_sound(&mut self, channel: usize);
    fn end_sound(&mut self, channel: usize);
    fn is_channel_playing(&self, channel: usize) -> bool;
    fn stop_all_channels(&mut self);
    fn set_digi_volume(&mut self, volume: u32);

    fn max_channels(&self) -> usize;
    fn voices(&self) -> usize;
    /// Volume `channel` is heard at on the library's own scale, with the
    /// master volume applied.
    fn output_volume(&self, channel: usize) -> Option<u32>;
    fn volume_scale(&self) -> u32;
    fn advance(&mut self, frames: u32);
}

/// Fixed parameters of an audio library.
pub(crate) trait Library {
    const NAME: &'static str;
    const CHANNELS: usize;
    /// Full channel volume on the library's scale.
    const VOLUME_SCALE: u32;
}

/// The mixing library. Channel volumes go out on its 0..=128 scale.
#[derive(Debug)]
pub(crate) struct Mixer;

impl Library for Mixer {
    const NAME: &'static str = "SDL_mixer";
    const CHANNELS: usize = 16;
    const VOLUME_SCALE: u32 = 128;
}

/// Plain audio callback, mixed in software at full channel precision.
#[derive(Debug)]
pub(crate) struct Plain;

impl Library for Plain {
    const NAME: &'static str = "SDL audio";
    const CHANNELS: usize = 32;
    const VOLUME_SCALE: u32 = CHANNEL_MAX_VOLUME;
}

pub(crate) type MixerBackend = TableBackend<Mixer>;
pub(crate) type PlainBackend = TableBackend<Plain>;

fn check_rate(sample_rate: u32) -> Result<(), SoundError> {
    match sample_rate {
        SAMPLE_RATE_11K | SAMPLE_RATE_22K | SAMPLE_RATE_44K => Ok(()),
        rate => Err(SoundError::UnsupportedRate(rate)),
    }
}

/// A backend over a [`ChannelTable`] sized and scaled for library `L`.
#[derive(Debug)]
pub(crate) struct TableBackend<L> {
    table: ChannelTable,
    sample_rate: Option<u32>,
    volume: u32,
    library: PhantomData<L>,
}

impl<L: Library> TableBackend<L> {
    pub(crate) fn new() -> Self {
        Self {
            table: ChannelTable::new(L::CHANNELS),
            sample_rate: None,
            volume: SOUND_MAX_VOLUME,
            library: PhantomData,
        }
    }
}

impl<L: Library> SoundBackend for TableBackend<L> {
    fn name(&self) -> &'static str {
        L::NAME
    }

    fn init(&mut self, sample_rate: u32) -> Result<(), SoundError> {
        if self.sample_rate.is_some() {
            return Err(SoundError::AlreadyInitialised(L::NAME));
        }
        check_rate(sample_rate)?;
        self.sample_rate = Some(sample_rate);
        info!("{} opened at {sample_rate} Hz with {} channels", L::NAME, L::CHANNELS);
        Ok(())
    }

    fn close(&mut self) {
        self.table.stop_all();
        self.sample_rate = None;
    }

    fn reset(&mut self) {
        debug!("Resetting {} channels", L::NAME);
        self.table.stop_all();
    }

    fn set_channel_volume(&mut self, channel: usize, volume: u32) {
        self.table.set_volume(channel, volume);
    }

    fn set_channel_pan(&mut self, channel: usize, pan: u32) {
        self.table.set_pan(channel, pan);
    }

    fn start_sound(&mut self, start: SoundStart) -> Option<usize> {
        self.sample_rate?;
        self.table.start(start)
    }

    fn stop_sound(&mut self, channel: usize) {
        self.table.stop(channel);
    }

    fn end_sound(&mut self, channel: usize) {
        self.table.end(channel);
    }

    fn is_channel_playing(&self, channel: usize) -> bool {
        self.table.is_playing(channel)
    }

    fn stop_all_channels(&mut self) {
        self.table.stop_all();
    }

    fn set_digi_volume(&mut self, volume: u32) {
        self.volume = volume.min(SOUND_MAX_VOLUME);
    }

    fn max_channels(&self) -> usize {
        self.table.len()
    }

    fn voices(&self) -> usize {
        self.table.playing_count()
    }

    fn output_volume(&self, channel: usize) -> Option<u32> {
        let c = self.table.get(channel).filter(|c| c.sound.is_some())?;
        let scaled = u64::from(c.volume) * u64::from(self.volume) * u64::from(L::VOLUME_SCALE)
            / (u64::from(CHANNEL_MAX_VOLUME) * u64::from(SOUND_MAX_VOLUME));
        Some(scaled as u32)
    }

    fn volume_scale(&self) -> u32 {
        L::VOLUME_SCALE
    }

    fn advance(&mut self, frames: u32) {
        self.table.advance(frames);
    }
}

/// Returns the backend for `system`.
pub(crate) fn select_system(system: SoundSystem) -> Box<dyn SoundBackend> {
    match system {
        SoundSystem::Mixer => {
            info!("Using SDL_mixer library");
            Box::new(MixerBackend::new())
        }
        SoundSystem::Plain => {
            info!("Using plain old SDL audio");
            Box::new(PlainBackend::new())
        }
    }
}

/// The sound effect layer the rest of the program talks to.
pub(crate) struct Digi {
    backend: Box<dyn SoundBackend>,
    initialised: bool,
    volume: u8,
    reverse_stereo: bool,
}

impl Digi {
    pub(crate) fn new(system: SoundSystem) -> Self {
        Self {
            backend: select_system(system),
            initialised: false,
            volume: MAX_VOLUME,
            reverse_stereo: false,
        }
    }

    pub(crate) fn init(&mut self, sample_rate: u32) -> Result<(), SoundError> {
        self.backend.init(sample_rate)?;
        self.initialised = true;
        self.set_digi_volume(self.volume);
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        self.backend.close();
        self.initialised = false;
    }

    pub(crate) fn reset(&mut self) {
        self.backend.reset();
    }

    pub(crate) fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub(crate) fn set_reverse_stereo(&mut self, reverse: bool) {
        self.reverse_stereo = reverse;
    }

    fn pan(&self, pan: u32) -> u32 {
        if self.reverse_stereo { 0xffff_u32.saturating_sub(pan) } else { pan }
    }

    pub(crate) fn set_channel_volume(&mut self, channel: usize, volume: u32) {
        self.backend.set_channel_volume(channel, volume);
    }

    pub(crate) fn set_channel_pan(&mut self, channel: usize, pan: u32) {
        let pan = self.pan(pan);
        self.backend.set_channel_pan(channel, pan);
    }

    pub(crate) fn start_sound(&mut self, start: SoundStart) -> Option<usize> {
        let start = SoundStart {
            pan: self.pan(start.pan),
            ..start
        };
        self.backend.start_sound(start)
    }

    pub(crate) fn stop_sound(&mut self, channel: usize) {
        self.backend.stop_sound(channel);
    }

    pub(crate) fn end_sound(&mut self, channel: usize) {
        self.backend.end_sound(channel);
    }

    pub(crate) fn is_channel_playing(&self, channel: usize) -> bool {
        self.backend.is_channel_playing(channel)
    }

    pub(crate) fn stop_all_channels(&mut self) {
        self.backend.stop_all_channels();
    }

    /// Sets the master volume on the 0..=8 scale used by the menus.
    pub(crate) fn set_digi_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
        let scaled = u32::from(self.volume) * SOUND_MAX_VOLUME / u32::from(MAX_VOLUME);
        self.backend.set_digi_volume(scaled);
    }

    pub(crate) fn digi_volume(&self) -> u8 {
        self.volume
    }

    /// Plays a sound once at full channel volume, centred.
    pub(crate) fn play_sample_once(&mut self, sound: u16, length: u32) -> Option<usize> {
        self.start_sound(SoundStart::once(sound, length, CHANNEL_MAX_VOLUME))
    }

    /// Number of channels currently playing.
    pub(crate) fn debug_voices(&self) -> usize {
        if !self.initialised {
            return 0;
        }
        let voices = self.backend.voices();
        debug!("{voices} voices playing");
        voices
    }

    pub(crate) fn max_channels(&self) -> usize {
        self.backend.max_channels()
    }

    /// How loud `channel` plays, as a fraction of the library's full scale.
    pub(crate) fn channel_volume(&self, channel: usize) -> Option<(u32, u32)> {
        self.backend
            .output_volume(channel)
            .map(|volume| (volume, self.backend.volume_scale()))
    }

    pub(crate) fn advance(&mut self, frames: u32) {
        self.backend.advance(frames);
    }
}
