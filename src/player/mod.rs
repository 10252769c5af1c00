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

//! Music playback backend.
//!
//! This module provides the [`MusicBackend`] interface the sequencer plays
//! through, and [`MpvMusic`], its implementation on top of a background MPV
//! worker. The worker reports what it is doing back to the main event loop as
//! [`AppEvent`]s, including the end of a sequence of files.

mod commands;

use std::{path::PathBuf, sync::mpsc};

use anyhow::Result;
use log::warn;

use crate::{events::AppEvent, player::commands::MusicCommand, songs::FinishedHook};

/// Represents the current playback status of the audio engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

/// Something that can play a sequence of music files.
///
/// `play` only reports whether playback could be started. When a sequence
/// that is not looping runs out, the backend reports `on_finished` through
/// the event loop.
pub(crate) trait MusicBackend {
    fn play(&mut self, files: Vec<PathBuf>, looping: bool, on_finished: Option<FinishedHook>) -> bool;
    fn stop(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn pause_resume(&mut self);

    /// Sets the volume on the 0..=8 music volume scale.
    fn set_volume(&mut self, volume: u8);
}

/// A handle to the MPV worker.
///
/// Handles are cheap to clone and all clones drive the same worker, so the
/// sequencer and the CD backend can share one player.
#[derive(Clone)]
pub(crate) struct MpvMusic {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<MusicCommand>,
}

impl MpvMusic {
    /// Spawns the worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (like
    ///   progress updates, finished sequences or errors) back to the main
    ///   event loop.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<MusicCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Ok(Self { command_tx })
    }

    // Maps internal audio backend flags to a simplified [`PlayerState`].
    fn player_state(is_paused: bool, is_idle: bool) -> PlayerState {
        if is_idle {
            PlayerState::Stopped
        } else if is_paused {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }

    fn send(&self, command: MusicCommand) -> bool {
        match self.command_tx.send(command) {
            Ok(()) => true,
            Err(e) => {
                warn!("Music worker is gone: {e}");
                false
            }
        }
    }
}

impl MusicBackend for MpvMusic {
    fn play(&mut self, files: Vec<PathBuf>, looping: bool, on_finished: Option<FinishedHook>) -> bool {
        if files.is_empty() {
            return false;
        }
        self.send(MusicCommand::PlayFiles {
            files,
            looping,
            on_finished,
        })
    }

    fn stop(&mut self) {
        self.send(MusicCommand::Stop);
    }

    fn pause(&mut self) {
        self.send(MusicCommand::Pause);
    }

    fn resume(&mut self) {
        self.send(MusicCommand::Resume);
    }

    fn pause_resume(&mut self) {
        self.send(MusicCommand::TogglePause);
    }

    fn set_volume(&mut self, volume: u8) {
        self.send(MusicCommand::SetVolume(volume));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, path::PathBuf, rc::Rc};

    use super::MusicBackend;
    use crate::songs::FinishedHook;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Play {
        pub(crate) files: Vec<PathBuf>,
        pub(crate) looping: bool,
        pub(crate) on_finished: Option<FinishedHook>,
    }

    #[derive(Debug, Default)]
    struct State {
        plays: Vec<Play>,
        stops: usize,
        pause_toggles: usize,
        paused: bool,
        volume: u8,
    }

    /// Records what it is asked to play. Clones share their record.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct FakeMusic(Rc<RefCell<State>>);

    impl FakeMusic {
        pub(crate) fn last_play(&self) -> Option<Play> {
            self.0.borrow().plays.last().cloned()
        }

        pub(crate) fn play_count(&self) -> usize {
            self.0.borrow().plays.len()
        }

        pub(crate) fn stop_count(&self) -> usize {
            self.0.borrow().stops
        }

        pub(crate) fn pause_toggles(&self) -> usize {
            self.0.borrow().pause_toggles
        }

        pub(crate) fn is_paused(&self) -> bool {
            self.0.borrow().paused
        }

        pub(crate) fn volume(&self) -> u8 {
            self.0.borrow().volume
        }
    }

    impl MusicBackend for FakeMusic {
        fn play(&mut self, files: Vec<PathBuf>, looping: bool, on_finished: Option<FinishedHook>) -> bool {
            self.0.borrow_mut().plays.push(Play {
                files,
                looping,
                on_finished,
            });
            true
        }

        fn stop(&mut self) {
            self.0.borrow_mut().stops += 1;
        }

        fn pause(&mut self) {
            self.0.borrow_mut().paused = true;
        }

        fn resume(&mut self) {
            self.0.borrow_mut().paused = false;
        }

        fn pause_resume(&mut self) {
            let mut state = self.0.borrow_mut();
            state.pause_toggles += 1;
            state.paused = !state.paused;
        }

        fn set_volume(&mut self, volume: u8) {
            self.0.borrow_mut().volume = volume;
        }
    }
}
