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

//! MPV-backed music playback engine and event processing.
//!
//! The worker thread owns the `libmpv` context. It drains [`MusicCommand`]s
//! from the UI and turns MPV property changes and end-of-file notifications
//! into [`AppEvent`]s.
//!
//! A sequence of files is loaded as one MPV playlist. The worker counts
//! files that reach their natural end; once the last one does, and the
//! sequence is not looping, the sequence's finished hook is sent back.

use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use anyhow::{Context, Result};
use log::debug;
use mpv::Format;

use crate::{
    config::MAX_VOLUME,
    events::AppEvent,
    player::{MpvMusic, PlayerState},
    songs::FinishedHook,
};

#[derive(Debug)]
pub(crate) enum MusicCommand {
    PlayFiles {
        files: Vec<PathBuf>,
        looping: bool,
        on_finished: Option<FinishedHook>,
    },
    Stop,
    Pause,
    Resume,
    TogglePause,
    SetVolume(u8),
}

/// The sequence currently loaded into MPV.
#[derive(Debug, Default)]
struct Sequence {
    remaining: usize,
    looping: bool,
    on_finished: Option<FinishedHook>,
}

impl Sequence {
    /// Counts one file reaching its end. Returns the hook to run when that
    /// was the last file of a sequence that does not loop.
    fn file_finished(&mut self) -> Option<FinishedHook> {
        if self.looping || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.remaining == 0 { self.on_finished.take() } else { None }
    }
}

/// Maps the 0..=8 music volume scale to MPV's percentage.
fn mpv_volume(volume: u8) -> u32 {
    u32::from(volume.min(MAX_VOLUME)) * 100 / u32::from(MAX_VOLUME)
}

/// Spawns the music worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and broadcast as
/// a fatal application event.
pub(crate) fn spawn_player_worker(command_rx: Receiver<MusicCommand>, event_tx: Sender<AppEvent>) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = music_player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the music backend.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the internal
/// command/event loops encounter an unrecoverable failure.
fn music_player_worker(command_rx: Receiver<MusicCommand>, event_tx: Sender<AppEvent>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder.set_option("vo", "null").context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<&str>("media-title", 0)
        .context("Failed to observe media-title")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<f64>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    let mut is_paused = false;
    let mut is_idle = true;
    let mut player_state = PlayerState::Stopped;
    let mut sequence = Sequence::default();

    loop {
        process_commands(&mut handler, &command_rx, &mut sequence)?;
        process_mpv_events(
            &mut handler,
            &mut is_paused,
            &mut is_idle,
            &mut player_state,
            &mut sequence,
            &event_tx,
        )?;
    }
}

/// Drains and executes all pending commands from the application channel.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<MusicCommand>,
    sequence: &mut Sequence,
) -> Result<()> {
    while let Ok(command) = command_rx.try_recv() {
        match command {
            MusicCommand::PlayFiles {
                files,
                looping,
                on_finished,
            } => {
                handler
                    .command(&["playlist-clear"])
                    .context("Failed to clear playlist")?;
                for (i, file) in files.iter().enumerate() {
                    let filename = file.to_string_lossy();
                    let mode = if i == 0 { "replace" } else { "append" };
                    handler
                        .command(&["loadfile", &filename, mode])
                        .context(format!("Failed to load file: {}", &filename))?;
                }
                handler.command(&["set", "loop-playlist", if looping { "inf" } else { "no" }])?;
                handler.set_property("pause", false)?;

                debug!("Playing {} file(s), looping: {}", files.len(), looping);
                *sequence = Sequence {
                    remaining: files.len(),
                    looping,
                    on_finished,
                };
            }
            MusicCommand::Stop => {
                *sequence = Sequence::default();
                handler.command(&["stop"])?;
            }
            MusicCommand::Pause => {
                handler.set_property("pause", true)?;
            }
            MusicCommand::Resume => {
                handler.set_property("pause", false)?;
            }
            MusicCommand::TogglePause => {
                handler.command(&["cycle", "pause"])?;
            }
            MusicCommand::SetVolume(volume) => {
                handler.command(&["set", "volume", &mpv_volume(volume).to_string()])?;
            }
        }
    }

    Ok(())
}

/// Polls for MPV events and synchronizes the application state.
///
/// This function waits for up to 50ms for an event from the MPV context.
/// If an event occurs, it updates internal flags and broadcasts any necessary
/// [`AppEvent`]s to the UI.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    is_paused: &mut bool,
    is_idle: &mut bool,
    current_state: &mut PlayerState,
    sequence: &mut Sequence,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        let app_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("media-title", Format::Str(title)) => Some(AppEvent::TitleChanged(title.to_string())),
                ("pause", Format::Flag(pause)) => {
                    *is_paused = pause;
                    None
                }
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => Some(AppEvent::TimeChanged(seconds)),
                ("idle-active", Format::Flag(idle_active)) => {
                    *is_idle = idle_active;
                    None
                }
                _ => None,
            },
            mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF)) => {
                sequence.file_finished().map(AppEvent::MusicFinished)
            }
            mpv::Event::EndFile(Err(e)) => Some(AppEvent::Error(format!("Music playback failed: {e:?}"))),
            _ => None,
        };

        let new_player_state = MpvMusic::player_state(*is_paused, *is_idle);

        if new_player_state != *current_state {
            *current_state = new_player_state;
            event_tx
                .send(AppEvent::PlayerStateChanged(new_player_state))
                .context("Failed to send player state event")?;
        }

        if let Some(event) = app_event {
            event_tx.send(event).context("Failed to send event")?;
        }
    }

    Ok(())
}
