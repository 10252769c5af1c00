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

//! # Descent port layer.
//!
//! The platform side of a Descent port, run inside a terminal: menus on a
//! window stack, mouse, keyboard and joystick drivers, the music sequencer and
//! the digital sound layer.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** owns all state, dispatches events to the window
//!   stack and renders.
//! * **Background Workers** read terminal input, produce periodic ticks and
//!   drive the MPV music player.
//! * All workers talk to the main thread through one `std::sync::mpsc`
//!   channel of [`AppEvent`]s.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash.

mod args;
mod browser;
mod config;
mod digi;
mod events;
mod input;
mod menu;
mod player;
mod render;
mod session;
mod songs;
mod theme;
mod timer;
mod util;
mod viewport;
mod window;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self},
    execute,
    terminal::{self as term, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Builder, Env, Target};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::File,
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    args::{Edition, RuntimeArgs, SoundSystem},
    config::GameConfig,
    digi::{Digi, SAMPLE_RATE_11K, SAMPLE_RATE_22K},
    events::{AppEvent, key_handlers::process_global_event, process_events},
    input::InputDrivers,
    menu::{MenuWindow, main_menu::MainMenu},
    player::{MpvMusic, PlayerState},
    session::Session,
    songs::{MusicFlags, SONG_TITLE, Songs, redbook::RipDirectoryCd},
    theme::Theme,
    timer::Timer,
    util::search_path::SearchPath,
    window::WindowStack,
};

/// Application state.
struct App {
    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub timer: Timer,
    pub input: InputDrivers,
    pub windows: WindowStack<Session>,
    pub session: Session,

    pub player_state: PlayerState,
    pub player_track_name: Option<String>,
    pub player_time: Option<u64>,

    pub quit: bool,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: GameConfig, args: RuntimeArgs) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let music = MpvMusic::new(event_tx.clone()).context("Failed to start music player")?;
        let redbook = RipDirectoryCd::new(config.music.cd_rip_dir.clone(), config.music.cd_disc_id, music.clone());

        let flags = MusicFlags {
            nomusic: args.nomusic,
            nosdlmixer: args.nosdlmixer,
        };
        let songs = Songs::new(
            args.edition,
            flags,
            SearchPath::new(args.data_dirs.clone()),
            config.music.clone(),
            Box::new(music),
            Box::new(redbook),
        );

        let system = if args.mixer_available() { SoundSystem::Mixer } else { SoundSystem::Plain };
        let mut digi = Digi::new(system);
        let sample_rate = match args.edition {
            Edition::Descent1 => SAMPLE_RATE_11K,
            Edition::Descent2 => SAMPLE_RATE_22K,
        };
        if let Err(e) = digi.init(sample_rate) {
            error!("Sound initialisation failed: {e}");
        }

        let input = InputDrivers::new(!args.nomouse, !args.nocursor);

        let (width, height) = term::size().unwrap_or((80, 25));
        let windows = WindowStack::new(events::window_area(width, height));

        Ok(Self {
            theme: Theme::default(),
            event_tx,
            event_rx,
            timer: Timer::new(),
            input,
            windows,
            session: Session::new(config, args, songs, digi, sample_rate),
            player_state: PlayerState::Stopped,
            player_track_name: None,
            player_time: None,
            quit: false,
        })
    }
}

/// The entry point of the application.
///
/// Parses the command line, starts logging, loads the saved settings, manages
/// the terminal lifecycle, and returns an error if any part of the execution
/// fails.
fn main() -> Result<()> {
    let args = RuntimeArgs::parse();

    init_logging(&args)?;

    let config = config::load_config();

    let mut app = App::new(config, args).context("Failed to initalise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    app.windows.close_all(&mut app.session);
    app.session.songs.uninit();
    app.session.digi.close();
    app.input.close();

    res.context("Application error occurred")
}

/// Sends log output to the log file, the terminal belongs to the UI.
fn init_logging(args: &RuntimeArgs) -> Result<()> {
    let file = File::create(&args.log_file)
        .with_context(|| format!("Failed to create log file {}", args.log_file.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
/// * Turns on mouse and focus reporting.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        util::term::set_terminal_bg(&hex).ok();
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    if !app.session.args.nomouse {
        util::term::enable_mouse().context("Failed to enable mouse capture")?;
    }
    util::term::enable_focus_reports().ok();

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is designed to be "best-effort" and does not return a result,
/// as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    util::term::disable_mouse().ok();
    util::term::disable_focus_reports().ok();
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns two long-running background threads:
/// * An input thread to read terminal keyboard, mouse and resize events.
/// * A tick thread that drives idle processing and UI refreshes.
///
/// It then opens the main menu, starts the title music and hands control to
/// [`process_events`].
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn a thread to forward raw terminal events to the application.
    let tx_input = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if tx_input.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx_input.send(AppEvent::FatalError(format!("Terminal input failure: {e}")));
                    break;
                }
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if tx_tick.send(AppEvent::Tick).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(250));
        }
    });

    app.windows.set_default_handler(process_global_event);

    let mut main_menu = MainMenu::new();
    let placement = MenuWindow::placement(&mut main_menu);
    app.windows.create(placement, MenuWindow(main_menu), &mut app.session);

    app.session.songs.play_song(SONG_TITLE, true);
    info!("Started with {:?} music", app.session.songs.music_type());

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
