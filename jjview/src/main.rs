//! jjview: a live terminal browser for jj repositories.
//!
//! Entry point for the `jjview` binary. Wires together configuration
//! (`config`), file logging (`logging`), the terminal lifecycle (`tui`), the
//! unified event bus (`event`), the jj worker thread (`jj`), the filesystem
//! watcher (`watcher`) and the UI (`app`, `ui`).
//!
//! # Startup sequence
//!
//! 1. Parse flags, start logging, load the config file, locate the workspace.
//!    Everything that can fail fatally happens here, before the terminal is
//!    touched, so errors print normally.
//! 2. `install_panic_hook()` restores the terminal before a panic message.
//! 3. `register_sigterm()` returns the flag polled by the event loop.
//! 4. Spawn the jj worker and, unless disabled, the watcher and its debouncer.
//! 5. `init_tui()`, then request the first listing.
//!
//! `restore_tui()` runs after the event loop exits, whatever the reason. The
//! `?` operator is only used before `init_tui()`; a draw error is kept and
//! returned after the terminal has been restored.

mod app;
mod config;
mod event;
mod jj;
mod logging;
mod theme;
mod tui;
mod ui;
mod watcher;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info, warn};

use crate::config::{Cli, Settings};
use crate::event::AppEvent;
use crate::jj::runner::{find_workspace_root, JjRunner};
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config_path = config::config_path();
    let file_config = config::load(&config_path).unwrap_or_else(|err| {
        eprintln!("jjview: {err}; using defaults");
        warn!(error = %err, "ignoring config file");
        config::FileConfig::default()
    });
    let settings = Settings::resolve(cli, file_config);

    let start = std::path::absolute(&settings.repository)?;
    let Some(workspace) = find_workspace_root(&start) else {
        eprintln!("jjview: no jj workspace found at or above {}", start.display());
        return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no jj workspace"));
    };
    info!(workspace = %workspace.display(), revset = ?settings.revset, "starting");

    let theme = theme::Theme::from_name(&settings.theme);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;

    let handler = event::EventHandler::new();
    let (jj_tx, jj_rx) = crossbeam_channel::unbounded();
    let runner = JjRunner::new(&settings.jj_binary, &workspace);
    let worker_events = handler.tx.clone();
    let worker = std::thread::Builder::new()
        .name("jj-worker".into())
        .spawn(move || jj::worker::jj_worker_loop(runner, jj_rx, worker_events))?;

    let mut state = app::AppState::new(settings.revset.clone(), settings.scroll_lines, Some(jj_tx));

    let watch = if settings.watch {
        match watcher::start(&workspace, Arc::new(watcher::NoFilter)) {
            Ok(handle) => {
                watcher::spawn_debouncer(handle.changes(), handler.tx.clone(), settings.debounce)?;
                state.watching = true;
                Some(handle)
            }
            Err(err) => {
                error!(error = %err, "filesystem watcher failed to start");
                state.set_sticky_error(format!("auto-refresh disabled: {err}"));
                None
            }
        }
    } else {
        None
    };

    let mut terminal = tui::init_tui()?;
    event::spawn_event_task(handler.tx.clone());
    drop(handler.tx);
    let mut rx = handler.rx;

    state.request_refresh();

    // Event loop: exits only via `break`, never via `?`.
    let mut result: std::io::Result<()> = Ok(());
    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(err) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            error!(error = %err, "draw failed");
                            result = Err(err);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state);
                    }
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize) => {}
                    Some(AppEvent::Tick) => state.on_tick(Instant::now()),
                    Some(AppEvent::FileChanged) => {
                        tracing::debug!("workspace changed, refreshing");
                        state.request_refresh();
                    }
                    Some(AppEvent::JjResult(payload)) => state.apply_jj_result(*payload),
                    None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;

    // Closing the request channel ends the worker once its current jj call returns.
    state.jj_tx = None;
    if let Some(handle) = watch {
        handle.close();
    }
    if worker.join().is_err() {
        error!("jj worker panicked");
    }
    info!("exiting");
    result
}
