// Hide the console window on Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::{io, process::ExitCode, thread};
use twitch_watcher::{
    config::{load_dotenv, Config},
    lifecycle::StopSignal,
    logging::{init_logging, report_fatal},
    notifier::BrowserNotifier,
    tray,
    twitch::{TwitchAuth, TwitchStreams},
    utils::{console_logging_enabled, log_dir},
    watcher::Watcher,
};

fn main() -> ExitCode {
    // Before logging, so the .env file can also set the log location.
    let dotenv_path = load_dotenv();

    // Logging failures must not stop the watcher; fall back to stderr.
    let guard = match init_logging(&log_dir(), console_logging_enabled()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    match &dotenv_path {
        Some(path) => tracing::info!("Loaded .env from {}", path.display()),
        None => tracing::info!("No .env file found, using process environment variables"),
    }

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            report_fatal(&e, guard.is_some(), io::stderr());
            return ExitCode::FAILURE;
        }
    };

    let mut watcher = Watcher::new(
        &cfg,
        TwitchAuth::new(&cfg),
        TwitchStreams::new(&cfg),
        BrowserNotifier,
    );

    // The loop never starts without a first token.
    if let Err(e) = watcher.initialize() {
        if guard.is_none() {
            eprintln!("Failed to get Twitch token: {e}");
        }
        return ExitCode::FAILURE;
    }

    let stop = StopSignal::new();

    let watch_stop = stop.clone();
    let watch_thread = thread::Builder::new()
        .name("watch-loop".into())
        .spawn(move || {
            if let Err(e) = watcher.run(&watch_stop) {
                tracing::error!("Watch loop failed to start: {}", e);
            }
        });
    let watch_thread = match watch_thread {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Failed to spawn watch loop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The tray owns the main thread (macOS requires it) until "Quit".
    if let Err(e) = tray::run(&cfg.channel_login, stop) {
        tracing::error!(
            "System tray unavailable ({}); watching until the process is terminated",
            e
        );
    }

    if watch_thread.join().is_err() {
        tracing::error!("Watch loop panicked");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
