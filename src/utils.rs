use image::{Rgba, RgbaImage};
use std::{env, path::PathBuf, sync::OnceLock, time::Duration};
use ureq::Agent;

/// Name used for the log file, data directory, and tray id.
pub const APP_NAME: &str = "twitch-watcher";

/// Overrides where log files are written.
pub const LOG_DIR_KEY: &str = "TWITCH_WATCHER_LOG_DIR";

/// Set to `0` or `false` to silence console logging.
pub const CONSOLE_LOG_KEY: &str = "TWITCH_WATCHER_CONSOLE_LOG";

/// Upper bound for every request to Twitch.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

static USER_AGENT: OnceLock<String> = OnceLock::new();

pub fn user_agent() -> &'static str {
    USER_AGENT
        .get_or_init(|| format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
        .as_str()
}

/// Builds a blocking HTTP agent with a global timeout.
///
/// HTTP error statuses surface as `ureq::Error::StatusCode`.
pub fn http_agent(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(timeout))
        .user_agent(user_agent())
        .build();
    config.into()
}

/// Directory for log files: the override variable, then the platform's local
/// data directory, then the working directory.
pub fn log_dir() -> PathBuf {
    if let Some(dir) = env::var_os(LOG_DIR_KEY).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Whether log lines should also go to the console.
pub fn console_logging_enabled() -> bool {
    match env::var(CONSOLE_LOG_KEY) {
        Ok(value) => !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        Err(_) => true,
    }
}

pub const TRAY_ICON_SIZE: u32 = 64;
const TRAY_BACKGROUND: Rgba<u8> = Rgba([40, 40, 40, 255]);
const TRAY_DISC: Rgba<u8> = Rgba([128, 0, 200, 255]);
const TRAY_DOT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Draws the tray icon: a purple disc with a white centre dot on a dark square.
pub fn create_tray_image() -> RgbaImage {
    let size = TRAY_ICON_SIZE;
    let center = size as f32 / 2.0;
    let disc_radius = center - 8.0;
    let dot_radius = center - 24.0;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance <= dot_radius {
            TRAY_DOT
        } else if distance <= disc_radius {
            TRAY_DISC
        } else {
            TRAY_BACKGROUND
        }
    })
}
