//! System tray implementation using tray-icon (Windows/macOS).
//!
//! This module is only compiled on non-Linux platforms.
//! Linux uses the ksni-based implementation in tray_linux.rs.
//!
//! tray-icon needs a platform event loop on the main thread, which winit provides.

use crossbeam_channel::Receiver;
use std::time::Duration;
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, MenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};
use winit::{
    application::ApplicationHandler,
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

use crate::lifecycle::StopSignal;
use crate::utils::create_tray_image;

/// How often the menu channel is drained while idle.
const MENU_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub enum TrayCommand {
    Quit,
}

pub struct Tray {
    _tray_icon: TrayIcon,
    menu_receiver: Receiver<MenuEvent>,
    quit_item_id: MenuId,
}

impl Tray {
    pub fn new(channel_login: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let icon = Self::load_icon()?;

        let quit_item = MenuItem::new("Quit", true, None);
        let quit_item_id = quit_item.id().clone();

        let menu = Menu::new();
        menu.append(&quit_item)?;

        let tray_icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(format!("Twitch Watcher - {channel_login}"))
            .with_icon(icon)
            .build()?;

        let menu_receiver = MenuEvent::receiver().clone();

        tracing::info!("Starting system tray icon");

        Ok(Tray {
            _tray_icon: tray_icon,
            menu_receiver,
            quit_item_id,
        })
    }

    fn load_icon() -> Result<Icon, Box<dyn std::error::Error>> {
        let image = create_tray_image();
        let (width, height) = image.dimensions();
        Icon::from_rgba(image.into_raw(), width, height).map_err(|e| e.into())
    }

    pub fn poll_events(&mut self) -> Option<TrayCommand> {
        if let Ok(event) = self.menu_receiver.try_recv() {
            if event.id == self.quit_item_id {
                tracing::info!("Quit requested from tray icon");
                return Some(TrayCommand::Quit);
            }
        }
        None
    }
}

/// winit handler that owns the tray and turns "Quit" into a stop request.
struct TrayApp {
    channel_login: String,
    stop: StopSignal,
    tray: Option<Tray>,
    error: Option<String>,
}

impl ApplicationHandler for TrayApp {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        // macOS only allows creating the status item once the loop is running.
        if matches!(cause, StartCause::Init) && self.tray.is_none() {
            match Tray::new(&self.channel_login) {
                Ok(tray) => self.tray = Some(tray),
                Err(e) => {
                    self.error = Some(e.to_string());
                    event_loop.exit();
                }
            }
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {}

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(tray) = self.tray.as_mut() {
            if let Some(TrayCommand::Quit) = tray.poll_events() {
                self.stop.request_stop();
                self.tray = None;
                tracing::info!("Tray icon loop ended");
                event_loop.exit();
                return;
            }
        }
        event_loop.set_control_flow(ControlFlow::wait_duration(MENU_POLL_INTERVAL));
    }
}

/// Shows the tray icon and blocks until the user quits, then requests a stop.
pub fn run(channel_login: &str, stop: StopSignal) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = TrayApp {
        channel_login: channel_login.to_string(),
        stop,
        tray: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
