//! Linux-specific tray implementation using ksni (KDE StatusNotifierItem).
//!
//! This module provides native integration with KDE Plasma and other desktop environments
//! that implement the freedesktop StatusNotifierItem protocol.

use crossbeam_channel::{Receiver, Sender};
use ksni::blocking::TrayMethods;
use ksni::menu::*;

use crate::lifecycle::StopSignal;
use crate::utils::{create_tray_image, APP_NAME};

/// Commands that can be triggered from the tray menu.
pub enum TrayCommand {
    Quit,
}

/// The ksni tray implementation.
struct WatcherTray {
    channel_login: String,
    command_sender: Sender<TrayCommand>,
}

impl ksni::Tray for WatcherTray {
    // Make left-click open the menu (same as right-click)
    const MENU_ON_ACTIVATE: bool = true;

    fn id(&self) -> String {
        APP_NAME.into()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        let image = create_tray_image();
        let (width, height) = image.dimensions();

        // Convert RGBA to ARGB (ksni expects ARGB format)
        let mut argb_data = Vec::with_capacity((width * height * 4) as usize);
        for pixel in image.pixels() {
            argb_data.push(pixel[3]); // A
            argb_data.push(pixel[0]); // R
            argb_data.push(pixel[1]); // G
            argb_data.push(pixel[2]); // B
        }

        vec![ksni::Icon {
            width: width as i32,
            height: height as i32,
            data: argb_data,
        }]
    }

    fn title(&self) -> String {
        tooltip(&self.channel_login)
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            icon_name: String::new(),
            icon_pixmap: vec![],
            title: tooltip(&self.channel_login),
            description: String::new(),
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![StandardItem {
            label: "Quit".into(),
            enabled: true,
            activate: Box::new(|tray: &mut Self| {
                let _ = tray.command_sender.send(TrayCommand::Quit);
            }),
            ..Default::default()
        }
        .into()]
    }
}

fn tooltip(channel_login: &str) -> String {
    format!("Twitch Watcher - {channel_login}")
}

/// Handle to the tray icon.
pub struct Tray {
    handle: ksni::blocking::Handle<WatcherTray>,
    command_receiver: Receiver<TrayCommand>,
}

impl Tray {
    /// Creates a new system tray icon.
    ///
    /// This spawns a background task to handle the D-Bus StatusNotifierItem protocol.
    pub fn new(channel_login: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let (command_sender, command_receiver) = crossbeam_channel::unbounded();

        let tray = WatcherTray {
            channel_login: channel_login.to_string(),
            command_sender,
        };

        let handle = tray.spawn().map_err(|e| {
            tracing::error!("Failed to spawn ksni tray: {}", e);
            Box::new(std::io::Error::other(format!("ksni spawn failed: {}", e)))
                as Box<dyn std::error::Error>
        })?;

        tracing::info!("Starting system tray icon (ksni/StatusNotifierItem)");

        Ok(Tray {
            handle,
            command_receiver,
        })
    }

    /// Blocks until "Quit" is chosen, or the tray goes away.
    pub fn wait_for_quit(&self) {
        match self.command_receiver.recv() {
            Ok(TrayCommand::Quit) => tracing::info!("Quit requested from tray icon"),
            Err(_) => tracing::warn!("Tray menu channel closed"),
        }
    }

    /// Removes the icon and waits for the tray service to finish.
    pub fn shutdown(self) {
        self.handle.shutdown().wait();
        tracing::info!("Tray icon loop ended");
    }
}

/// Shows the tray icon and blocks until the user quits, then requests a stop.
pub fn run(channel_login: &str, stop: StopSignal) -> Result<(), Box<dyn std::error::Error>> {
    let tray = Tray::new(channel_login)?;
    tray.wait_for_quit();
    stop.request_stop();
    tray.shutdown();
    Ok(())
}
