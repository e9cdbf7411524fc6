use crate::error::NotifyError;

/// Action fired when the channel goes live.
pub trait Notifier {
    fn notify(&self, url: &str) -> Result<(), NotifyError>;
}

/// Opens the URL with the system's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn notify(&self, url: &str) -> Result<(), NotifyError> {
        webbrowser::open(url).map_err(|e| NotifyError {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
