// Scripted stand-ins for the watcher's collaborators.
//
// Each fake is a cheap clone over shared state so a test can hand one copy to
// the watcher and keep another to inspect what happened.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use twitch_watcher::config::Config;
use twitch_watcher::error::{AuthError, CheckError, NotifyError};
use twitch_watcher::lifecycle::StopSignal;
use twitch_watcher::notifier::Notifier;
use twitch_watcher::twitch::{
    AccessToken, CredentialProvider, LiveStatus, StatusChecker, Stream,
};

pub const CHANNEL_URL: &str = "https://www.twitch.tv/somestreamer";

pub fn test_config() -> Config {
    Config {
        client_id: "test_client".to_string(),
        client_secret: "test_secret".to_string(),
        channel_login: "somestreamer".to_string(),
        poll_interval: Duration::from_secs(180),
    }
}

pub fn live() -> Result<LiveStatus, CheckError> {
    Ok(LiveStatus::Live(Stream {
        user_login: "somestreamer".to_string(),
        title: "testing".to_string(),
        ..Default::default()
    }))
}

pub fn offline() -> Result<LiveStatus, CheckError> {
    Ok(LiveStatus::Offline)
}

pub fn transient() -> Result<LiveStatus, CheckError> {
    Err(CheckError::Transient("HTTP 503".to_string()))
}

pub fn expired() -> Result<LiveStatus, CheckError> {
    Err(CheckError::AuthExpired)
}

#[derive(Default)]
struct ProviderState {
    script: VecDeque<Result<AccessToken, AuthError>>,
    calls: usize,
}

/// Hands out `token-1`, `token-2`, ... unless a scripted result is queued.
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Rc<RefCell<ProviderState>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Vec<Result<AccessToken, AuthError>>) -> Self {
        let provider = Self::default();
        provider.state.borrow_mut().script = script.into();
        provider
    }

    pub fn failing() -> Self {
        Self::with_script(vec![Err(AuthError::Request("HTTP 400".to_string()))])
    }

    pub fn calls(&self) -> usize {
        self.state.borrow().calls
    }
}

impl CredentialProvider for FakeProvider {
    fn acquire_token(&self) -> Result<AccessToken, AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        let calls = state.calls;
        state
            .script
            .pop_front()
            .unwrap_or_else(|| Ok(AccessToken::new(format!("token-{calls}"))))
    }
}

#[derive(Default)]
struct CheckerState {
    script: VecDeque<Result<LiveStatus, CheckError>>,
    tokens: Vec<String>,
}

/// Replays a fixed sequence of check results; reports offline once exhausted.
#[derive(Clone, Default)]
pub struct FakeChecker {
    state: Rc<RefCell<CheckerState>>,
}

impl FakeChecker {
    pub fn new(script: Vec<Result<LiveStatus, CheckError>>) -> Self {
        let checker = Self::default();
        checker.state.borrow_mut().script = script.into();
        checker
    }

    pub fn calls(&self) -> usize {
        self.state.borrow().tokens.len()
    }

    /// Tokens presented to the checker, in call order.
    pub fn tokens(&self) -> Vec<String> {
        self.state.borrow().tokens.clone()
    }
}

impl StatusChecker for FakeChecker {
    fn check_live(&self, token: &AccessToken) -> Result<LiveStatus, CheckError> {
        let mut state = self.state.borrow_mut();
        state.tokens.push(token.secret().to_string());
        state.script.pop_front().unwrap_or(Ok(LiveStatus::Offline))
    }
}

#[derive(Default)]
struct NotifierState {
    urls: Vec<String>,
    fail: bool,
}

/// Records every URL it is asked to open.
#[derive(Clone, Default)]
pub struct FakeNotifier {
    state: Rc<RefCell<NotifierState>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the URL, then reports that opening it failed.
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.state.borrow_mut().fail = true;
        notifier
    }

    pub fn urls(&self) -> Vec<String> {
        self.state.borrow().urls.clone()
    }

    pub fn count(&self) -> usize {
        self.state.borrow().urls.len()
    }
}

impl Notifier for FakeNotifier {
    fn notify(&self, url: &str) -> Result<(), NotifyError> {
        let mut state = self.state.borrow_mut();
        state.urls.push(url.to_string());
        if state.fail {
            return Err(NotifyError {
                url: url.to_string(),
                reason: "no browser available".to_string(),
            });
        }
        Ok(())
    }
}

/// A sleeper that records each requested duration and requests a stop once
/// `cycles` sleeps have happened. The stop lands "mid-sleep", before the loop
/// looks at the signal again.
pub fn stop_after(
    stop: &StopSignal,
    cycles: usize,
) -> (impl Fn(Duration) + Send + 'static, Arc<Mutex<Vec<Duration>>>) {
    let stop = stop.clone();
    let slept = Arc::new(Mutex::new(Vec::new()));
    let counter = Arc::new(AtomicUsize::new(0));
    let record = Arc::clone(&slept);

    let sleeper = move |duration: Duration| {
        record.lock().unwrap().push(duration);
        if counter.fetch_add(1, Ordering::SeqCst) + 1 >= cycles {
            stop.request_stop();
        }
    };

    (sleeper, slept)
}
