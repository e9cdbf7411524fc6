//! The poll loop and the live/offline belief it maintains.
//!
//! Each cycle checks the channel, resolves the result into a single boolean
//! (refreshing the token at most once on rejection, carrying the previous value
//! forward on any failure), notifies on an offline to live edge, then sleeps.

use std::time::Duration;

use crate::config::Config;
use crate::error::{AuthError, CheckError};
use crate::lifecycle::StopSignal;
use crate::notifier::Notifier;
use crate::twitch::{channel_url, AccessToken, CredentialProvider, LiveStatus, StatusChecker};

/// Lifecycle of a [`Watcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// No token yet.
    Initializing,
    Polling,
    /// Terminal.
    Stopped,
}

/// What a single poll cycle did to the stored belief.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Offline to live. The notifier was invoked.
    WentLive,
    WentOffline,
    /// The check succeeded and agreed with the stored belief.
    Unchanged,
    /// The status could not be determined; the stored belief was kept.
    CarriedForward,
}

type Sleeper = Box<dyn Fn(Duration) + Send>;

pub struct Watcher<C, S, N> {
    channel_login: String,
    poll_interval: Duration,
    provider: C,
    checker: S,
    notifier: N,
    token: Option<AccessToken>,
    live: bool,
    state: WatchState,
    sleeper: Sleeper,
}

impl<C, S, N> Watcher<C, S, N>
where
    C: CredentialProvider,
    S: StatusChecker,
    N: Notifier,
{
    pub fn new(config: &Config, provider: C, checker: S, notifier: N) -> Self {
        Watcher {
            channel_login: config.channel_login.clone(),
            poll_interval: config.poll_interval,
            provider,
            checker,
            notifier,
            token: None,
            live: false,
            state: WatchState::Initializing,
            sleeper: Box::new(std::thread::sleep),
        }
    }

    /// Replaces the function used to wait between cycles.
    pub fn with_sleeper<F>(mut self, sleeper: F) -> Self
    where
        F: Fn(Duration) + Send + 'static,
    {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// The stored belief about the channel.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Acquires the first token. A failure here is fatal: the caller must not
    /// start the loop.
    pub fn initialize(&mut self) -> Result<(), AuthError> {
        tracing::info!(channel = %self.channel_login, "Monitoring Twitch channel");
        match self.provider.acquire_token() {
            Ok(token) => {
                self.token = Some(token);
                self.state = WatchState::Polling;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to get Twitch token: {}", e);
                Err(e)
            }
        }
    }

    /// Runs one check/decide cycle without sleeping.
    pub fn poll_once(&mut self) -> CycleOutcome {
        let previous = self.live;
        let observed = match self.resolve_status() {
            Some(observed) => observed,
            None => return CycleOutcome::CarriedForward,
        };

        let outcome = match (previous, observed) {
            (false, true) => {
                let url = channel_url(&self.channel_login);
                tracing::info!("{} just went LIVE! Opening {}", self.channel_login, url);
                if let Err(e) = self.notifier.notify(&url) {
                    tracing::error!("{}", e);
                }
                CycleOutcome::WentLive
            }
            (true, false) => {
                tracing::info!("{} appears to be offline now", self.channel_login);
                CycleOutcome::WentOffline
            }
            _ => CycleOutcome::Unchanged,
        };

        self.live = observed;
        outcome
    }

    /// Polls until `stop` is observed after a sleep.
    ///
    /// Acquires the first token if [`initialize`](Self::initialize) has not
    /// been called; its error is returned before any poll happens.
    pub fn run(&mut self, stop: &StopSignal) -> Result<(), AuthError> {
        match self.state {
            WatchState::Initializing => self.initialize()?,
            WatchState::Polling => {}
            WatchState::Stopped => return Ok(()),
        }

        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            "Watch loop started"
        );

        while !stop.is_stop_requested() {
            let outcome = self.poll_once();
            tracing::debug!(?outcome, live = self.live, "Poll cycle complete");
            (self.sleeper)(self.poll_interval);
        }

        self.state = WatchState::Stopped;
        tracing::info!("Watch loop has been stopped");
        Ok(())
    }

    /// Returns the status for this cycle, or `None` to carry the belief forward.
    fn resolve_status(&mut self) -> Option<bool> {
        let first = match &self.token {
            Some(token) => self.checker.check_live(token),
            None => Err(CheckError::AuthExpired),
        };

        match first {
            Ok(status) => Some(observe(&status)),
            Err(CheckError::AuthExpired) => {
                tracing::warn!("Token expired. Refreshing...");
                self.refresh_and_retry()
            }
            Err(e) => {
                tracing::error!("Error checking stream status: {}", e);
                None
            }
        }
    }

    /// One refresh and one retried check. No further retries this cycle.
    fn refresh_and_retry(&mut self) -> Option<bool> {
        let token = match self.provider.acquire_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("Failed to refresh token: {}", e);
                return None;
            }
        };
        tracing::info!("Token refreshed");

        let retried = self.checker.check_live(&token);
        self.token = Some(token);

        match retried {
            Ok(status) => Some(observe(&status)),
            Err(e) => {
                tracing::error!("Check failed after token refresh: {}", e);
                None
            }
        }
    }
}

fn observe(status: &LiveStatus) -> bool {
    if let LiveStatus::Live(stream) = status {
        tracing::debug!(
            title = %stream.title,
            game = %stream.game_name,
            viewers = stream.viewer_count,
            "Channel is live"
        );
    }
    status.is_live()
}
