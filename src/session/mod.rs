//! The single shared browsing session.
//!
//! [`SessionManager`] owns at most one live [`Session`], created lazily by a
//! [`SessionLauncher`] and recreated transparently once it reports itself
//! closed. Nothing here serializes access: the job queue is the only caller.

mod chrome;
#[cfg(test)]
pub(crate) mod testing;

pub use chrome::{ChromeLauncher, ChromeSession};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ScraperConfig;
use crate::scripts::{ExtractionError, Extracted, Script};

/// Neutral page loaded before every navigation to start from a clean DOM
pub const BLANK_PAGE: &str = "about:blank";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NavigationError {
    /// The load was cut short by an immediate redirect; the redirect target
    /// still loads under the same navigation.
    #[error("navigation aborted by redirect")]
    RedirectAborted,

    #[error("navigation to {url} failed: {reason}")]
    Failed { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("browser session is not available")]
    Closed,

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("browser protocol error: {0}")]
    Protocol(String),
}

/// One automated page-rendering context
#[async_trait]
pub trait Session: Send {
    /// Load `url`, identifying as `user_agent`
    async fn goto(&mut self, url: &str, user_agent: &str) -> Result<(), NavigationError>;

    /// Run JavaScript in the loaded page, discarding its value
    async fn evaluate(&mut self, js: &str) -> Result<(), SessionError>;

    /// Serialized DOM of the loaded page
    async fn content(&mut self) -> Result<String, SessionError>;

    /// Whether the underlying browser went away
    fn is_closed(&self) -> bool;
}

#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: Session + 'static;

    async fn launch(&self, config: &ScraperConfig) -> Result<Self::Session, SessionError>;
}

enum SessionState<S> {
    Uninitialized,
    Ready(S),
    Closed,
}

pub struct SessionManager<L: SessionLauncher> {
    launcher: L,
    config: ScraperConfig,
    state: SessionState<L::Session>,
}

impl<L: SessionLauncher> SessionManager<L> {
    pub fn new(launcher: L, config: ScraperConfig) -> Self {
        Self {
            launcher,
            config,
            state: SessionState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&self.state, SessionState::Ready(session) if !session.is_closed())
    }

    /// Make sure a live session exists, launching one if needed
    pub async fn ensure_session(&mut self) -> Result<(), SessionError> {
        if let SessionState::Ready(ref session) = self.state {
            if !session.is_closed() {
                return Ok(());
            }
            info!("Browser session was closed, relaunching");
            self.state = SessionState::Closed;
        }

        let session = self.launcher.launch(&self.config).await?;
        self.state = SessionState::Ready(session);
        Ok(())
    }

    /// Navigate to `url` from a blank page.
    ///
    /// A redirect abort is not a failure. Hosts listed in `settle_domains`
    /// get a fixed wait afterwards for client-side rendering.
    pub async fn navigate(&mut self, url: &Url) -> Result<(), SessionError> {
        let user_agent = self.config.user_agent.as_str();
        let session = match &mut self.state {
            SessionState::Ready(session) => session,
            SessionState::Uninitialized | SessionState::Closed => return Err(SessionError::Closed),
        };

        if let Err(e) = session.goto(BLANK_PAGE, user_agent).await {
            debug!("Failed to reset page before {}: {}", url, e);
        }

        match session.goto(url.as_str(), user_agent).await {
            Ok(()) => {}
            Err(NavigationError::RedirectAborted) => {
                info!("Navigation aborted/redirected for {} - continuing", url);
            }
            Err(e) => return Err(e.into()),
        }

        if url.host_str().is_some_and(|host| self.config.needs_settle(host)) {
            tokio::time::sleep(self.config.settle_delay()).await;
        }

        Ok(())
    }

    /// Run `script` against the currently loaded page
    pub async fn execute(&mut self, script: Script) -> Result<Extracted, SessionError> {
        let session = match &mut self.state {
            SessionState::Ready(session) => session,
            SessionState::Uninitialized | SessionState::Closed => return Err(SessionError::Closed),
        };

        if let Some(prelude) = script.prelude() {
            if let Err(e) = session.evaluate(prelude).await {
                debug!("Prelude for {} failed: {}", script.name(), e);
            }
        }

        let html = session.content().await?;
        Ok(script.run(&html)?)
    }
}
