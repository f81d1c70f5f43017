use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::session::{NavigationError, Session, SessionError, SessionLauncher, BLANK_PAGE};

/// Chromium reports a navigation replaced by a redirect with this code
const REDIRECT_ABORT: &str = "ERR_ABORTED";

/// Launches a hidden Chrome/Chromium with its own throwaway profile
#[derive(Debug, Default, Clone)]
pub struct ChromeLauncher;

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self, config: &ScraperConfig) -> Result<ChromeSession, SessionError> {
        // Fresh profile per launch so the session never shares cookies or cache
        let profile = ProfileDir::new();

        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--mute-audio")
            .user_data_dir(profile.path())
            .window_size(config.window_width, config.window_height);

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| SessionError::Launch(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            SessionError::Launch(format!(
                "{}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // The handler stream ends when the browser goes away
        let closed = Arc::new(AtomicBool::new(false));
        let flag = closed.clone();
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
            warn!("Browser session closed");
            flag.store(true, Ordering::SeqCst);
        });

        let page = browser
            .new_page(BLANK_PAGE)
            .await
            .map_err(|e| SessionError::Launch(format!("Failed to create page: {}", e)))?;

        info!("Browser session started");

        Ok(ChromeSession {
            _browser: browser,
            page,
            user_agent: None,
            closed,
            handler_task,
            _profile: profile,
        })
    }
}

static LAUNCHES: AtomicU64 = AtomicU64::new(0);

/// Browser profile directory, removed when dropped
#[derive(Debug)]
struct ProfileDir(PathBuf);

impl ProfileDir {
    fn new() -> Self {
        let n = LAUNCHES.fetch_add(1, Ordering::SeqCst);
        Self(std::env::temp_dir().join(format!("marquee-session-{}-{}", std::process::id(), n)))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!("Failed to remove browser profile {}: {}", self.0.display(), e);
            }
        }
    }
}

pub struct ChromeSession {
    _browser: Browser,
    page: Page,
    user_agent: Option<String>,
    closed: Arc<AtomicBool>,
    handler_task: JoinHandle<()>,
    // Declared last so it is removed after the browser is gone
    _profile: ProfileDir,
}

impl ChromeSession {
    async fn apply_user_agent(&mut self, user_agent: &str) -> Result<(), NavigationError> {
        if self.user_agent.as_deref() == Some(user_agent) {
            return Ok(());
        }
        self.page
            .set_user_agent(user_agent)
            .await
            .map_err(|e| NavigationError::Failed {
                url: String::new(),
                reason: format!("Failed to set user agent: {}", e),
            })?;
        self.user_agent = Some(user_agent.to_string());
        Ok(())
    }
}

#[async_trait]
impl Session for ChromeSession {
    async fn goto(&mut self, url: &str, user_agent: &str) -> Result<(), NavigationError> {
        self.apply_user_agent(user_agent).await?;

        match self.page.goto(url).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let reason = e.to_string();
                if reason.contains(REDIRECT_ABORT) {
                    Err(NavigationError::RedirectAborted)
                } else {
                    Err(NavigationError::Failed {
                        url: url.to_string(),
                        reason,
                    })
                }
            }
        }
    }

    async fn evaluate(&mut self, js: &str) -> Result<(), SessionError> {
        let params = EvaluateParams::builder()
            .expression(js)
            .await_promise(true)
            .build()
            .map_err(SessionError::Protocol)?;

        self.page
            .evaluate_expression(params)
            .await
            .map_err(|e| SessionError::Protocol(format!("Script execution failed: {}", e)))?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        self.page
            .content()
            .await
            .map_err(|e| SessionError::Protocol(format!("Failed to read page content: {}", e)))
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripts::{Extracted, Script};
    use crate::session::SessionManager;

    #[test]
    fn test_profile_dirs_are_unique_and_removed() {
        let first = ProfileDir::new();
        let second = ProfileDir::new();
        assert_ne!(first.path(), second.path());

        std::fs::create_dir_all(first.path().join("Default")).unwrap();
        let path = first.path().to_path_buf();
        drop(first);
        assert!(!path.exists());
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_chrome_session_launches() {
        let mut sessions = SessionManager::new(ChromeLauncher, ScraperConfig::default());
        sessions.ensure_session().await.unwrap();
        assert!(sessions.is_ready());
    }

    #[tokio::test]
    #[ignore = "requires network and Chrome/Chromium"]
    async fn test_chrome_scrapes_listing() {
        let mut sessions = SessionManager::new(ChromeLauncher, ScraperConfig::default());
        sessions.ensure_session().await.unwrap();
        let url = url::Url::parse("https://www.imdb.com/chart/moviemeter/").unwrap();
        sessions.navigate(&url).await.unwrap();
        let extracted = sessions.execute(Script::TitleList).await.unwrap();
        assert!(matches!(extracted, Extracted::Titles(ref t) if !t.is_empty()));
    }
}
