//! In-memory browser used by tests across the crate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ScraperConfig;
use crate::session::{NavigationError, Session, SessionError, SessionLauncher, BLANK_PAGE};

/// How a routed URL behaves
#[derive(Debug, Clone)]
pub(crate) enum FakePage {
    Html(String),
    /// Navigation reports a redirect abort, then the page is loaded anyway
    RedirectThen(String),
    Fail(String),
    /// Capturing the DOM takes this long
    Slow(Duration, String),
}

#[derive(Default)]
struct FakeWebInner {
    routes: Mutex<Vec<(String, FakePage)>>,
    visits: Mutex<Vec<String>>,
    sessions: Mutex<Vec<Arc<AtomicBool>>>,
    launches: AtomicUsize,
    evaluations: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

/// Routing table plus instrumentation shared by every fake session
#[derive(Clone, Default)]
pub(crate) struct FakeWeb {
    inner: Arc<FakeWebInner>,
}

impl FakeWeb {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for any URL containing `pattern`; first match wins
    pub(crate) fn route(self, pattern: &str, page: FakePage) -> Self {
        self.inner
            .routes
            .lock()
            .unwrap()
            .push((pattern.to_string(), page));
        self
    }

    pub(crate) fn visits(&self) -> Vec<String> {
        self.inner.visits.lock().unwrap().clone()
    }

    /// Visits excluding the blank resets
    pub(crate) fn page_visits(&self) -> Vec<String> {
        self.visits()
            .into_iter()
            .filter(|url| url != BLANK_PAGE)
            .collect()
    }

    pub(crate) fn launches(&self) -> usize {
        self.inner.launches.load(Ordering::SeqCst)
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.inner.evaluations.load(Ordering::SeqCst)
    }

    /// Highest number of DOM captures ever in flight at once
    pub(crate) fn max_active(&self) -> usize {
        self.inner.max_active.load(Ordering::SeqCst)
    }

    /// Simulate the browser being closed underneath every session
    pub(crate) fn close_sessions(&self) {
        for closed in self.inner.sessions.lock().unwrap().iter() {
            closed.store(true, Ordering::SeqCst);
        }
    }

    fn lookup(&self, url: &str) -> Option<FakePage> {
        self.inner
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, page)| page.clone())
    }
}

pub(crate) struct FakeLauncher {
    web: FakeWeb,
}

impl FakeLauncher {
    pub(crate) fn new(web: FakeWeb) -> Self {
        Self { web }
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self, _config: &ScraperConfig) -> Result<FakeSession, SessionError> {
        self.web.inner.launches.fetch_add(1, Ordering::SeqCst);
        let closed = Arc::new(AtomicBool::new(false));
        self.web.inner.sessions.lock().unwrap().push(closed.clone());
        Ok(FakeSession {
            web: self.web.clone(),
            loaded: None,
            closed,
        })
    }
}

pub(crate) struct FakeSession {
    web: FakeWeb,
    loaded: Option<FakePage>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Session for FakeSession {
    async fn goto(&mut self, url: &str, _user_agent: &str) -> Result<(), NavigationError> {
        self.web.inner.visits.lock().unwrap().push(url.to_string());

        if url == BLANK_PAGE {
            self.loaded = Some(FakePage::Html(String::new()));
            return Ok(());
        }

        match self.web.lookup(url) {
            Some(FakePage::RedirectThen(html)) => {
                self.loaded = Some(FakePage::Html(html));
                Err(NavigationError::RedirectAborted)
            }
            Some(FakePage::Fail(reason)) => {
                self.loaded = None;
                Err(NavigationError::Failed {
                    url: url.to_string(),
                    reason,
                })
            }
            Some(page) => {
                self.loaded = Some(page);
                Ok(())
            }
            None => Err(NavigationError::Failed {
                url: url.to_string(),
                reason: "no route".to_string(),
            }),
        }
    }

    async fn evaluate(&mut self, _js: &str) -> Result<(), SessionError> {
        self.web.inner.evaluations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        let inner = &self.web.inner;
        let now = inner.active.fetch_add(1, Ordering::SeqCst) + 1;
        inner.max_active.fetch_max(now, Ordering::SeqCst);

        let html = match self.loaded.clone() {
            Some(FakePage::Slow(delay, html)) => {
                tokio::time::sleep(delay).await;
                Ok(html)
            }
            Some(FakePage::Html(html)) | Some(FakePage::RedirectThen(html)) => Ok(html),
            Some(FakePage::Fail(_)) | None => Err(SessionError::Protocol("no page loaded".into())),
        };

        inner.active.fetch_sub(1, Ordering::SeqCst);
        html
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
