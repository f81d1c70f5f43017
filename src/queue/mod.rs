//! Single-worker job queue in front of the shared browsing session.
//!
//! ```text
//! enqueue() ──mpsc──▶ ScrapeQueue::run ──▶ ensure_session → navigate → execute
//!     ▲                                            │
//!     └──────────────── oneshot reply ◀────────────┘
//! ```
//!
//! Jobs complete strictly in the order they were enqueued and never overlap.
//! The queue is unbounded. A job that runs past `job_timeout` is reported as
//! stuck but is never cancelled.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};
use url::Url;

use crate::config::ScraperConfig;
use crate::scripts::{Extracted, Script};
use crate::session::{SessionError, SessionLauncher, SessionManager};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("scrape queue is shut down")]
    QueueClosed,

    #[error("scrape worker dropped the job")]
    WorkerDropped,
}

/// One unit of queued work: navigate, then extract
#[derive(Debug)]
pub struct ScrapeJob {
    pub url: Url,
    pub script: Script,
    reply: oneshot::Sender<Result<Extracted, ScrapeError>>,
}

/// Handle to submit jobs to the queue worker
#[derive(Clone)]
pub struct ScrapeQueueHandle {
    tx: mpsc::UnboundedSender<ScrapeJob>,
}

impl ScrapeQueueHandle {
    /// Append a job to the queue.
    ///
    /// The job takes its place in line immediately; the returned future
    /// resolves once the worker has run it.
    pub fn enqueue(
        &self,
        url: Url,
        script: Script,
    ) -> impl Future<Output = Result<Extracted, ScrapeError>> + Send + 'static {
        let (reply, rx) = oneshot::channel();
        let sent = self
            .tx
            .send(ScrapeJob { url, script, reply })
            .map_err(|_| ScrapeError::QueueClosed);

        async move {
            sent?;
            rx.await.map_err(|_| ScrapeError::WorkerDropped)?
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The worker owning the browsing session
pub struct ScrapeQueue<L: SessionLauncher> {
    sessions: SessionManager<L>,
    job_timeout: Duration,
    cooldown: Duration,
    rx: mpsc::UnboundedReceiver<ScrapeJob>,
}

impl<L: SessionLauncher + 'static> ScrapeQueue<L> {
    /// Create a queue worker and return a handle to feed it
    pub fn new(launcher: L, config: ScraperConfig) -> (Self, ScrapeQueueHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let queue = Self {
            job_timeout: config.job_timeout(),
            cooldown: config.cooldown(),
            sessions: SessionManager::new(launcher, config),
            rx,
        };
        (queue, ScrapeQueueHandle { tx })
    }

    /// Drain jobs one at a time until every handle is dropped
    pub async fn run(mut self) {
        info!("Scrape queue started");

        while let Some(job) = self.rx.recv().await {
            let ScrapeJob { url, script, reply } = job;
            info!("Processing scraper request: {}", url);

            let result = self.run_watched(&url, script).await;
            match &result {
                Ok(extracted) => info!("Scraped {} from {}", extracted.summary(), url),
                Err(e) => error!("Scraper failed for {}: {}", url, e),
            }

            if reply.send(result).is_err() {
                debug!("Caller for {} no longer waiting", url);
            }

            tokio::time::sleep(self.cooldown).await;
        }

        info!("Scrape queue shutting down");
    }

    /// Run a job, logging once if it outlives the timeout
    async fn run_watched(&mut self, url: &Url, script: Script) -> Result<Extracted, ScrapeError> {
        let timeout = self.job_timeout;
        let work = self.process(url, script);
        tokio::pin!(work);

        let watchdog = tokio::time::sleep(timeout);
        tokio::pin!(watchdog);
        let mut reported = false;

        loop {
            tokio::select! {
                result = &mut work => return result,
                _ = &mut watchdog, if !reported => {
                    reported = true;
                    error!("Scraper timed out after {:?} on {}, still waiting", timeout, url);
                }
            }
        }
    }

    async fn process(&mut self, url: &Url, script: Script) -> Result<Extracted, ScrapeError> {
        self.sessions.ensure_session().await?;
        self.sessions.navigate(url).await?;
        Ok(self.sessions.execute(script).await?)
    }
}

/// Spawn the queue worker as a tokio task
pub fn spawn_scrape_queue<L: SessionLauncher + 'static>(
    launcher: L,
    config: ScraperConfig,
) -> ScrapeQueueHandle {
    let (queue, handle) = ScrapeQueue::new(launcher, config);

    tokio::spawn(async move {
        queue.run().await;
    });

    handle
}
