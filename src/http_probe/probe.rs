use std::time::{Duration, Instant};

use reqwest::redirect::Policy;
use tokio::sync::oneshot;

use super::prelude::*;

/// Settings shared by every probe a [`Prober`] issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Upper bound on a single outbound request. `None` leaves it to the caller's deadline.
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            follow_redirects: false,
            user_agent: concat!("resource-tester/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProbeOptions {
    /// The tighter of the configured timeout and the caller's remaining deadline.
    pub fn effective_timeout(&self, deadline: Option<Duration>) -> Option<Duration> {
        match (self.timeout, deadline) {
            (Some(configured), Some(deadline)) => Some(configured.min(deadline)),
            (configured, deadline) => configured.or(deadline),
        }
    }

    fn redirect_policy(&self) -> Policy {
        if self.follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        }
    }
}

/// Issues timed HTTP GET requests against locators.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    options: ProbeOptions,
}

impl Prober {
    pub fn new(options: ProbeOptions) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .redirect(options.redirect_policy())
            .build()?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Probes `locator` on the current thread.
    ///
    /// Blocks until the response body has been read. Must run on a thread that is
    /// allowed to block (e.g. inside `tokio::task::spawn_blocking`), never directly
    /// on an async worker.
    pub fn probe(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<ProbeResult, ProbeError> {
        // The blocking client defaults to a 30s timeout, so always set it explicitly.
        let client = reqwest::blocking::Client::builder()
            .user_agent(self.options.user_agent.clone())
            .redirect(self.options.redirect_policy())
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::upstream(&e))?;

        let start = Instant::now();
        let outcome = client
            .get(locator.as_url().clone())
            .send()
            .and_then(|response| {
                let status = response.status();
                response.bytes().map(|_| status)
            });
        let duration = start.elapsed();

        let status = outcome.map_err(|e| ProbeError::upstream(&e))?;

        Ok(ProbeResult {
            url: locator.as_url().clone(),
            status_code: status.as_u16(),
            duration,
        })
    }

    /// Probes `locator` without blocking the calling task.
    ///
    /// The request runs on its own task and reports back over a oneshot channel,
    /// so completion is observed exactly once. The measured duration runs until
    /// that completion is received.
    pub async fn probe_async(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<ProbeResult, ProbeError> {
        let mut request = self.client.get(locator.as_url().clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let (completion_tx, completion_rx) = oneshot::channel();

        let start = Instant::now();
        tokio::spawn(async move {
            let outcome = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    response.bytes().await.map(|_| status)
                }
                Err(e) => Err(e),
            };
            // Receiver is gone when the RPC was cancelled; nothing left to report to.
            let _ = completion_tx.send(outcome);
        });

        let outcome = completion_rx.await.map_err(|_| {
            ProbeError::UpstreamFailure("probe task ended before completing".to_string())
        })?;
        let duration = start.elapsed();

        let status = outcome.map_err(|e| ProbeError::upstream(&e))?;

        Ok(ProbeResult {
            url: locator.as_url().clone(),
            status_code: status.as_u16(),
            duration,
        })
    }
}
