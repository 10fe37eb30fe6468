use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, trace, warn};

use crate::{HttpTransport, TaskError, Transport};

/// Delay before every poll attempt.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Number of transport failures tolerated while polling.
pub const DEFAULT_RETRIES: u32 = 5;

/// The status endpoint of a running job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub url: String,
}

impl TaskHandle {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A request to start a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    /// The job-trigger endpoint.
    pub url: String,

    /// CSRF token, sent as the `csrfmiddlewaretoken` form field.
    pub token: String,
}

impl TriggerRequest {
    #[must_use]
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }
}

/// Body of a successful trigger response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TriggerResponse {
    /// Where to poll for the job's status.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub task_id: Option<String>,
}

/// Body of a successful status response.
///
/// Missing flags read as `false`, i.e. "still running".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PollResult {
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl PollResult {
    #[must_use]
    pub fn running() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            finished: true,
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            finished: true,
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay before each attempt, including the first. Never grows.
    pub interval: Duration,

    /// Transport failures tolerated before giving up. Responses saying the
    /// job is still running do not count.
    pub retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            retries: DEFAULT_RETRIES,
        }
    }
}

/// Triggers jobs and follows them until they resolve.
///
/// The monitor holds no per-job state: every call owns its own retry budget,
/// so any number of jobs can be followed concurrently through `&self`.
#[derive(Debug, Clone)]
pub struct TaskMonitor<T = HttpTransport> {
    transport: T,
    config: PollConfig,
}

impl<T: Transport> TaskMonitor<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: PollConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a job and wait for it to resolve.
    ///
    /// A failed trigger request resolves immediately without polling.
    /// Otherwise the result of [`Self::poll_task`] is returned as-is.
    pub async fn trigger_task(&self, request: &TriggerRequest) -> Result<(), TaskError> {
        debug!(url = request.url, "Triggering task.");

        let response = self.transport.trigger(request).await.map_err(|error| {
            warn!(url = request.url, error = error.message(), "Task trigger failed.");
            TaskError::Trigger(error)
        })?;

        let Some(url) = response.url else {
            warn!(url = request.url, "Task trigger response has no status URL.");
            return Err(TaskError::MissingStatusUrl);
        };

        debug!(status_url = url, task_id = response.task_id.as_deref(), "Task triggered.");
        self.poll_task(&TaskHandle::new(url)).await
    }

    /// Poll a job's status URL until it finishes or polling keeps failing.
    ///
    /// Resolves exactly once. Runs without a deadline while the job reports
    /// that it is still running.
    pub async fn poll_task(&self, handle: &TaskHandle) -> Result<(), TaskError> {
        let mut remaining = self.config.retries;
        let mut attempt = 0_u32;

        loop {
            tokio::time::sleep(self.config.interval).await;
            attempt += 1;

            trace!(url = handle.url, attempt, "Polling task status.");

            match self.transport.status(handle).await {
                Ok(PollResult {
                    finished: true,
                    success: true,
                    ..
                }) => {
                    debug!(url = handle.url, attempt, "Task finished.");
                    return Ok(());
                }
                Ok(PollResult {
                    finished: true,
                    error: message,
                    ..
                }) => {
                    let message = message.unwrap_or_else(|| "Task failed.".to_owned());
                    debug!(url = handle.url, attempt, error = message, "Task failed.");
                    return Err(TaskError::JobFailed { message });
                }
                Ok(_) => trace!(url = handle.url, attempt, "Task still running."),
                Err(error) => {
                    remaining = remaining.saturating_sub(1);
                    if remaining > 0 {
                        warn!(
                            url = handle.url,
                            attempt,
                            remaining,
                            error = error.message(),
                            "Error polling task, retrying."
                        );
                        continue;
                    }

                    error!(
                        url = handle.url,
                        attempt,
                        error = error.message(),
                        "Error polling task, giving up."
                    );
                    return Err(TaskError::Exhausted {
                        attempts: attempt,
                        source: error,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
