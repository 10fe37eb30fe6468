/// Why a triggered or polled job did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The trigger request itself failed. Never retried.
    #[error("failed to trigger task: {}", .0.message())]
    Trigger(#[source] rtd_api::Error),

    /// The job finished and reported a failure.
    #[error("{message}")]
    JobFailed { message: String },

    /// Polling the status URL kept failing until the retry budget ran out.
    #[error("failed to poll task after {attempts} attempts: {}", .source.message())]
    Exhausted {
        attempts: u32,
        #[source]
        source: rtd_api::Error,
    },

    /// The trigger response did not say where to poll.
    #[error("task was triggered but no status URL was returned")]
    MissingStatusUrl,
}

impl TaskError {
    /// The human-readable failure message.
    ///
    /// For transport failures this is the server's `detail` or the status
    /// text of the last failed response; for failed jobs it is the job's own
    /// error text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Trigger(error) | Self::Exhausted { source: error, .. } => error.message(),
            Self::JobFailed { message } => message.clone(),
            Self::MissingStatusUrl => self.to_string(),
        }
    }
}
