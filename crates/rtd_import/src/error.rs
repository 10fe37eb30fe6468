pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] rtd_api::Error),

    #[error("Task error: {0}")]
    Task(#[from] rtd_task::TaskError),

    #[error("remote repository {0} not found")]
    RepositoryNotFound(u64),
}

impl Error {
    /// The message shown to the user for this error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api(error) => error.message(),
            Self::Task(error) => error.message(),
            Self::RepositoryNotFound(_) => self.to_string(),
        }
    }
}
