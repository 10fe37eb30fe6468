use std::{io, path::PathBuf};

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// CLI Error types
///
/// Errors from the library crates display their user-facing message, which
/// is the server's `detail` when it sent one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read configuration file {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration file {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error(
        "No base URL configured. Use `--base-url`, `RTD_IMPORT_BASE_URL` or `base_url` in the \
         configuration file."
    )]
    MissingBaseUrl,

    #[error("{}", .0.message())]
    Api(#[from] rtd_api::Error),

    #[error("{}", .0.message())]
    Task(#[from] rtd_task::TaskError),

    #[error("{}", .0.message())]
    Import(#[from] rtd_import::Error),

    #[error("Repository {0} cannot be imported: admin access is required.")]
    Locked(String),
}
