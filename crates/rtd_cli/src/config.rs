use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use rtd_api::Endpoints;
use rtd_task::PollConfig;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::{
    Globals,
    error::{Error, Result},
};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "rtd-import.toml";
pub(crate) const ENV_PREFIX: &str = "RTD_IMPORT_";

/// The merged CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Base URL of the documentation host.
    pub base_url: Option<String>,

    /// API token, sent as `Authorization: Token <token>`.
    pub api_token: Option<String>,

    /// CSRF token for the sync trigger and the import form.
    pub csrf_token: Option<String>,

    pub has_sso_enabled: bool,

    /// Endpoint paths, relative to the base URL.
    pub endpoints: Endpoints,

    pub poll: Poll,
}

/// Status polling of background jobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Poll {
    pub interval_ms: u64,
    pub retries: u32,
}

impl Default for Poll {
    fn default() -> Self {
        let default = PollConfig::default();

        Self {
            interval_ms: u64::try_from(default.interval.as_millis()).unwrap_or(u64::MAX),
            retries: default.retries,
        }
    }
}

impl From<&Poll> for PollConfig {
    fn from(poll: &Poll) -> Self {
        Self {
            interval: Duration::from_millis(poll.interval_ms),
            retries: poll.retries,
        }
    }
}

impl Config {
    /// Load the configuration file.
    ///
    /// An explicitly given file must exist. Without one, the default file is
    /// used when present.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    trace!(path = %path.display(), "No configuration file found.");
                    return Ok(Self::default());
                }
                path
            }
        };

        debug!(path = %path.display(), "Loading configuration file.");
        let contents = std::fs::read_to_string(&path).map_err(|source| Error::ReadConfig {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| Error::ParseConfig {
            path,
            source: Box::new(source),
        })
    }

    /// Override values from `RTD_IMPORT_*` variables, looked up by their full
    /// name.
    pub(crate) fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.is_empty());

        if let Some(base_url) = var("BASE_URL") {
            self.base_url = Some(base_url);
        }
        if let Some(token) = var("API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(token) = var("CSRF_TOKEN") {
            self.csrf_token = Some(token);
        }

        self
    }

    pub(crate) fn apply_globals(mut self, globals: &Globals) -> Self {
        if let Some(base_url) = &globals.base_url {
            self.base_url = Some(base_url.clone());
        }

        self
    }

    pub(crate) fn poll_config(&self) -> PollConfig {
        (&self.poll).into()
    }
}
