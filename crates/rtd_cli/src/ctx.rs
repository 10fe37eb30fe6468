use rtd_api::Client;
use rtd_import::{ProjectImport, Settings};
use rtd_task::{HttpTransport, TaskMonitor};

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Context for the CLI application
pub(crate) struct Ctx {
    /// Merged file, environment and CLI configuration.
    config: Config,

    /// Client for the documentation host.
    pub(crate) client: Client,
}

impl Ctx {
    pub(crate) fn new(config: Config) -> Result<Self> {
        let base_url = config.base_url.clone().ok_or(Error::MissingBaseUrl)?;

        let mut builder = Client::builder()
            .base_url(base_url)
            .endpoints(config.endpoints.clone());
        if let Some(token) = &config.api_token {
            builder = builder.token(token);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// A task monitor using the configured poll interval and retry budget.
    pub(crate) fn monitor(&self) -> TaskMonitor {
        TaskMonitor::new(HttpTransport::new(self.client.clone()))
            .with_config(self.config.poll_config())
    }

    /// A fresh import screen over the configured client.
    pub(crate) fn import_view(&self) -> ProjectImport {
        let settings = Settings {
            csrf_token: self.config.csrf_token.clone().unwrap_or_default(),
            has_sso_enabled: self.config.has_sso_enabled,
        };

        ProjectImport::with_monitor(self.client.clone(), self.monitor(), settings)
    }
}
