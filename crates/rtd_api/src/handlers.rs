use url::Url;

use crate::{
    Client, Page, Result,
    models::{RemoteAccount, RemoteOrganization, RemoteRepository},
    params::Filter,
};

pub struct AccountsHandler {
    pub(crate) client: Client,
}

impl AccountsHandler {
    pub async fn list(&self) -> Result<Page<RemoteAccount>> {
        self.client
            .get_json(&self.client.endpoints().accounts, &[])
            .await
    }
}

pub struct OrganizationsHandler {
    pub(crate) client: Client,
}

impl OrganizationsHandler {
    pub async fn list(&self) -> Result<Page<RemoteOrganization>> {
        self.client
            .get_json(&self.client.endpoints().organizations, &[])
            .await
    }
}

pub struct RepositoriesHandler {
    pub(crate) client: Client,
}

impl RepositoriesHandler {
    #[must_use]
    pub fn list(&self) -> RepositoryListBuilder {
        RepositoryListBuilder {
            client: self.client.clone(),
            filter: Filter::default(),
        }
    }

    /// Fetch a page by the URL found in a previous page's `next` or
    /// `previous` link.
    pub async fn page(&self, url: &str) -> Result<Page<RemoteRepository>> {
        self.client.get_json(url, &[]).await
    }
}

pub struct RepositoryListBuilder {
    pub(crate) client: Client,
    pub(crate) filter: Filter,
}

impl RepositoryListBuilder {
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn org(self, id: u64) -> Self {
        self.filter(Filter::org(id))
    }

    #[must_use]
    pub fn own(self, provider: impl Into<String>) -> Self {
        self.filter(Filter::own(provider))
    }

    /// The URL of the first page for the configured filter.
    pub fn url(&self) -> Result<Url> {
        let mut url = self.client.resolve(&self.client.endpoints().repositories)?;
        if let Some((key, value)) = self.filter.query() {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url)
    }

    pub async fn send(self) -> Result<Page<RemoteRepository>> {
        let url = self.url()?;
        self.client.get_json(url.as_str(), &[]).await
    }
}
